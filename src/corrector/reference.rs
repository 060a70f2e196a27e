//! Reference hue resolution for one palette

use serde::{Deserialize, Serialize};

use crate::color::Oklch;
use crate::models::ToneKey;

use super::CorrectionConfig;

/// Where a palette's reference hue came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum HueSource {
    /// The explicit source color supplied for the palette
    SourceColor { color: String },
    /// The first tone in preference order with usable chroma
    Tone { tone: ToneKey, chroma: f64 },
    /// No tone had usable chroma; the most chromatic tone was used
    WeakTone { tone: ToneKey, chroma: f64 },
}

/// A resolved reference hue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceHue {
    pub hue: f64,
    pub source: HueSource,
}

/// Tone keys in the order they are considered as a hue reference.
///
/// Keys named in `tone_preference` come first, in that order; the rest
/// follow by distance from tone 50, non-numeric keys last.
pub fn preference_order<'a>(
    config: &CorrectionConfig,
    keys: impl IntoIterator<Item = &'a ToneKey>,
) -> Vec<ToneKey> {
    let keys: Vec<&ToneKey> = keys.into_iter().collect();
    let mut ordered: Vec<ToneKey> = Vec::with_capacity(keys.len());

    for preferred in &config.tone_preference {
        let preferred = ToneKey::from(preferred.as_str());
        if keys.contains(&&preferred) && !ordered.contains(&preferred) {
            ordered.push(preferred);
        }
    }

    let mut rest: Vec<&ToneKey> = keys.into_iter().filter(|k| !ordered.contains(*k)).collect();
    rest.sort_by(|a, b| {
        let distance = |k: &ToneKey| k.value().map(|v| (v - 50.0).abs()).unwrap_or(f64::INFINITY);
        distance(a).total_cmp(&distance(b)).then_with(|| a.cmp(b))
    });
    ordered.extend(rest.into_iter().cloned());
    ordered
}

/// Infer a reference hue from the palette's own tones.
///
/// Returns `None` when no tone has chroma above `achromatic_chroma`.
pub fn infer_from_tones(
    config: &CorrectionConfig,
    tones: &[(ToneKey, Oklch)],
) -> Option<ReferenceHue> {
    let order = preference_order(config, tones.iter().map(|(key, _)| key));
    let mut strongest: Option<(&ToneKey, Oklch)> = None;

    for key in &order {
        let Some((key, color)) = tones.iter().find(|(k, _)| k == key) else {
            continue;
        };
        if color.c > config.usable_chroma {
            return Some(ReferenceHue {
                hue: color.h,
                source: HueSource::Tone { tone: key.clone(), chroma: color.c },
            });
        }
        if color.hue_above(config.achromatic_chroma).is_some()
            && strongest.map_or(true, |(_, best)| color.c > best.c)
        {
            strongest = Some((key, *color));
        }
    }

    strongest.map(|(key, color)| ReferenceHue {
        hue: color.h,
        source: HueSource::WeakTone { tone: key.clone(), chroma: color.c },
    })
}
