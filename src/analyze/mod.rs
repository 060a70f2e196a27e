//! Hue-drift analysis for theme records
//!
//! Measures, for each tonal palette, how far every tone's hue strays from
//! the palette's reference hue and whether it falls inside the correction
//! bound. Run it on a generator record to see the drift, or on a corrected
//! record to confirm it is gone.

mod report;

pub use report::format_report_text;

use serde::{Deserialize, Serialize};

use crate::color::{hue_difference, parse_color, Oklch};
use crate::corrector::{HueCorrector, ReferenceHue};
use crate::diagnostics::DiagnosticSink;
use crate::models::{ThemeRecord, ToneKey};
use crate::roles::canonical_name;

/// Hue measurements for one tone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneDrift {
    pub tone: ToneKey,
    pub color: String,
    pub lightness: f64,
    pub chroma: f64,
    /// `None` when the color is achromatic or did not parse
    pub hue: Option<f64>,
    /// Signed offset from the reference hue
    pub deviation: Option<f64>,
    /// Allowed deviation for this tone
    pub bound: f64,
    pub within_bound: bool,
}

/// Hue measurements for one palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteDrift {
    pub name: String,
    pub reference: Option<ReferenceHue>,
    pub tones: Vec<ToneDrift>,
}

impl PaletteDrift {
    /// Largest absolute deviation among tones with a hue.
    pub fn max_deviation(&self) -> f64 {
        self.deviations().fold(0.0, f64::max)
    }

    /// Mean absolute deviation among tones with a hue.
    pub fn mean_deviation(&self) -> f64 {
        let (sum, count) = self.deviations().fold((0.0, 0usize), |(s, n), d| (s + d, n + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    pub fn out_of_bound(&self) -> usize {
        self.tones.iter().filter(|t| !t.within_bound).count()
    }

    fn deviations(&self) -> impl Iterator<Item = f64> + '_ {
        self.tones.iter().filter_map(|t| t.deviation.map(f64::abs))
    }
}

/// Drift across the analyzed palettes of a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Whether the record was corrected before measuring
    pub corrected: bool,
    pub palettes: Vec<PaletteDrift>,
}

impl DriftReport {
    pub fn palette(&self, name: &str) -> Option<&PaletteDrift> {
        self.palettes.iter().find(|p| p.name == name)
    }

    /// Tones outside their bound, across all palettes.
    pub fn out_of_bound(&self) -> usize {
        self.palettes.iter().map(PaletteDrift::out_of_bound).sum()
    }
}

/// Measure drift in `record`.
///
/// `palettes` selects palettes by canonical name; `None` analyzes all of
/// them. Reference hues are resolved the same way the corrector does.
pub fn analyze_record(
    record: &ThemeRecord,
    palettes: Option<&[String]>,
    corrector: &HueCorrector,
    sink: &mut dyn DiagnosticSink,
) -> DriftReport {
    let wanted: Option<Vec<String>> =
        palettes.map(|names| names.iter().map(|n| canonical_name(n)).collect());
    let config = corrector.config();
    let mut report = DriftReport::default();

    for (name, palette) in &record.tonal_palettes {
        let canonical = canonical_name(name);
        if wanted.as_ref().is_some_and(|w| !w.contains(&canonical)) {
            continue;
        }

        let parsed: Vec<(&ToneKey, &str, Option<Oklch>)> = palette
            .iter()
            .map(|(key, text)| (key, text, parse_color(text).ok().map(Oklch::from_rgba)))
            .collect();
        let tones: Vec<(ToneKey, Oklch)> = parsed
            .iter()
            .filter_map(|(key, _, lch)| lch.map(|lch| ((*key).clone(), lch)))
            .collect();
        let source = record
            .source_colors
            .iter()
            .find(|(n, _)| canonical_name(n) == canonical)
            .map(|(_, color)| color.as_str());
        let reference = corrector.reference_hue(name, &tones, source, sink);

        let tones = parsed
            .into_iter()
            .map(|(key, text, lch)| {
                let lch = lch.unwrap_or(Oklch::new(0.0, 0.0, 0.0));
                let hue = lch.hue_above(config.achromatic_chroma);
                let deviation = match (&reference, hue) {
                    (Some(r), Some(h)) => Some(hue_difference(r.hue, h)),
                    _ => None,
                };
                let bound = config.max_deviation_for(key);
                ToneDrift {
                    tone: key.clone(),
                    color: text.to_string(),
                    lightness: lch.l,
                    chroma: lch.c,
                    hue,
                    deviation,
                    bound,
                    within_bound: deviation.map_or(true, |d| d.abs() <= bound),
                }
            })
            .collect();

        report.palettes.push(PaletteDrift { name: name.clone(), reference, tones });
    }

    report
}
