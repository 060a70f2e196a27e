//! Per-tone hue search
//!
//! Moves one tone onto the reference hue. If the original lightness and
//! chroma do not fit in sRGB at exactly that hue, nearby hues are tried
//! (+1°, -1°, +2°, -2°, ...) up to the allowed deviation; the first hue that
//! fits the full chroma wins, otherwise the hue that keeps the most chroma.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{hue_difference, max_chroma, normalize_hue, Oklch};

/// Smallest hue increment the search accepts, in degrees
pub const MIN_HUE_STEP: f64 = 0.01;

/// Chroma reductions tried when no nearby 8-bit color keeps the hue in bound
const CHROMA_FALLBACK_STEPS: u32 = 16;

/// Number of `step` increments that fit in `max_deviation`.
///
/// Hue offsets past 180 degrees wrap around, so the window is capped there.
fn window_steps(max_deviation: f64, step: f64) -> u32 {
    if !(step.is_finite() && max_deviation.is_finite()) || max_deviation <= 0.0 {
        return 0;
    }
    let step = step.max(MIN_HUE_STEP);
    (max_deviation.min(180.0) / step + 1e-9).floor() as u32
}

/// How a tone ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneOutcome {
    /// Output is identical to the input
    Unchanged,
    /// Moved to exactly the reference hue, chroma kept
    Exact,
    /// Moved within the deviation window, chroma kept
    Shifted,
    /// Chroma reduced to stay in gamut
    Clamped,
    /// Not corrected: no meaningful hue, or the color did not parse
    Skipped,
}

/// Result of searching the hue window for one tone, before quantization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueCandidate {
    pub color: Oklch,
    /// Signed offset from the reference hue, in degrees
    pub deviation: f64,
    pub outcome: ToneOutcome,
}

/// Find the best in-gamut color for `original` at or near `reference`.
///
/// `max_deviation` bounds the offset; `step` is the search increment.
pub fn search_hue(original: Oklch, reference: f64, max_deviation: f64, step: f64) -> HueCandidate {
    let exact = original.with_hue(reference);
    if exact.in_gamut() {
        return HueCandidate { color: exact, deviation: 0.0, outcome: ToneOutcome::Exact };
    }

    let (l, c) = (original.l, original.c);
    let mut best_chroma = max_chroma(l, reference, c);
    let mut best_offset = 0.0;

    let steps = window_steps(max_deviation, step);
    let step = step.max(MIN_HUE_STEP);
    for i in 1..=steps {
        let magnitude = i as f64 * step;
        for offset in [magnitude, -magnitude] {
            let hue = normalize_hue(reference + offset);
            let candidate = Oklch::new(l, c, hue);
            if candidate.in_gamut() {
                return HueCandidate {
                    color: candidate,
                    deviation: offset,
                    outcome: ToneOutcome::Shifted,
                };
            }
            let chroma = max_chroma(l, hue, c);
            // Strictly greater: ties keep the smaller offset
            if chroma > best_chroma {
                best_chroma = chroma;
                best_offset = offset;
            }
        }
    }

    HueCandidate {
        color: Oklch::new(l, best_chroma, reference + best_offset),
        deviation: best_offset,
        outcome: ToneOutcome::Clamped,
    }
}

/// A corrected tone after 8-bit quantization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedTone {
    pub rgba: Rgba<u8>,
    pub candidate: HueCandidate,
}

/// Search and quantize, keeping the 8-bit result inside the hue bound.
///
/// Rounding to 8 bits moves low-chroma colors by a few degrees of hue, so a
/// candidate at the edge of the window can land outside it. When that
/// happens the window is narrowed one step at a time and the search rerun.
/// If even the exact reference hue rounds out of bound, the neighbouring
/// 8-bit colors are tried, then chroma is lowered until the hue fits or the
/// color turns gray. Quantized colors with chroma at or below
/// `achromatic_chroma` have no meaningful hue and are always accepted.
pub fn correct_tone(
    original: Oklch,
    alpha: u8,
    reference: f64,
    max_deviation: f64,
    step: f64,
    achromatic_chroma: f64,
) -> QuantizedTone {
    let within = |rgba: Rgba<u8>| match Oklch::from_rgba(rgba).hue_above(achromatic_chroma) {
        Some(hue) => hue_difference(reference, hue).abs() <= max_deviation,
        None => true,
    };

    let steps = window_steps(max_deviation, step);
    let step = step.max(MIN_HUE_STEP);
    let mut last = None;
    for i in 0..=steps {
        let window = if i == steps { 0.0 } else { max_deviation - i as f64 * step };
        let candidate = search_hue(original, reference, window, step);
        let rgba = candidate.color.to_rgba(alpha);
        if within(rgba) {
            return QuantizedTone { rgba, candidate };
        }
        last = Some(candidate);
    }

    let candidate = last.unwrap_or_else(|| search_hue(original, reference, 0.0, step));
    if let Some(rgba) = nearest_in_bound(candidate.color, alpha, &within) {
        return QuantizedTone { rgba, candidate };
    }

    let reduced = |scale: f64| {
        let color = candidate.color.with_chroma(candidate.color.c * scale);
        let candidate = HueCandidate { color, outcome: ToneOutcome::Clamped, ..candidate };
        QuantizedTone { rgba: color.to_rgba(alpha), candidate }
    };
    for i in 1..CHROMA_FALLBACK_STEPS {
        let tone = reduced(1.0 - i as f64 / CHROMA_FALLBACK_STEPS as f64);
        if within(tone.rgba) {
            return tone;
        }
    }
    reduced(0.0)
}

/// The 8-bit neighbour of `color` (each channel moved by at most one) that
/// passes `within` and sits closest to it in OKLab.
fn nearest_in_bound(
    color: Oklch,
    alpha: u8,
    within: &impl Fn(Rgba<u8>) -> bool,
) -> Option<Rgba<u8>> {
    let [r, g, b, _] = color.to_rgba(alpha).0;
    let (ta, tb) = color.ab();
    let mut best: Option<(f64, Rgba<u8>)> = None;

    for dr in -1i16..=1 {
        for dg in -1i16..=1 {
            for db in -1i16..=1 {
                let channel = |v: u8, d: i16| u8::try_from(v as i16 + d).ok();
                let (Some(r), Some(g), Some(b)) = (channel(r, dr), channel(g, dg), channel(b, db))
                else {
                    continue;
                };
                let rgba = Rgba([r, g, b, alpha]);
                if !within(rgba) {
                    continue;
                }
                let lch = Oklch::from_rgba(rgba);
                let (a2, b2) = lch.ab();
                let distance = (lch.l - color.l).powi(2) + (a2 - ta).powi(2) + (b2 - tb).powi(2);
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, rgba));
                }
            }
        }
    }
    best.map(|(_, rgba)| rgba)
}
