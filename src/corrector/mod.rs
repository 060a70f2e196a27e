//! Hue-preserving palette correction
//!
//! Tonal palettes from the upstream generator drift in hue from tone to
//! tone. [`HueCorrector`] rebuilds each requested palette in OKLCH so every
//! tone sits on (or within a bounded window of) one reference hue while
//! staying in sRGB, then recolors the scheme roles that were drawn from
//! those palettes.
//!
//! The corrector is infallible. Anything it cannot process is left exactly
//! as it was and reported through a [`DiagnosticSink`].
//!
//! # Example
//!
//! ```
//! use huelock::corrector::{CorrectionOptions, HueCorrector};
//! use huelock::diagnostics::NullSink;
//! use huelock::models::ThemeRecord;
//!
//! let record = ThemeRecord::from_json(r##"{
//!     "tonalPalettes": {"primary": {"10": "#1a0033", "50": "#7a3ff0", "90": "#e8d9ff"}},
//!     "schemes": {"light": {"scrim": "#000000"}, "dark": {}}
//! }"##).unwrap();
//!
//! let corrector = HueCorrector::default();
//! let result = corrector.correct(&record, &CorrectionOptions::default(), &mut NullSink);
//! let primary = result.record.palette("primary").unwrap();
//! assert_eq!(primary.get(&"50".into()), Some("#7a3ff0"));
//! assert_eq!(result.record.schemes.light.get("scrim"), Some("#000000"));
//! ```

mod reference;
mod report;
mod scheme;
mod tone;

pub use reference::{infer_from_tones, preference_order, HueSource, ReferenceHue};
pub use report::{CorrectionReport, PaletteReport, ToneReport};
pub use scheme::{
    nearest_tone, propagate, recolor, CorrectedPalette, Provenance, ProvenanceTable, RoleReport,
    RoleStatus,
};
pub use tone::{
    correct_tone, search_hue, HueCandidate, QuantizedTone, ToneOutcome, MIN_HUE_STEP,
};

use std::collections::{BTreeMap, BTreeSet};

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{hue_difference, parse_color, to_hex, Oklch};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::models::{Scheme, ThemeRecord, TonalPalette, ToneKey};
use crate::roles::{canonical_name, PaletteRoleMap};

/// Tones tried, in order, when inferring a palette's reference hue
pub const DEFAULT_TONE_PREFERENCE: [&str; 15] =
    ["50", "40", "60", "30", "70", "20", "80", "10", "90", "95", "5", "98", "99", "0", "100"];

/// Palettes corrected when the caller does not choose
pub const DEFAULT_PALETTES: [&str; 4] = ["primary", "secondary", "tertiary", "error"];

/// Tunable correction policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Inclusive tone range held to the tighter deviation bound
    pub mid_tone_range: [f64; 2],
    /// Maximum hue deviation in degrees for mid tones
    pub mid_tone_max_deviation: f64,
    /// Maximum hue deviation in degrees for all other tones
    pub max_deviation: f64,
    /// Hue search increment in degrees
    pub hue_step: f64,
    /// Chroma a tone needs to define the reference hue
    pub usable_chroma: f64,
    /// Chroma at or below which a color has no meaningful hue
    pub achromatic_chroma: f64,
    /// Correct tones that have no meaningful hue of their own
    pub correct_achromatic_tones: bool,
    pub tone_preference: Vec<String>,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            mid_tone_range: [40.0, 60.0],
            mid_tone_max_deviation: 5.0,
            max_deviation: 8.0,
            hue_step: 1.0,
            usable_chroma: 0.02,
            achromatic_chroma: 0.001,
            correct_achromatic_tones: false,
            tone_preference: DEFAULT_TONE_PREFERENCE.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl CorrectionConfig {
    /// Deviation bound for a tone: tighter inside the mid-tone range.
    /// Non-numeric tone keys get the looser bound.
    pub fn max_deviation_for(&self, tone: &ToneKey) -> f64 {
        let [lo, hi] = self.mid_tone_range;
        match tone.value() {
            Some(v) if v >= lo && v <= hi => self.mid_tone_max_deviation,
            _ => self.max_deviation,
        }
    }

    /// Problems with this policy as `(field, message)` pairs.
    pub fn validate(&self) -> Vec<(&'static str, &'static str)> {
        let mut problems = Vec::new();
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        if !non_negative(self.mid_tone_max_deviation) {
            problems.push(("mid_tone_max_deviation", "must be a finite, non-negative number"));
        }
        if !non_negative(self.max_deviation) {
            problems.push(("max_deviation", "must be a finite, non-negative number"));
        }
        if !(self.hue_step.is_finite() && self.hue_step >= MIN_HUE_STEP) {
            problems.push(("hue_step", "must be a number of at least 0.01 degrees"));
        }
        if !non_negative(self.usable_chroma) {
            problems.push(("usable_chroma", "must be a finite, non-negative number"));
        }
        if !non_negative(self.achromatic_chroma) {
            problems.push(("achromatic_chroma", "must be a finite, non-negative number"));
        }
        let [lo, hi] = self.mid_tone_range;
        if !(lo.is_finite() && hi.is_finite()) || lo > hi {
            problems.push(("mid_tone_range", "must be [low, high] with low <= high"));
        }
        problems
    }
}

/// Caller choices for one correction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOptions {
    /// When false the record passes through untouched
    pub enabled: bool,
    /// Palettes to correct, matched by canonical name
    pub affected_palettes: Vec<String>,
}

impl Default for CorrectionOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            affected_palettes: DEFAULT_PALETTES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CorrectionOptions {
    pub fn with_palettes<I, S>(palettes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { enabled: true, affected_palettes: palettes.into_iter().map(Into::into).collect() }
    }

    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }
}

/// Corrected record plus an account of what changed
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub record: ThemeRecord,
    pub report: CorrectionReport,
}

/// Result of correcting a single palette
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteCorrection {
    pub palette: TonalPalette,
    pub report: PaletteReport,
    /// Original and corrected tones for scheme back-propagation; `None` if
    /// the palette was left alone
    pub corrected: Option<CorrectedPalette>,
}

/// The hue-preserving corrector
#[derive(Debug, Clone, Default)]
pub struct HueCorrector {
    config: CorrectionConfig,
    roles: PaletteRoleMap,
}

impl HueCorrector {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config, roles: PaletteRoleMap::default() }
    }

    /// Replace the role table used for scheme back-propagation.
    pub fn with_roles(mut self, roles: PaletteRoleMap) -> Self {
        self.roles = roles;
        self
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    pub fn roles(&self) -> &PaletteRoleMap {
        &self.roles
    }

    /// Correct the requested palettes of `record` and back-propagate into
    /// every scheme variant.
    pub fn correct(
        &self,
        record: &ThemeRecord,
        options: &CorrectionOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Correction {
        if !options.enabled {
            return Correction { record: record.clone(), report: CorrectionReport::disabled() };
        }

        let names: BTreeMap<String, &String> =
            record.tonal_palettes.keys().map(|name| (canonical_name(name), name)).collect();
        let sources: BTreeMap<String, &str> = record
            .source_colors
            .iter()
            .map(|(name, color)| (canonical_name(name), color.as_str()))
            .collect();

        let mut palettes = record.tonal_palettes.clone();
        let mut corrected: BTreeMap<String, CorrectedPalette> = BTreeMap::new();
        let mut report = CorrectionReport { enabled: true, ..CorrectionReport::default() };
        let mut seen = BTreeSet::new();

        for requested in &options.affected_palettes {
            let canonical = canonical_name(requested);
            if !seen.insert(canonical.clone()) {
                continue;
            }
            let Some(&name) = names.get(&canonical) else {
                sink.emit(
                    Diagnostic::new(DiagnosticKind::MissingPalette, "not present in the record")
                        .with_palette(requested.as_str()),
                );
                continue;
            };
            let Some(palette) = record.tonal_palettes.get(name) else {
                continue;
            };

            let source = sources.get(&canonical).copied();
            let result = self.correct_palette(name, palette, source, sink);
            palettes.insert(name.clone(), result.palette);
            report.palettes.push(result.report);
            if let Some(c) = result.corrected {
                corrected.insert(canonical, c);
            }
        }

        let schemes = record.schemes.map(|variant, scheme| {
            self.propagate_scheme(variant, scheme, &corrected, sink, &mut report.roles)
        });

        tracing::debug!(summary = %report, "correction finished");

        Correction {
            record: ThemeRecord { tonal_palettes: palettes, schemes, ..record.clone() },
            report,
        }
    }

    /// Resolve the reference hue for a palette: the source color when it
    /// has a hue, otherwise inferred from the tones.
    pub fn reference_hue(
        &self,
        palette_name: &str,
        tones: &[(ToneKey, Oklch)],
        source_color: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<ReferenceHue> {
        if let Some(color) = source_color {
            match parse_color(color) {
                Ok(rgba) => {
                    if let Some(hue) = Oklch::from_rgba(rgba).hue_above(self.config.achromatic_chroma)
                    {
                        return Some(ReferenceHue {
                            hue,
                            source: HueSource::SourceColor { color: color.to_string() },
                        });
                    }
                    sink.emit(
                        Diagnostic::new(
                            DiagnosticKind::AchromaticSourceColor,
                            format!("source color '{}' has no hue, inferring from tones", color),
                        )
                        .with_palette(palette_name),
                    );
                }
                Err(e) => sink.emit(
                    Diagnostic::new(
                        DiagnosticKind::InvalidColor,
                        format!("source color '{}': {}", color, e),
                    )
                    .with_palette(palette_name),
                ),
            }
        }

        match infer_from_tones(&self.config, tones) {
            Some(reference) => {
                if let HueSource::WeakTone { tone, chroma } = &reference.source {
                    sink.emit(
                        Diagnostic::new(
                            DiagnosticKind::WeakReferenceHue,
                            format!(
                                "no tone above chroma {}, using tone {} (chroma {:.4})",
                                self.config.usable_chroma, tone, chroma
                            ),
                        )
                        .with_palette(palette_name),
                    );
                }
                Some(reference)
            }
            None => {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticKind::UnresolvedReferenceHue,
                        "no tone has a usable hue, palette left unchanged",
                    )
                    .with_palette(palette_name),
                );
                None
            }
        }
    }

    /// Correct one palette against its reference hue.
    pub fn correct_palette(
        &self,
        name: &str,
        palette: &TonalPalette,
        source_color: Option<&str>,
        sink: &mut dyn DiagnosticSink,
    ) -> PaletteCorrection {
        let parsed: Vec<(&ToneKey, &str, Option<Rgba<u8>>)> = palette
            .iter()
            .map(|(key, text)| match parse_color(text) {
                Ok(rgba) => (key, text, Some(rgba)),
                Err(e) => {
                    sink.emit(
                        Diagnostic::new(DiagnosticKind::InvalidColor, format!("'{}': {}", text, e))
                            .with_palette(name)
                            .with_tone(key.as_str()),
                    );
                    (key, text, None)
                }
            })
            .collect();
        let original: Vec<(ToneKey, Oklch)> = parsed
            .iter()
            .filter_map(|(key, _, rgba)| rgba.map(|rgba| ((*key).clone(), Oklch::from_rgba(rgba))))
            .collect();

        let Some(reference) = self.reference_hue(name, &original, source_color, sink) else {
            let tones = parsed.iter().map(|(key, text, _)| skipped(key, text)).collect();
            return PaletteCorrection {
                palette: palette.clone(),
                report: PaletteReport { name: name.to_string(), reference: None, tones },
                corrected: None,
            };
        };
        tracing::debug!(palette = name, hue = reference.hue, "reference hue resolved");

        let achromatic = self.config.achromatic_chroma;
        let mut out = TonalPalette::new();
        let mut corrected = BTreeMap::new();
        let mut tones = Vec::with_capacity(parsed.len());

        for (key, text, rgba) in parsed {
            let Some(rgba) = rgba else {
                out.insert(key.clone(), text);
                tones.push(skipped(key, text));
                continue;
            };
            let before = Oklch::from_rgba(rgba);
            if before.hue_above(achromatic).is_none() && !self.config.correct_achromatic_tones {
                out.insert(key.clone(), text);
                corrected.insert(key.clone(), before);
                tones.push(skipped(key, text));
                continue;
            }

            let quantized = correct_tone(
                before,
                rgba[3],
                reference.hue,
                self.config.max_deviation_for(key),
                self.config.hue_step,
                achromatic,
            );
            let after = Oklch::from_rgba(quantized.rgba);
            let (after_text, outcome) = if quantized.rgba == rgba {
                (text.to_string(), ToneOutcome::Unchanged)
            } else {
                (to_hex(quantized.rgba), quantized.candidate.outcome)
            };

            if outcome == ToneOutcome::Clamped {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticKind::GamutClamped,
                        format!(
                            "chroma {:.4} does not fit near hue {:.1}, reduced to {:.4}",
                            before.c, reference.hue, after.c
                        ),
                    )
                    .with_palette(name)
                    .with_tone(key.as_str()),
                );
            }

            out.insert(key.clone(), after_text.clone());
            corrected.insert(key.clone(), after);
            tones.push(ToneReport {
                tone: key.clone(),
                before: text.to_string(),
                after: after_text,
                outcome,
                deviation: after.hue_above(achromatic).map(|h| hue_difference(reference.hue, h)),
                chroma_loss: (before.c - after.c).max(0.0),
            });
        }

        let reference_hue = reference.hue;
        PaletteCorrection {
            palette: out,
            report: PaletteReport { name: name.to_string(), reference: Some(reference), tones },
            corrected: Some(CorrectedPalette {
                name: name.to_string(),
                reference_hue,
                original,
                corrected,
            }),
        }
    }

    /// Recolor the roles of one scheme variant from the corrected palettes.
    pub fn propagate_scheme(
        &self,
        variant: &str,
        scheme: &Scheme,
        palettes: &BTreeMap<String, CorrectedPalette>,
        sink: &mut dyn DiagnosticSink,
        report: &mut Vec<RoleReport>,
    ) -> Scheme {
        let achromatic = self.config.achromatic_chroma;
        let skip_below = if self.config.correct_achromatic_tones { None } else { Some(achromatic) };
        let table = ProvenanceTable::build(variant, scheme, &self.roles, palettes, skip_below, sink);
        propagate(variant, scheme, &table, palettes, achromatic, sink, report)
    }
}

fn skipped(key: &ToneKey, text: &str) -> ToneReport {
    ToneReport {
        tone: key.clone(),
        before: text.to_string(),
        after: text.to_string(),
        outcome: ToneOutcome::Skipped,
        deviation: None,
        chroma_loss: 0.0,
    }
}
