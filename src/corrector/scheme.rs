//! Back-propagation of corrected palettes into scheme roles
//!
//! Schemes do not record which tone a role was drawn from. The
//! [`ProvenanceTable`] reconstructs it once per scheme by classifying each
//! role name and matching its lightness against the original palette; the
//! recolor pass then reads hues from the corrected palette at those tones.

use std::collections::BTreeMap;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{parse_color, to_hex, Oklch};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::models::{Scheme, ToneKey};
use crate::roles::{PaletteRoleMap, RoleSource};

/// Original and corrected tones of one palette, keyed by canonical palette name
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedPalette {
    /// Palette name as it appears in the record
    pub name: String,
    pub reference_hue: f64,
    /// Parsed tones of the uncorrected palette, in tone order
    pub original: Vec<(ToneKey, Oklch)>,
    /// Quantized corrected tones
    pub corrected: BTreeMap<ToneKey, Oklch>,
}

/// The tone key whose lightness is closest to `lightness`.
///
/// Ties go to the first tone in iteration order. `None` for an empty palette.
pub fn nearest_tone(tones: &[(ToneKey, Oklch)], lightness: f64) -> Option<&ToneKey> {
    let mut best: Option<(&ToneKey, f64)> = None;
    for (key, color) in tones {
        let distance = (color.l - lightness).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((key, distance));
        }
    }
    best.map(|(key, _)| key)
}

/// Why a role was or was not recolored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    Recolored,
    /// Matched, but the recolored value is identical to the input
    Unchanged,
    /// A `*Fixed`/`*FixedDim` role
    FixedVariant,
    /// A constant role such as `scrim`
    FixedValue,
    /// Its palette was not corrected
    NotCorrected,
    /// No meaningful hue to replace
    Achromatic,
    /// No tone of the palette could be matched
    Unmatched,
    InvalidColor,
}

/// A role resolved to the tone it was generated from
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// Canonical palette name
    pub palette: String,
    pub tone: ToneKey,
    pub original: Rgba<u8>,
}

/// Per-role provenance for one scheme
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceTable {
    entries: BTreeMap<String, Result<Provenance, RoleStatus>>,
}

impl ProvenanceTable {
    /// Classify and match every role of `scheme`.
    ///
    /// Roles whose palette is not in `palettes` are recorded with the reason
    /// they will be left alone.
    pub fn build(
        scheme_name: &str,
        scheme: &Scheme,
        roles: &PaletteRoleMap,
        palettes: &BTreeMap<String, CorrectedPalette>,
        achromatic_chroma: Option<f64>,
        sink: &mut dyn DiagnosticSink,
    ) -> Self {
        let mut entries = BTreeMap::new();
        for (role, color) in scheme.iter() {
            let entry =
                Self::resolve(scheme_name, role, color, roles, palettes, achromatic_chroma, sink);
            entries.insert(role.to_string(), entry);
        }
        Self { entries }
    }

    fn resolve(
        scheme_name: &str,
        role: &str,
        color: &str,
        roles: &PaletteRoleMap,
        palettes: &BTreeMap<String, CorrectedPalette>,
        achromatic_chroma: Option<f64>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Provenance, RoleStatus> {
        let palette = match roles.classify(role) {
            RoleSource::FixedVariant => return Err(RoleStatus::FixedVariant),
            RoleSource::FixedValue => return Err(RoleStatus::FixedValue),
            RoleSource::Palette(name) => name,
        };
        let Some(corrected) = palettes.get(&palette) else {
            return Err(RoleStatus::NotCorrected);
        };

        let rgba = match parse_color(color) {
            Ok(rgba) => rgba,
            Err(e) => {
                sink.emit(
                    Diagnostic::new(DiagnosticKind::InvalidColor, format!("'{}': {}", color, e))
                        .with_role(scheme_name, role),
                );
                return Err(RoleStatus::InvalidColor);
            }
        };
        let lch = Oklch::from_rgba(rgba);
        if let Some(threshold) = achromatic_chroma {
            if lch.hue_above(threshold).is_none() {
                return Err(RoleStatus::Achromatic);
            }
        }

        match nearest_tone(&corrected.original, lch.l) {
            Some(tone) => Ok(Provenance { palette, tone: tone.clone(), original: rgba }),
            None => {
                sink.emit(
                    Diagnostic::new(
                        DiagnosticKind::UnmatchedRole,
                        format!("palette '{}' has no tones to match", corrected.name),
                    )
                    .with_role(scheme_name, role),
                );
                Err(RoleStatus::Unmatched)
            }
        }
    }

    /// The matched tone for `role`, or the reason it has none.
    pub fn get(&self, role: &str) -> Option<&Result<Provenance, RoleStatus>> {
        self.entries.get(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<Provenance, RoleStatus>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome for one role, for the correction report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleReport {
    pub scheme: String,
    pub role: String,
    pub status: RoleStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub palette: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tone: Option<ToneKey>,
    pub before: String,
    pub after: String,
}

/// Recolor one role from its provenance: original lightness and chroma,
/// corrected hue, clamped back into gamut.
pub fn recolor(
    provenance: &Provenance,
    palette: &CorrectedPalette,
    achromatic_chroma: f64,
) -> Option<Rgba<u8>> {
    let corrected = palette.corrected.get(&provenance.tone)?;
    let hue = corrected.hue_above(achromatic_chroma).unwrap_or(palette.reference_hue);
    let original = Oklch::from_rgba(provenance.original);
    let rebuilt = Oklch::new(original.l, original.c, hue).clamp_to_gamut();
    Some(rebuilt.to_rgba(provenance.original[3]))
}

/// Apply a provenance table to a scheme, producing the recolored scheme.
pub fn propagate(
    scheme_name: &str,
    scheme: &Scheme,
    table: &ProvenanceTable,
    palettes: &BTreeMap<String, CorrectedPalette>,
    achromatic_chroma: f64,
    sink: &mut dyn DiagnosticSink,
    report: &mut Vec<RoleReport>,
) -> Scheme {
    let mut out = Scheme::new();
    for (role, color) in scheme.iter() {
        let mut entry = RoleReport {
            scheme: scheme_name.to_string(),
            role: role.to_string(),
            status: RoleStatus::Unchanged,
            palette: None,
            tone: None,
            before: color.to_string(),
            after: color.to_string(),
        };

        match table.get(role) {
            Some(Ok(provenance)) => {
                entry.tone = Some(provenance.tone.clone());
                let palette = palettes.get(&provenance.palette);
                entry.palette = palette.map(|p| p.name.clone());
                match palette.and_then(|p| recolor(provenance, p, achromatic_chroma)) {
                    Some(rgba) if rgba != provenance.original => {
                        entry.status = RoleStatus::Recolored;
                        entry.after = to_hex(rgba);
                    }
                    Some(_) => {}
                    None => {
                        sink.emit(
                            Diagnostic::new(
                                DiagnosticKind::UnmatchedRole,
                                format!("corrected palette has no tone {}", provenance.tone),
                            )
                            .with_role(scheme_name, role),
                        );
                        entry.status = RoleStatus::Unmatched;
                    }
                }
            }
            Some(Err(status)) => entry.status = *status,
            None => {}
        }

        out.insert(role, entry.after.clone());
        report.push(entry);
    }
    out
}
