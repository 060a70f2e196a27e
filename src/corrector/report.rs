//! What the corrector did, palette by palette and role by role

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reference::ReferenceHue;
use super::scheme::{RoleReport, RoleStatus};
use super::tone::ToneOutcome;
use crate::models::ToneKey;

/// Outcome for one tone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneReport {
    pub tone: ToneKey,
    pub before: String,
    pub after: String,
    pub outcome: ToneOutcome,
    /// Signed hue offset of the output from the reference hue, if the output has a hue
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deviation: Option<f64>,
    /// OKLCH chroma given up to stay in gamut
    pub chroma_loss: f64,
}

/// Outcome for one processed palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteReport {
    pub name: String,
    /// `None` when the palette was left alone for lack of a usable hue
    pub reference: Option<ReferenceHue>,
    pub tones: Vec<ToneReport>,
}

impl PaletteReport {
    pub fn tone(&self, tone: &str) -> Option<&ToneReport> {
        self.tones.iter().find(|t| t.tone.as_str() == tone)
    }
}

/// Full account of one correction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionReport {
    pub enabled: bool,
    pub palettes: Vec<PaletteReport>,
    pub roles: Vec<RoleReport>,
}

impl CorrectionReport {
    /// Report for a run with correction turned off.
    pub fn disabled() -> Self {
        Self { enabled: false, palettes: Vec::new(), roles: Vec::new() }
    }

    pub fn palette(&self, name: &str) -> Option<&PaletteReport> {
        self.palettes.iter().find(|p| p.name == name)
    }

    pub fn role(&self, scheme: &str, role: &str) -> Option<&RoleReport> {
        self.roles.iter().find(|r| r.scheme == scheme && r.role == role)
    }

    /// Number of tones whose color changed.
    pub fn changed_tones(&self) -> usize {
        self.palettes
            .iter()
            .flat_map(|p| &p.tones)
            .filter(|t| {
                matches!(t.outcome, ToneOutcome::Exact | ToneOutcome::Shifted | ToneOutcome::Clamped)
            })
            .count()
    }

    pub fn clamped_tones(&self) -> usize {
        self.palettes
            .iter()
            .flat_map(|p| &p.tones)
            .filter(|t| t.outcome == ToneOutcome::Clamped)
            .count()
    }

    pub fn recolored_roles(&self) -> usize {
        self.roles.iter().filter(|r| r.status == RoleStatus::Recolored).count()
    }
}

impl fmt::Display for CorrectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            return write!(f, "correction disabled");
        }
        let unresolved = self.palettes.iter().filter(|p| p.reference.is_none()).count();
        write!(
            f,
            "{} palette(s), {} tone(s) changed ({} clamped), {} role(s) recolored",
            self.palettes.len(),
            self.changed_tones(),
            self.clamped_tones(),
            self.recolored_roles()
        )?;
        if unresolved > 0 {
            write!(f, ", {} palette(s) without a reference hue", unresolved)?;
        }
        Ok(())
    }
}
