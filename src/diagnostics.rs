//! Structured diagnostics emitted while correcting a record
//!
//! The corrector never fails on bad input; it leaves the offending palette or
//! role alone and reports what happened through a [`DiagnosticSink`]. Tests
//! collect into a `Vec<Diagnostic>`, the CLI forwards to `tracing`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected degradation, e.g. a tone clamped to the gamut boundary
    Info,
    /// Input left uncorrected
    Warn,
}

/// What kind of condition was encountered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No source color and no tone with a discernible hue; palette passed through
    UnresolvedReferenceHue,
    /// The explicit source color is gray; hue inferred from the palette instead
    AchromaticSourceColor,
    /// No tone cleared the usable-chroma threshold; the most chromatic tone was used
    WeakReferenceHue,
    /// Original chroma did not fit anywhere in the hue window; chroma was reduced
    GamutClamped,
    /// A scheme role could not be matched to a tone of its palette
    UnmatchedRole,
    /// A color string could not be parsed
    InvalidColor,
    /// A palette requested for correction is not present in the record
    MissingPalette,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::AchromaticSourceColor
            | DiagnosticKind::WeakReferenceHue
            | DiagnosticKind::GamutClamped => Severity::Info,
            DiagnosticKind::UnresolvedReferenceHue
            | DiagnosticKind::UnmatchedRole
            | DiagnosticKind::InvalidColor
            | DiagnosticKind::MissingPalette => Severity::Warn,
        }
    }
}

/// One diagnostic record, located by palette/tone or scheme/role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub palette: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            palette: None,
            tone: None,
            scheme: None,
            role: None,
            message: message.into(),
        }
    }

    pub fn with_palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn with_role(mut self, scheme: impl Into<String>, role: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self.role = Some(role.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warn
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.palette, &self.tone, &self.scheme, &self.role) {
            (Some(p), Some(t), _, _) => write!(f, "palette '{}' tone {}: ", p, t)?,
            (Some(p), None, _, _) => write!(f, "palette '{}': ", p)?,
            (None, _, Some(s), Some(r)) => write!(f, "scheme '{}' role '{}': ", s, r)?,
            _ => {}
        }
        f.write_str(&self.message)
    }
}

/// Receiver for corrector diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing`, warnings at WARN and the rest at INFO.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warn => tracing::warn!(kind = ?diagnostic.kind, "{}", diagnostic),
            Severity::Info => tracing::info!(kind = ?diagnostic.kind, "{}", diagnostic),
        }
    }
}

/// Collects diagnostics and forwards each to an inner sink as well.
pub struct Recorder<'a> {
    pub collected: Vec<Diagnostic>,
    inner: &'a mut dyn DiagnosticSink,
}

impl<'a> Recorder<'a> {
    pub fn new(inner: &'a mut dyn DiagnosticSink) -> Self {
        Self { collected: Vec::new(), inner }
    }

    pub fn warning_count(&self) -> usize {
        self.collected.iter().filter(|d| d.is_warning()).count()
    }
}

impl DiagnosticSink for Recorder<'_> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.collected.push(diagnostic.clone());
        self.inner.emit(diagnostic);
    }
}
