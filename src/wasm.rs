//! WASM API module for browser/JS interop
//!
//! Provides WebAssembly bindings for correcting generator records in the
//! browser, next to the JS color-role generator that produces them.

use wasm_bindgen::prelude::*;

use crate::analyze::analyze_record;
use crate::corrector::{CorrectionConfig, CorrectionOptions, HueCorrector};
use crate::models::ThemeRecord;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Result of correcting a record.
#[wasm_bindgen]
pub struct CorrectResult {
    json: String,
    report: String,
    warnings: Vec<String>,
}

#[wasm_bindgen]
impl CorrectResult {
    /// Corrected record as JSON, or an empty string if the input was invalid
    #[wasm_bindgen(getter)]
    pub fn json(&self) -> String {
        self.json.clone()
    }

    /// Correction report as JSON
    #[wasm_bindgen(getter)]
    pub fn report(&self) -> String {
        self.report.clone()
    }

    /// Warnings emitted while correcting
    #[wasm_bindgen(getter)]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }
}

/// Correct the palettes of a generator record.
///
/// # Arguments
/// * `record_json` - Generator output: `tonalPalettes`, `schemes`, optional `sourceColors`
/// * `palettes` - Palettes to correct; empty for primary, secondary, tertiary and error
///
/// # Returns
/// CorrectResult holding the corrected record, the report and any warnings
#[wasm_bindgen]
pub fn correct_json(record_json: &str, palettes: Vec<String>) -> CorrectResult {
    let record = match ThemeRecord::from_json(record_json) {
        Ok(record) => record,
        Err(e) => {
            return CorrectResult {
                json: String::new(),
                report: String::new(),
                warnings: vec![e.to_string()],
            }
        }
    };

    let options = if palettes.is_empty() {
        CorrectionOptions::default()
    } else {
        CorrectionOptions::with_palettes(palettes)
    };
    let mut diagnostics = Vec::new();
    let correction =
        HueCorrector::new(CorrectionConfig::default()).correct(&record, &options, &mut diagnostics);

    let mut warnings: Vec<String> =
        diagnostics.iter().filter(|d| d.is_warning()).map(|d| d.to_string()).collect();
    let json = correction.record.to_json(false).unwrap_or_else(|e| {
        warnings.push(e.to_string());
        String::new()
    });
    let report = serde_json::to_string(&correction.report).unwrap_or_default();

    CorrectResult { json, report, warnings }
}

/// Measure hue drift in a generator record.
///
/// # Returns
/// Drift report as JSON, or an empty string if the input was invalid
#[wasm_bindgen]
pub fn analyze_json(record_json: &str) -> String {
    let Ok(record) = ThemeRecord::from_json(record_json) else {
        return String::new();
    };
    let mut diagnostics = Vec::new();
    let report = analyze_record(&record, None, &HueCorrector::default(), &mut diagnostics);
    serde_json::to_string(&report).unwrap_or_default()
}

/// Check a generator record and return any warnings.
///
/// # Returns
/// Array of warning messages (empty if every requested palette corrects cleanly)
#[wasm_bindgen]
pub fn validate(record_json: &str) -> Vec<String> {
    correct_json(record_json, Vec::new()).warnings
}
