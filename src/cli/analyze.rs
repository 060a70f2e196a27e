//! Analyze command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{load_settings, read_record, write_output, EXIT_ERROR, EXIT_SUCCESS};
use crate::analyze::{analyze_record, format_report_text};
use crate::config::CliOverrides;
use crate::diagnostics::{NullSink, TracingSink};

/// Execute the analyze command
pub fn run_analyze(
    input: &Path,
    palettes: &[String],
    json: bool,
    corrected: bool,
    config_path: Option<&Path>,
) -> ExitCode {
    let config = match load_settings(config_path, &CliOverrides::default()) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let record = match read_record(input) {
        Ok(record) => record,
        Err(code) => return code,
    };

    let corrector = config.corrector();
    let (record, was_corrected) = if corrected {
        // the analysis below reports the same conditions again
        let correction = corrector.correct(&record, &config.correction_options(), &mut NullSink);
        (correction.record, correction.report.enabled)
    } else {
        (record, false)
    };

    let selection = (!palettes.is_empty()).then_some(palettes);
    let mut report = analyze_record(&record, selection, &corrector, &mut TracingSink);
    report.corrected = was_corrected;

    let text = if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: Failed to serialize report: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        format_report_text(&report)
    };

    match write_output(None, text.trim_end()) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => code,
    }
}
