//! Correct command implementation

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::{load_settings, read_record, write_output, EXIT_ERROR, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::corrector::CorrectionReport;
use crate::diagnostics::{Diagnostic, Recorder, TracingSink};

/// Contents of the `--report` file
#[derive(Serialize)]
struct ReportFile<'a> {
    summary: String,
    #[serde(flatten)]
    report: &'a CorrectionReport,
    diagnostics: &'a [Diagnostic],
}

/// Execute the correct command
pub fn run_correct(
    input: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    report_path: Option<&Path>,
    strict: bool,
) -> ExitCode {
    let config = match load_settings(config_path, overrides) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let record = match read_record(input) {
        Ok(record) => record,
        Err(code) => return code,
    };

    let corrector = config.corrector();
    let mut tracing_sink = TracingSink;
    let mut recorder = Recorder::new(&mut tracing_sink);
    let correction = corrector.correct(&record, &config.correction_options(), &mut recorder);
    tracing::info!("{}", correction.report);

    let json = match correction.record.to_json(config.output.pretty) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(code) = write_output(output, &json) {
        return code;
    }

    if let Some(path) = report_path {
        let file = ReportFile {
            summary: correction.report.to_string(),
            report: &correction.report,
            diagnostics: &recorder.collected,
        };
        let written = serde_json::to_string_pretty(&file)
            .map_err(|e| e.to_string())
            .and_then(|text| fs::write(path, text).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error: Failed to write report '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let warnings = recorder.warning_count();
    if strict && warnings > 0 {
        eprintln!("Error: {} warning(s) (strict mode)", warnings);
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}
