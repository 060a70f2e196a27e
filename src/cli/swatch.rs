//! Swatch command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{load_settings, read_record, EXIT_ERROR, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::diagnostics::TracingSink;
use crate::output::{render_swatch_sheet, save_png, scale_image, SwatchRow};

/// Execute the swatch command
pub fn run_swatch(input: &Path, output: &Path, scale: u32, config_path: Option<&Path>) -> ExitCode {
    let config = match load_settings(config_path, &CliOverrides::default()) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let record = match read_record(input) {
        Ok(record) => record,
        Err(code) => return code,
    };

    let correction =
        config.corrector().correct(&record, &config.correction_options(), &mut TracingSink);

    let rows: Vec<SwatchRow<'_>> = record
        .tonal_palettes
        .iter()
        .map(|(name, original)| SwatchRow {
            original,
            corrected: correction.report.palette(name).and(correction.record.palette(name)),
        })
        .collect();

    let sheet = match scale_image(render_swatch_sheet(&rows), scale) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = save_png(&sheet, output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}
