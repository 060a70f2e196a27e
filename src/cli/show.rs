//! Show command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{load_settings, read_record, EXIT_SUCCESS};
use crate::config::CliOverrides;
use crate::diagnostics::TracingSink;
use crate::terminal::{render_palette_row, render_scheme};

const CORRECTED_SUFFIX: &str = " (corrected)";

/// Execute the show command
pub fn run_show(
    input: &Path,
    corrected: bool,
    schemes: bool,
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

    let fixed = corrected.then(|| {
        config.corrector().correct(&record, &config.correction_options(), &mut TracingSink).record
    });

    let mut label_width = record.tonal_palettes.keys().map(String::len).max().unwrap_or(0);
    if fixed.is_some() {
        label_width += CORRECTED_SUFFIX.len();
    }

    for (name, palette) in &record.tonal_palettes {
        print!("{}", render_palette_row(name, palette, label_width));
        let changed = fixed.as_ref().and_then(|f| f.palette(name)).filter(|p| *p != palette);
        if let Some(after) = changed {
            let label = format!("{}{}", name, CORRECTED_SUFFIX);
            print!("{}", render_palette_row(&label, after, label_width));
        }
    }

    if schemes {
        let shown = fixed.as_ref().unwrap_or(&record);
        for (variant, scheme) in shown.schemes.iter() {
            let previous = fixed.as_ref().and_then(|_| record.schemes.get(variant));
            println!();
            print!("{}", render_scheme(variant, scheme, previous));
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
