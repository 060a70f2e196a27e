//! Config command implementation

use std::path::Path;
use std::process::ExitCode;

use super::{load_settings, write_output, EXIT_ERROR, EXIT_SUCCESS};
use crate::config::{find_config, to_toml_string, CliOverrides};

/// Execute the config command: print the effective configuration
pub fn run_config(config_path: Option<&Path>) -> ExitCode {
    let config = match load_settings(config_path, &CliOverrides::default()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let source = match config_path.map(Path::to_path_buf).or_else(find_config) {
        Some(path) => format!("# Loaded from {}", path.display()),
        None => "# No huelock.toml found, using defaults".to_string(),
    };

    let text = match to_toml_string(&config) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match write_output(None, &format!("{}\n\n{}", source, text.trim_end())) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => code,
    }
}
