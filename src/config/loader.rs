//! Configuration loading and discovery for `huelock.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::HuelockConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "huelock.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse huelock.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Palettes to correct
    pub palettes: Option<Vec<String>>,
    /// Turn correction on or off
    pub enabled: Option<bool>,
    /// Correct tones with no hue of their own
    pub correct_achromatic_tones: Option<bool>,
    /// Pretty-print JSON output
    pub pretty: Option<bool>,
}

/// Find huelock.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for huelock.toml
/// 2. Check XDG_CONFIG_HOME/huelock/huelock.toml (or ~/.config/huelock/huelock.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find huelock.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("huelock").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find huelock.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a huelock.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<HuelockConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<HuelockConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: HuelockConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &HuelockConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

/// Configuration used when no huelock.toml is found.
pub fn default_config() -> HuelockConfig {
    HuelockConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is validated again.
pub fn merge_cli_overrides(
    config: &mut HuelockConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref palettes) = overrides.palettes {
        config.correction.palettes = palettes.clone();
    }

    if let Some(enabled) = overrides.enabled {
        config.correction.enabled = enabled;
    }

    if let Some(achromatic) = overrides.correct_achromatic_tones {
        config.correction.policy.correct_achromatic_tones = achromatic;
    }

    if let Some(pretty) = overrides.pretty {
        config.output.pretty = pretty;
    }

    check(config)
}

/// Render a configuration as TOML.
pub fn to_toml_string(config: &HuelockConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}
