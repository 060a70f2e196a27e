//! Configuration for the corrector and CLI
//!
//! Provides types, discovery and parsing for `huelock.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config, find_config, find_config_from, load_config, merge_cli_overrides,
    to_toml_string, CliOverrides, ConfigError, CONFIG_FILE_NAME,
};
pub use schema::*;
