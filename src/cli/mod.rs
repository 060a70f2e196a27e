//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod analyze;
mod config;
mod correct;
mod show;
mod swatch;

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, HuelockConfig};
use crate::models::{RecordError, ThemeRecord};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "HUELOCK_LOG";

/// huelock - Keep Material tonal palettes on one hue
#[derive(Parser)]
#[command(name = "huelock")]
#[command(about = "huelock - OKLCH hue-preserving correction for Material tonal palettes and schemes")]
#[command(version)]
pub struct Cli {
    /// Log informational diagnostics (clamped tones, inferred hues)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to huelock.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Correct the tonal palettes and schemes of a generator record
    Correct {
        /// Input JSON record, or `-` for stdin
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Palettes to correct, comma separated (default: from config)
        #[arg(long, value_delimiter = ',')]
        palettes: Vec<String>,

        /// Pass the record through without correcting
        #[arg(long)]
        disable: bool,

        /// Write a JSON report of every tone and role to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Strict mode: exit with an error if any warning was emitted
        #[arg(long)]
        strict: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Also correct tones that have no hue of their own
        #[arg(long)]
        achromatic: bool,
    },

    /// Report how far each tone's hue drifts from its palette's reference hue
    Analyze {
        /// Input JSON record, or `-` for stdin
        input: PathBuf,

        /// Palettes to analyze, comma separated (default: all)
        #[arg(long, value_delimiter = ',')]
        palettes: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Correct the record first and analyze the result
        #[arg(long)]
        corrected: bool,
    },

    /// Preview palettes in the terminal with 24-bit color
    Show {
        /// Input JSON record, or `-` for stdin
        input: PathBuf,

        /// Show corrected palettes below the originals
        #[arg(long)]
        corrected: bool,

        /// Also list scheme roles
        #[arg(long)]
        schemes: bool,
    },

    /// Render palettes to a PNG swatch sheet, original above corrected
    Swatch {
        /// Input JSON record, or `-` for stdin
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Size of each swatch in pixels (1-256, default: 32)
        #[arg(long, default_value = "32", value_parser = clap::value_parser!(u32).range(1..=256))]
        scale: u32,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Install the stderr log subscriber.
///
/// The filter comes from `HUELOCK_LOG` when set, otherwise `warn`
/// (`info` with `--verbose`).
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = match tracing_subscriber::EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new(default),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Correct {
            input,
            output,
            palettes,
            disable,
            report,
            strict,
            compact,
            achromatic,
        } => {
            let overrides = CliOverrides {
                palettes: (!palettes.is_empty()).then_some(palettes),
                enabled: disable.then_some(false),
                correct_achromatic_tones: achromatic.then_some(true),
                pretty: compact.then_some(false),
            };
            correct::run_correct(
                &input,
                output.as_deref(),
                config_path,
                &overrides,
                report.as_deref(),
                strict,
            )
        }
        Commands::Analyze { input, palettes, json, corrected } => {
            analyze::run_analyze(&input, &palettes, json, corrected, config_path)
        }
        Commands::Show { input, corrected, schemes } => {
            show::run_show(&input, corrected, schemes, config_path)
        }
        Commands::Swatch { input, output, scale } => {
            swatch::run_swatch(&input, &output, scale, config_path)
        }
        Commands::Config => config::run_config(config_path),
    }
}

/// Load the configuration and apply CLI overrides, reporting failures.
pub(crate) fn load_settings(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<HuelockConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    if let Err(e) = merge_cli_overrides(&mut config, overrides) {
        eprintln!("Error: {}", e);
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }
    Ok(config)
}

/// Read a record from a file, or from stdin when `input` is `-`.
pub(crate) fn read_record(input: &Path) -> Result<ThemeRecord, ExitCode> {
    let result = if input == Path::new("-") {
        ThemeRecord::from_reader(io::stdin().lock())
    } else {
        ThemeRecord::load(input)
    };

    result.map_err(|e| match e {
        RecordError::Io(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        e => {
            eprintln!("Error: {}: {}", input.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    })
}

/// Write text to a file, or to stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, contents: &str) -> Result<(), ExitCode> {
    let result = match path {
        Some(path) => fs::write(path, format!("{}\n", contents)),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", contents)
        }
    };
    result.map_err(|e| {
        let target = path.map_or("stdout".to_string(), |p| p.display().to_string());
        eprintln!("Error: Failed to write {}: {}", target, e);
        ExitCode::from(EXIT_ERROR)
    })
}
