//! huelock - Command-line tool for correcting hue drift in Material tonal palettes

use std::process::ExitCode;

use huelock::cli;

fn main() -> ExitCode {
    cli::run()
}
