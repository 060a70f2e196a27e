//! CLI integration tests for the `huelock` binary.
//!
//! Runs the built binary against the Material baseline fixture inside a
//! scratch directory, so no huelock.toml from the host is picked up.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn huelock_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_huelock"))
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/theme.json")
}

/// Run huelock in `dir` with an isolated config environment.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(huelock_binary())
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("HUELOCK_LOG")
        .output()
        .expect("Failed to execute huelock")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ============================================================================
// correct
// ============================================================================

#[test]
fn test_correct_to_stdout() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let output = run_in(temp.path(), &["correct", fixture.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["schemes"]["light"]["scrim"], "#000000");
    assert_eq!(json["tonalPalettes"]["primary"]["40"], "#6750A4");
    assert_eq!(json["tonalPalettes"]["neutral"]["10"], "#1C1B1F");
    assert_eq!(json["seed"], "#6750A4");
}

#[test]
fn test_correct_to_file_with_report() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let out = temp.path().join("corrected.json");
    let report = temp.path().join("report.json");
    let output = run_in(
        temp.path(),
        &[
            "correct",
            fixture.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
            "--compact",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.trim_end().lines().count(), 1, "compact output is one line");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["enabled"], true);
    assert!(report["summary"].as_str().unwrap().starts_with("4 palette(s)"));
    assert_eq!(report["palettes"].as_array().unwrap().len(), 4);
    let roles = report["roles"].as_array().unwrap();
    let container = roles
        .iter()
        .find(|r| r["scheme"] == "light" && r["role"] == "primaryContainer")
        .expect("role reported");
    assert_eq!(container["status"], "recolored");
    assert_eq!(container["tone"], "90");
}

#[test]
fn test_correct_disable_is_passthrough() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let output = run_in(temp.path(), &["correct", fixture.to_str().unwrap(), "--disable"]);
    assert!(output.status.success());

    let corrected: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let original: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&fixture).unwrap()).unwrap();
    assert_eq!(corrected, original);
}

#[test]
fn test_correct_strict_fails_on_missing_palette() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let path = fixture.to_str().unwrap();

    let output = run_in(temp.path(), &["correct", path, "--palettes", "primary,accent"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("accent"), "warning should be logged");

    let output =
        run_in(temp.path(), &["correct", path, "--palettes", "primary,accent", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("strict mode"));

    let output = run_in(temp.path(), &["correct", path, "--strict"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_correct_missing_input() {
    let temp = TempDir::new().unwrap();
    let output = run_in(temp.path(), &["correct", "nope.json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Cannot open input file"));
}

#[test]
fn test_correct_invalid_json() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("bad.json");
    fs::write(&input, "{ not json").unwrap();
    let output = run_in(temp.path(), &["correct", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid theme record JSON"));
}

#[test]
fn test_correct_reads_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("huelock.toml"), "[correction]\nenabled = false\n").unwrap();
    let fixture = fixture_path();
    let output = run_in(temp.path(), &["correct", fixture.to_str().unwrap()]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["tonalPalettes"]["primary"]["90"], "#EADDFF");
}

#[test]
fn test_correct_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("huelock.toml"), "[correction]\nhue_step = 0\n").unwrap();
    let fixture = fixture_path();
    let output = run_in(temp.path(), &["correct", fixture.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("correction.hue_step"));
}

// ============================================================================
// analyze / show / swatch / config
// ============================================================================

#[test]
fn test_analyze_text() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let output = run_in(temp.path(), &["analyze", fixture.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Hue Drift Report"));
    assert!(text.contains("PRIMARY"));
    assert!(text.contains("NEUTRALVARIANT"));
}

#[test]
fn test_analyze_corrected_json_within_bound() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let output = run_in(
        temp.path(),
        &[
            "analyze",
            fixture.to_str().unwrap(),
            "--json",
            "--corrected",
            "--palettes",
            "primary,secondary,tertiary,error",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["corrected"], true);
    let palettes = json["palettes"].as_array().unwrap();
    assert_eq!(palettes.len(), 4);
    for palette in palettes {
        for tone in palette["tones"].as_array().unwrap() {
            assert_eq!(tone["within_bound"], true, "{} tone {}", palette["name"], tone["tone"]);
        }
    }
}

#[test]
fn test_show_prints_swatches() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let output =
        run_in(temp.path(), &["show", fixture.to_str().unwrap(), "--corrected", "--schemes"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("\x1b[48;2;"));
    assert!(text.contains("primary (corrected)"));
    assert!(!text.contains("neutral (corrected)"));
    assert!(text.contains("(was #EADDFF)"));
}

#[test]
fn test_swatch_writes_png() {
    let temp = TempDir::new().unwrap();
    let fixture = fixture_path();
    let out = temp.path().join("sheet.png");
    let output = run_in(
        temp.path(),
        &["swatch", fixture.to_str().unwrap(), "-o", out.to_str().unwrap(), "--scale", "4"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved:"));

    let image = image::open(&out).unwrap().to_rgba8();
    // 13 tones; 4 corrected palettes take two rows, 2 take one, 5 gaps
    assert_eq!(image.dimensions(), (13 * 4, (4 * 2 + 2 + 5) * 4));
}

#[test]
fn test_config_prints_defaults() {
    let temp = TempDir::new().unwrap();
    let output = run_in(temp.path(), &["config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("No huelock.toml found"));
    assert!(text.contains("[correction]"));
    assert!(text.contains("max_deviation = 8.0"));
}

#[test]
fn test_config_explicit_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[output]\npretty = false\n").unwrap();
    let output = run_in(temp.path(), &["config", "--config", path.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Loaded from"));
    assert!(text.contains("pretty = false"));
}
