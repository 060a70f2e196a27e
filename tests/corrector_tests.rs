//! Integration tests for the hue corrector
//!
//! Drives the library API end to end on a Material baseline record
//! (seed #6750A4) and on small hand-written palettes.

use std::fs;
use std::path::Path;

use huelock::color::{hue_difference, parse_color, Oklch};
use huelock::corrector::{
    CorrectionConfig, CorrectionOptions, HueCorrector, HueSource, RoleStatus, ToneOutcome,
};
use huelock::diagnostics::{Diagnostic, DiagnosticKind, NullSink};
use huelock::models::{ThemeRecord, ToneKey};

const ACHROMATIC: f64 = 0.001;

fn fixture() -> ThemeRecord {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/theme.json");
    let json = fs::read_to_string(path).expect("fixture should exist");
    ThemeRecord::from_json(&json).expect("fixture should parse")
}

fn lch(color: &str) -> Oklch {
    Oklch::from_rgba(parse_color(color).expect("valid color"))
}

fn correct(record: &ThemeRecord, options: &CorrectionOptions) -> (ThemeRecord, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let correction = HueCorrector::default().correct(record, options, &mut diagnostics);
    (correction.record, diagnostics)
}

// ============================================================================
// Palette correction
// ============================================================================

#[test]
fn test_corrected_tones_converge_on_reference_hue() {
    let record = fixture();
    let mut sink = NullSink;
    let correction =
        HueCorrector::default().correct(&record, &CorrectionOptions::default(), &mut sink);
    let config = CorrectionConfig::default();

    assert_eq!(correction.report.palettes.len(), 4);
    for palette in &correction.report.palettes {
        let reference = palette.reference.as_ref().expect("chromatic palette has a reference");
        let output = correction.record.palette(&palette.name).unwrap();

        for tone in &palette.tones {
            let after = output.get(&tone.tone).unwrap();
            assert_eq!(after, tone.after);
            let Some(hue) = lch(after).hue_above(ACHROMATIC) else {
                continue;
            };
            if tone.outcome == ToneOutcome::Skipped {
                continue;
            }
            let deviation = hue_difference(reference.hue, hue);
            let bound = config.max_deviation_for(&tone.tone);
            assert!(
                deviation.abs() <= bound,
                "{} tone {} is {:.2} degrees off (bound {})",
                palette.name,
                tone.tone,
                deviation,
                bound
            );
        }
    }
}

#[test]
fn test_source_color_tone_is_kept_verbatim() {
    let record = fixture();
    let mut sink = NullSink;
    let correction =
        HueCorrector::default().correct(&record, &CorrectionOptions::default(), &mut sink);

    let primary = correction.report.palette("primary").unwrap();
    let reference = primary.reference.as_ref().unwrap();
    assert_eq!(reference.source, HueSource::SourceColor { color: "#6750A4".to_string() });

    let tone = primary.tone("40").unwrap();
    assert_eq!(tone.outcome, ToneOutcome::Unchanged);
    let output = correction.record.palette("primary").unwrap();
    assert_eq!(output.get(&ToneKey::from("40")), Some("#6750A4"));
}

#[test]
fn test_reference_inferred_from_mid_tone() {
    let record = fixture();
    let mut sink = NullSink;
    let correction =
        HueCorrector::default().correct(&record, &CorrectionOptions::default(), &mut sink);

    for name in ["secondary", "tertiary", "error"] {
        let reference = correction.report.palette(name).unwrap().reference.as_ref().unwrap();
        match &reference.source {
            HueSource::Tone { tone, chroma } => {
                assert_eq!(tone.as_str(), "50");
                assert!(*chroma > 0.02);
            }
            other => panic!("{} resolved from {:?}", name, other),
        }
    }
}

#[test]
fn test_black_and_white_tones_are_skipped() {
    let record = fixture();
    let (corrected, _) = correct(&record, &CorrectionOptions::default());

    for name in ["primary", "secondary", "tertiary", "error"] {
        let palette = corrected.palette(name).unwrap();
        assert_eq!(palette.get(&ToneKey::from("0")), Some("#000000"));
        assert_eq!(palette.get(&ToneKey::from("100")), Some("#FFFFFF"));
    }
}

#[test]
fn test_lightness_is_preserved() {
    let record = fixture();
    let (corrected, _) = correct(&record, &CorrectionOptions::default());

    for name in ["primary", "secondary", "tertiary", "error"] {
        let before = record.palette(name).unwrap();
        let after = corrected.palette(name).unwrap();
        for (tone, color) in before.iter() {
            let delta = lch(after.get(tone).unwrap()).l - lch(color).l;
            assert!(delta.abs() < 0.005, "{} tone {} lightness moved by {}", name, tone, delta);
        }
    }
}

#[test]
fn test_unrequested_palettes_pass_through() {
    let record = fixture();
    let (corrected, _) = correct(&record, &CorrectionOptions::with_palettes(["tertiary"]));

    for name in ["primary", "secondary", "error", "neutral", "neutralVariant"] {
        assert_eq!(corrected.palette(name), record.palette(name), "{} changed", name);
    }
    assert_eq!(corrected.extra.get("seed"), record.extra.get("seed"));
    assert_eq!(corrected.extra.get("variant"), record.extra.get("variant"));
}

#[test]
fn test_palette_names_match_canonically() {
    let record = fixture();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let correction = HueCorrector::default().correct(
        &record,
        &CorrectionOptions::with_palettes(["neutral_variant", "PRIMARY", "neutral-variant"]),
        &mut sink,
    );

    assert_eq!(correction.report.palettes.len(), 2);
    assert!(correction.report.palette("neutralVariant").is_some());
    assert!(correction.report.palette("primary").is_some());
    assert!(!sink.iter().any(|d| d.kind == DiagnosticKind::MissingPalette));
}

#[test]
fn test_missing_palette_is_reported() {
    let record = fixture();
    let (corrected, diagnostics) =
        correct(&record, &CorrectionOptions::with_palettes(["primary", "accent"]));

    let missing: Vec<&Diagnostic> =
        diagnostics.iter().filter(|d| d.kind == DiagnosticKind::MissingPalette).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].palette.as_deref(), Some("accent"));
    assert_ne!(corrected.palette("primary"), record.palette("primary"));
}

#[test]
fn test_disabled_is_passthrough() {
    let record = fixture();
    let (corrected, diagnostics) = correct(&record, &CorrectionOptions::disabled());
    assert_eq!(corrected, record);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_correction_is_deterministic() {
    let record = fixture();
    let (first, _) = correct(&record, &CorrectionOptions::default());
    let (second, _) = correct(&record, &CorrectionOptions::default());
    assert_eq!(first, second);
    assert_eq!(first.to_json(true).unwrap(), second.to_json(true).unwrap());
}

#[test]
fn test_drifting_palette_scenario() {
    let record = ThemeRecord::from_json(
        r##"{"tonalPalettes": {"primary": {"10": "#1a0033", "50": "#7a3ff0", "90": "#e8d9ff"}}}"##,
    )
    .unwrap();
    let (corrected, _) = correct(&record, &CorrectionOptions::with_palettes(["primary"]));

    let reference = lch("#7a3ff0").h;
    let palette = corrected.palette("primary").unwrap();
    for (tone, bound) in [("10", 8.0), ("50", 5.0), ("90", 8.0)] {
        let color = palette.get(&ToneKey::from(tone)).unwrap();
        assert!(color.starts_with('#') && color.len() == 7, "{} is not hex", color);
        let hue = lch(color).hue_above(ACHROMATIC).unwrap();
        assert!(hue_difference(reference, hue).abs() <= bound, "tone {} at hue {}", tone, hue);
    }
    assert_eq!(palette.get(&ToneKey::from("50")), Some("#7a3ff0"));
    assert_ne!(palette.get(&ToneKey::from("10")), Some("#1a0033"));
}

#[test]
fn test_gray_palette_scenario() {
    let record = ThemeRecord::from_json(
        r##"{"tonalPalettes": {"primary": {"0": "#000000", "50": "#777777", "100": "#ffffff"}}}"##,
    )
    .unwrap();
    let (corrected, diagnostics) = correct(&record, &CorrectionOptions::with_palettes(["primary"]));

    assert_eq!(corrected, record);
    assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::UnresolvedReferenceHue));
}

// ============================================================================
// Scheme back-propagation
// ============================================================================

#[test]
fn test_container_role_takes_corrected_hue() {
    let record = fixture();
    let mut sink = NullSink;
    let correction =
        HueCorrector::default().correct(&record, &CorrectionOptions::default(), &mut sink);

    let role = correction.report.role("light", "primaryContainer").unwrap();
    assert_eq!(role.status, RoleStatus::Recolored);
    assert_eq!(role.palette.as_deref(), Some("primary"));
    assert_eq!(role.tone.as_ref().map(ToneKey::as_str), Some("90"));

    let tone_90 = correction.record.palette("primary").unwrap().get(&ToneKey::from("90")).unwrap();
    let corrected_hue = lch(tone_90).h;
    let original = lch("#EADDFF");
    let after = lch(correction.record.schemes.light.get("primaryContainer").unwrap());

    assert!(
        hue_difference(corrected_hue, after.h).abs() < 0.5,
        "role hue {} should follow tone 90 hue {}",
        after.h,
        corrected_hue
    );
    assert!(hue_difference(original.h, after.h).abs() > 0.5);
    assert!((after.l - original.l).abs() < 0.005);
}

#[test]
fn test_fixed_roles_are_untouched() {
    let record = fixture();
    let mut sink = NullSink;
    let correction =
        HueCorrector::default().correct(&record, &CorrectionOptions::default(), &mut sink);

    for (variant, scheme) in correction.record.schemes.iter() {
        let before = record.schemes.get(variant).unwrap();
        for role in ["scrim", "shadow", "primaryFixed", "onPrimaryFixed", "primaryFixedDim"] {
            assert_eq!(scheme.get(role), before.get(role), "{} {} changed", variant, role);
        }
    }
    assert_eq!(correction.report.role("dark", "scrim").unwrap().status, RoleStatus::FixedValue);
    assert_eq!(
        correction.report.role("light", "primaryFixedDim").unwrap().status,
        RoleStatus::FixedVariant
    );
}

#[test]
fn test_roles_from_uncorrected_palettes_are_untouched() {
    let record = fixture();
    let mut sink = NullSink;
    let correction =
        HueCorrector::default().correct(&record, &CorrectionOptions::default(), &mut sink);

    for role in ["background", "surface", "onSurfaceVariant", "outline", "inverseSurface"] {
        assert_eq!(
            correction.record.schemes.light.get(role),
            record.schemes.light.get(role),
            "{} changed",
            role
        );
        assert_eq!(
            correction.report.role("light", role).unwrap().status,
            RoleStatus::NotCorrected
        );
    }
    assert_eq!(correction.report.role("light", "onPrimary").unwrap().status, RoleStatus::Achromatic);
    assert_eq!(correction.record.schemes.light.get("onPrimary"), Some("#FFFFFF"));
}

#[test]
fn test_role_matching_source_tone_is_unchanged() {
    let record = fixture();
    let (corrected, _) = correct(&record, &CorrectionOptions::default());
    assert_eq!(corrected.schemes.light.get("primary"), Some("#6750A4"));
    assert_eq!(corrected.schemes.dark.get("inversePrimary"), Some("#6750A4"));
}

#[test]
fn test_scrim_survives_any_palette_selection() {
    let record = fixture();
    for palettes in [vec!["primary"], vec!["neutral", "neutralVariant"], vec![]] {
        let (corrected, _) = correct(&record, &CorrectionOptions::with_palettes(palettes));
        assert_eq!(corrected.schemes.light.get("scrim"), Some("#000000"));
        assert_eq!(corrected.schemes.dark.get("scrim"), Some("#000000"));
    }
}

#[test]
fn test_output_json_keeps_record_shape() {
    let record = fixture();
    let (corrected, _) = correct(&record, &CorrectionOptions::default());
    let json = corrected.to_json(false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["seed"], "#6750A4");
    assert_eq!(value["sourceColors"]["primary"], "#6750A4");
    assert!(value["tonalPalettes"]["neutralVariant"].is_object());
    assert!(value["schemes"]["light"]["onPrimaryContainer"].is_string());
    assert_eq!(ThemeRecord::from_json(&json).unwrap(), corrected);
}
