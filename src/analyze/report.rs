use super::{DriftReport, PaletteDrift};
use crate::corrector::HueSource;

/// Format a drift report as text.
pub fn format_report_text(report: &DriftReport) -> String {
    let mut output = String::new();

    output.push_str("Hue Drift Report\n");
    output.push_str("================\n");
    if report.corrected {
        output.push_str("Record: corrected\n");
    }
    output.push_str(&format!("Palettes analyzed: {}\n", report.palettes.len()));
    output.push_str(&format!("Tones out of bound: {}\n", report.out_of_bound()));
    output.push('\n');

    for palette in &report.palettes {
        format_palette(&mut output, palette);
        output.push('\n');
    }

    output
}

fn format_palette(output: &mut String, palette: &PaletteDrift) {
    let title = palette.name.to_uppercase();
    output.push_str(&format!("{}\n", title));
    output.push_str(&format!("{}\n", "─".repeat(title.chars().count())));

    let Some(reference) = &palette.reference else {
        output.push_str("  no usable hue (achromatic palette)\n");
        return;
    };
    let source = match &reference.source {
        HueSource::SourceColor { color } => format!("source color {}", color),
        HueSource::Tone { tone, .. } => format!("tone {}", tone),
        HueSource::WeakTone { tone, .. } => format!("tone {} (weak)", tone),
    };
    output.push_str(&format!("  reference hue {:.2}° from {}\n", reference.hue, source));
    output.push_str(&format!(
        "  max deviation {:.2}°, mean {:.2}°\n",
        palette.max_deviation(),
        palette.mean_deviation()
    ));

    for tone in &palette.tones {
        let deviation = match tone.deviation {
            Some(d) => format!("{:+7.2}°", d),
            None => "       -".to_string(),
        };
        let flag = if tone.within_bound { "" } else { "  out of bound" };
        output.push_str(&format!(
            "  {:>5}  {:<10} L {:.3}  C {:.3}  {} (±{}){}\n",
            tone.tone.as_str(),
            tone.color,
            tone.lightness,
            tone.chroma,
            deviation,
            tone.bound,
            flag
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze_record;
    use crate::corrector::HueCorrector;
    use crate::diagnostics::NullSink;
    use crate::models::ThemeRecord;

    #[test]
    fn test_format_report_text() {
        let record = ThemeRecord::from_json(
            r##"{"tonalPalettes": {
                "primary": {"50": "#7a3ff0", "90": "#f7daf3"},
                "neutral": {"50": "#777777"}
            }}"##,
        )
        .unwrap();
        let report = analyze_record(&record, None, &HueCorrector::default(), &mut NullSink);
        let text = format_report_text(&report);
        assert!(text.starts_with("Hue Drift Report\n"));
        assert!(text.contains("Palettes analyzed: 2"));
        assert!(text.contains("PRIMARY"));
        assert!(text.contains("from tone 50"));
        assert!(text.contains("out of bound"));
        assert!(text.contains("no usable hue"));
    }
}
