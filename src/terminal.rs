//! Terminal rendering of palettes and schemes
//!
//! Provides ANSI escape sequence generation for previewing tonal palettes
//! and scheme roles as true-color swatches in terminal emulators that support
//! 24-bit color.

use crate::color::{parse_color, Oklch};
use crate::models::{Scheme, TonalPalette};
use image::Rgba;

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// Width of one tone swatch, in terminal cells
const SWATCH_WIDTH: usize = 5;

/// Convert RGBA color to ANSI 24-bit background escape sequence.
///
/// Transparent colors (alpha = 0) are rendered as a dark gray background
/// to visually distinguish them from opaque colors.
///
/// # Examples
///
/// ```
/// use huelock::terminal::color_to_ansi_bg;
/// use image::Rgba;
///
/// // Opaque red
/// let red = color_to_ansi_bg(Rgba([255, 0, 0, 255]));
/// assert_eq!(red, "\x1b[48;2;255;0;0m");
///
/// // Transparent (renders as dark gray)
/// let transparent = color_to_ansi_bg(Rgba([0, 0, 0, 0]));
/// assert_eq!(transparent, "\x1b[48;5;236m");
/// ```
pub fn color_to_ansi_bg(rgba: Rgba<u8>) -> String {
    if rgba[3] == 0 {
        "\x1b[48;5;236m".to_string()
    } else {
        format!("\x1b[48;2;{};{};{}m", rgba[0], rgba[1], rgba[2])
    }
}

/// Foreground escape for text drawn on top of `background`: black on
/// light colors, white on dark ones.
pub fn contrasting_fg(background: Rgba<u8>) -> &'static str {
    if Oklch::from_rgba(background).l > 0.65 {
        "\x1b[38;2;0;0;0m"
    } else {
        "\x1b[38;2;255;255;255m"
    }
}

/// Unparseable colors are shown as mid gray.
fn swatch_color(color: &str) -> Rgba<u8> {
    parse_color(color).unwrap_or(Rgba([128, 128, 128, 255]))
}

/// Render one palette as a row of labelled swatches.
///
/// The tone keys are printed inside the swatches, so a row reads like
/// ` 0   10   20  ...` on the palette's own colors.
pub fn render_palette_row(name: &str, palette: &TonalPalette, label_width: usize) -> String {
    let mut output = format!("{:<width$} ", name, width = label_width);
    for (tone, color) in palette.iter() {
        let rgba = swatch_color(color);
        output.push_str(&color_to_ansi_bg(rgba));
        output.push_str(contrasting_fg(rgba));
        output.push_str(&format!("{:^width$}", tone.as_str(), width = SWATCH_WIDTH));
        output.push_str(ANSI_RESET);
    }
    output.push('\n');
    output
}

/// Render a scheme as one line per role: swatch, role name, color.
///
/// When `previous` is given, roles whose color differs are shown with the
/// previous swatch and color alongside.
pub fn render_scheme(name: &str, scheme: &Scheme, previous: Option<&Scheme>) -> String {
    let mut output = format!("{}\n", name);
    let width = scheme.iter().map(|(role, _)| role.len()).max().unwrap_or(0);

    for (role, color) in scheme.iter() {
        output.push_str("  ");
        let before = previous.and_then(|p| p.get(role)).filter(|&b| b != color);
        if let Some(before) = before {
            output.push_str(&color_to_ansi_bg(swatch_color(before)));
            output.push_str("  ");
            output.push_str(ANSI_RESET);
        }
        output.push_str(&color_to_ansi_bg(swatch_color(color)));
        output.push_str("    ");
        output.push_str(ANSI_RESET);
        if before.is_none() && previous.is_some() {
            output.push_str("  ");
        }
        output.push_str(&format!(" {:<width$}  {}", role, color, width = width));
        if let Some(before) = before {
            output.push_str(&format!("  (was {})", before));
        }
        output.push('\n');
    }
    output
}
