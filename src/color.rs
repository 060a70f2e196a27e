//! Color parsing, hex formatting, and OKLCH conversion
//!
//! Supports the following input formats:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `blue`, `transparent`, etc.
//!
//! All hue work happens in OKLCH (the polar form of Björn Ottosson's OKLab),
//! with sRGB as the display gamut. Conversions come from the `palette`
//! crate; the chroma search on top of them lives here.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use palette::convert::FromColorUnclamped;
use palette::{Clamp, IsWithinBounds, LinSrgb, Oklab, Srgb};
use thiserror::Error;

/// Tolerance applied to linear sRGB channels when testing gamut membership.
///
/// Colors decoded from 8-bit hex land a few ulps outside `[0, 1]` after the
/// OKLab round trip; they must still count as displayable.
pub const GAMUT_EPSILON: f64 = 1e-6;

/// Bisection steps used by [`max_chroma`]. 32 halvings of 0.4 is well below
/// one 8-bit quantization step.
const CHROMA_SEARCH_ITERATIONS: u32 = 32;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

impl<T: std::fmt::Display> From<lightningcss::error::Error<T>> for ColorError {
    fn from(e: lightningcss::error::Error<T>) -> Self {
        ColorError::CssParse(e.to_string())
    }
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use huelock::color::parse_color;
///
/// let red = parse_color("#F00").unwrap();
/// assert_eq!(red, image::Rgba([255, 0, 0, 255]));
///
/// let green = parse_color("rgb(0, 255, 0)").unwrap();
/// assert_eq!(green, image::Rgba([0, 255, 0, 255]));
///
/// let blue = parse_color("blue").unwrap();
/// assert_eq!(blue, image::Rgba([0, 0, 255, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    // Fast path for hex colors, which is what generators emit
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

/// Parse the digits of a hex color (without the leading `#`)
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        3 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, 255])),
        4 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, digits[3] * 17])),
        6 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            255,
        ])),
        8 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            digits[6] * 16 + digits[7],
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit; callers have already validated the byte.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgba([
                unit_to_u8(rgb.r as f64),
                unit_to_u8(rgb.g as f64),
                unit_to_u8(rgb.b as f64),
                unit_to_u8(rgb.alpha as f64),
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

/// Format a color as lowercase hex.
///
/// Opaque colors use `#rrggbb`; anything with alpha below 255 keeps its
/// alpha byte as `#rrggbbaa`.
///
/// ```
/// use huelock::color::to_hex;
/// use image::Rgba;
///
/// assert_eq!(to_hex(Rgba([103, 80, 164, 255])), "#6750a4");
/// assert_eq!(to_hex(Rgba([0, 0, 0, 128])), "#00000080");
/// ```
pub fn to_hex(rgba: Rgba<u8>) -> String {
    let [r, g, b, a] = rgba.0;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Wrap a hue angle into `[0, 360)`.
pub fn normalize_hue(hue: f64) -> f64 {
    let h = hue.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Signed shortest angular distance from `from` to `to`, in `(-180, 180]`.
///
/// ```
/// use huelock::color::hue_difference;
///
/// assert_eq!(hue_difference(350.0, 10.0), 20.0);
/// assert_eq!(hue_difference(10.0, 350.0), -20.0);
/// ```
pub fn hue_difference(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// A color in OKLCH: lightness in `[0, 1]`, chroma `>= 0`, hue in degrees.
///
/// The hue of a color with (near) zero chroma is meaningless; use
/// [`Oklch::hue_above`] when the caller needs to know whether it is usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Oklch {
    pub fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c: c.max(0.0), h: normalize_hue(h) }
    }

    /// Convert an 8-bit sRGB color (alpha ignored).
    pub fn from_rgba(rgba: Rgba<u8>) -> Self {
        let [r, g, b, _] = rgba.0;
        Self::from_linear_srgb(Srgb::new(r, g, b).into_format::<f64>().into_linear())
    }

    pub fn from_linear_srgb(linear: LinSrgb<f64>) -> Self {
        let lch = palette::Oklch::from_color_unclamped(Oklab::from_color_unclamped(linear));
        Self::new(lch.l, lch.chroma, lch.hue.into_positive_degrees())
    }

    /// Linear sRGB; channels may fall outside `[0, 1]` when out of gamut.
    pub fn to_linear_srgb(&self) -> LinSrgb<f64> {
        LinSrgb::from_color_unclamped(self.to_oklab())
    }

    fn to_oklab(self) -> Oklab<f64> {
        Oklab::from_color_unclamped(palette::Oklch::new(self.l, self.c, self.h))
    }

    /// Cartesian OKLab `(a, b)` components.
    pub fn ab(&self) -> (f64, f64) {
        let lab = self.to_oklab();
        (lab.a, lab.b)
    }

    /// Quantize to 8-bit sRGB with the given alpha. Channels are clamped, so
    /// call this on in-gamut colors to avoid clipping artifacts.
    pub fn to_rgba(&self, alpha: u8) -> Rgba<u8> {
        let srgb: Srgb<f64> = Srgb::from_linear(self.to_linear_srgb().clamp());
        let (r, g, b) = srgb.into_components();
        Rgba([unit_to_u8(r), unit_to_u8(g), unit_to_u8(b), alpha])
    }

    /// Whether this color is displayable in sRGB, within [`GAMUT_EPSILON`].
    pub fn in_gamut(&self) -> bool {
        let linear = self.to_linear_srgb();
        if linear.is_within_bounds() {
            return true;
        }
        let clamped = linear.clamp();
        (linear.red - clamped.red).abs() <= GAMUT_EPSILON
            && (linear.green - clamped.green).abs() <= GAMUT_EPSILON
            && (linear.blue - clamped.blue).abs() <= GAMUT_EPSILON
    }

    /// The hue, if chroma exceeds `min_chroma`.
    pub fn hue_above(&self, min_chroma: f64) -> Option<f64> {
        if self.c > min_chroma {
            Some(self.h)
        } else {
            None
        }
    }

    pub fn with_hue(self, hue: f64) -> Self {
        Self::new(self.l, self.c, hue)
    }

    pub fn with_chroma(self, chroma: f64) -> Self {
        Self::new(self.l, chroma, self.h)
    }

    /// Reduce chroma (keeping lightness and hue) until the color is in gamut.
    ///
    /// Lightness outside `[0, 1]` is clamped first; gray is always
    /// displayable, so this always succeeds.
    pub fn clamp_to_gamut(self) -> Self {
        let clamped = Self::new(self.l.clamp(0.0, 1.0), self.c, self.h);
        if clamped.in_gamut() {
            return clamped;
        }
        clamped.with_chroma(max_chroma(clamped.l, clamped.h, clamped.c))
    }
}

/// Largest chroma, at most `limit`, that is displayable at this lightness and hue.
pub fn max_chroma(lightness: f64, hue: f64, limit: f64) -> f64 {
    if Oklch::new(lightness, limit, hue).in_gamut() {
        return limit;
    }

    let mut lo = 0.0;
    let mut hi = limit;
    for _ in 0..CHROMA_SEARCH_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        if Oklch::new(lightness, mid, hue).in_gamut() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#F008").unwrap(), Rgba([255, 0, 0, 136]));
        assert_eq!(parse_color("#6750A4").unwrap(), Rgba([103, 80, 164, 255]));
        assert_eq!(parse_color("#6750a480").unwrap(), Rgba([103, 80, 164, 128]));
        assert_eq!(parse_color("  #6750a4 ").unwrap(), Rgba([103, 80, 164, 255]));
    }

    #[test]
    fn test_parse_hex_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_parse_css_functional() {
        assert_eq!(parse_color("rgb(255, 0, 0)").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("hsl(0, 100%, 50%)").unwrap(), Rgba([255, 0, 0, 255]));
        assert!(parse_color("not-a-color").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(Rgba([255, 255, 255, 255])), "#ffffff");
        assert_eq!(to_hex(Rgba([1, 2, 3, 4])), "#01020304");
    }

    #[test]
    fn test_oklch_reference_values() {
        let white = Oklch::from_rgba(Rgba([255, 255, 255, 255]));
        assert!((white.l - 1.0).abs() < 1e-6);
        assert!(white.c < 1e-6);

        let black = Oklch::from_rgba(Rgba([0, 0, 0, 255]));
        assert!(black.l.abs() < 1e-9);

        // Published OKLCH of pure sRGB red: L 0.628, C 0.2577, H 29.23
        let red = Oklch::from_rgba(Rgba([255, 0, 0, 255]));
        assert!((red.l - 0.628).abs() < 1e-3);
        assert!((red.c - 0.2577).abs() < 1e-3);
        assert!((red.h - 29.23).abs() < 0.1);
    }

    #[test]
    fn test_hex_round_trip() {
        for hex in ["#6750a4", "#1a0033", "#e8d9ff", "#000000", "#ffffff", "#7f7f7f", "#00ff00"] {
            let rgba = parse_color(hex).unwrap();
            let lch = Oklch::from_rgba(rgba);
            assert!(lch.in_gamut(), "{} should be in gamut", hex);
            assert_eq!(to_hex(lch.to_rgba(255)), hex);
        }
    }

    #[test]
    fn test_gray_has_no_usable_hue() {
        let gray = Oklch::from_rgba(Rgba([119, 119, 119, 255]));
        assert!(gray.c < 1e-6);
        assert_eq!(gray.hue_above(0.001), None);
    }

    #[test]
    fn test_out_of_gamut_detection() {
        // Very high chroma at mid lightness is outside sRGB for every hue
        assert!(!Oklch::new(0.5, 0.4, 140.0).in_gamut());
        assert!(Oklch::new(0.5, 0.0, 140.0).in_gamut());
    }

    #[test]
    fn test_max_chroma_is_on_the_boundary() {
        let c = max_chroma(0.7, 140.0, 0.4);
        assert!(c > 0.05 && c < 0.4);
        assert!(Oklch::new(0.7, c, 140.0).in_gamut());
        assert!(!Oklch::new(0.7, c + 1e-3, 140.0).in_gamut());
    }

    #[test]
    fn test_max_chroma_respects_limit() {
        assert_eq!(max_chroma(0.6, 30.0, 0.01), 0.01);
        assert!(max_chroma(1.0, 30.0, 0.1) < 1e-4);
    }

    #[test]
    fn test_clamp_to_gamut() {
        let clamped = Oklch::new(0.9, 0.3, 300.0).clamp_to_gamut();
        assert!(clamped.in_gamut());
        assert_eq!(clamped.l, 0.9);
        assert_eq!(clamped.h, 300.0);
        assert!(clamped.c < 0.3);

        let over_bright = Oklch::new(1.2, 0.1, 10.0).clamp_to_gamut();
        assert_eq!(over_bright.l, 1.0);
        assert!(over_bright.in_gamut());
    }

    #[test]
    fn test_ab_components() {
        let (a, b) = Oklch::new(0.5, 0.1, 90.0).ab();
        assert!(a.abs() < 1e-12);
        assert!((b - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_hue_arithmetic() {
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(725.0), 5.0);
        assert_eq!(hue_difference(0.0, 180.0), 180.0);
        assert_eq!(hue_difference(100.0, 95.0), -5.0);
    }
}
