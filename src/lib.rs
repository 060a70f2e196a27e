//! huelock - Hue-preserving correction for Material tonal palettes
//!
//! This library provides functionality to:
//! - Convert colors to and from OKLCH and map them into the sRGB gamut
//! - Pull every tone of a tonal palette back onto the palette's reference hue
//! - Back-propagate corrected tones into light, dark and contrast schemes
//! - Measure hue drift and preview palettes as terminal or PNG swatches

pub mod analyze;
pub mod cli;
pub mod color;
pub mod config;
pub mod corrector;
pub mod diagnostics;
pub mod models;
pub mod output;
pub mod roles;
pub mod terminal;

#[cfg(feature = "wasm")]
pub mod wasm;
