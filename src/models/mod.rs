//! Data models for generator records (tonal palettes, schemes, source colors)

mod palette;
mod record;

pub use palette::{TonalPalette, ToneKey};
pub use record::{RecordError, Scheme, Schemes, ThemeRecord};
