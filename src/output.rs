//! PNG swatch sheets

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::color::parse_color;
use crate::models::TonalPalette;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Scaling would exceed the largest image we can allocate
    #[error("{width}x{height} image cannot be scaled by {factor}")]
    TooLarge { width: u32, height: u32, factor: u32 },
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Returns the image unchanged for a factor of 0 or 1.
pub fn scale_image(image: RgbaImage, factor: u32) -> Result<RgbaImage, OutputError> {
    if factor <= 1 {
        return Ok(image);
    }
    let (width, height) = image.dimensions();
    let too_large = OutputError::TooLarge { width, height, factor };
    let (Some(w), Some(h)) = (width.checked_mul(factor), height.checked_mul(factor)) else {
        return Err(too_large);
    };
    let bytes = (w as u64) * (h as u64) * 4;
    if usize::try_from(bytes).is_err() {
        return Err(too_large);
    }
    Ok(image::imageops::resize(&image, w, h, FilterType::Nearest))
}

/// One palette on the sheet, with its corrected version if there is one
#[derive(Debug, Clone, Copy)]
pub struct SwatchRow<'a> {
    pub original: &'a TonalPalette,
    pub corrected: Option<&'a TonalPalette>,
}

/// Render palettes as a sheet of one-pixel swatches.
///
/// Each palette takes one row, tones left to right; when a corrected version
/// is given it occupies the row directly below. Palettes are separated by a
/// transparent row. Colors that fail to parse are left transparent. Scale
/// the result with [`scale_image`] for viewing.
pub fn render_swatch_sheet(rows: &[SwatchRow<'_>]) -> RgbaImage {
    let width = rows
        .iter()
        .flat_map(|row| std::iter::once(row.original).chain(row.corrected))
        .map(TonalPalette::len)
        .max()
        .unwrap_or(0) as u32;
    let height: u32 = rows.iter().map(|row| 1 + row.corrected.is_some() as u32).sum::<u32>()
        + rows.len().saturating_sub(1) as u32;

    let mut image = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([0, 0, 0, 0]));
    let mut y = 0;
    for row in rows {
        paint_palette(&mut image, row.original, y);
        y += 1;
        if let Some(corrected) = row.corrected {
            paint_palette(&mut image, corrected, y);
            y += 1;
        }
        y += 1;
    }
    image
}

fn paint_palette(image: &mut RgbaImage, palette: &TonalPalette, y: u32) {
    for (x, (_, color)) in palette.iter().enumerate() {
        if let Ok(rgba) = parse_color(color) {
            image.put_pixel(x as u32, y, rgba);
        }
    }
}
