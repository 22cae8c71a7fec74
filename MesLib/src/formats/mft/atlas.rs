//! Glyph atlas rendering
//!
//! Lays the glyph bitmaps out 64 per row, the same order as the
//! font.txt character table, so row/column in the PNG maps straight to
//! a table index.

use std::path::Path;

use image::GrayImage;

use super::{FontTable, GLYPHS_PER_ROW};
use crate::error::Result;

/// Render the font's glyphs into a grayscale atlas.
///
/// The atlas is sized by the cell directory (slot 2), padded up to a
/// full final row. Cells past the last glyph stay black.
#[must_use]
pub fn render_atlas(font: &FontTable) -> GrayImage {
    let glyph_width = u32::from(font.glyph_width);
    let glyph_height = u32::from(font.glyph_height);
    let glyph_size = font.glyph_size();

    let rows = (font.entries2.len() as u32).div_ceil(GLYPHS_PER_ROW);
    let width = GLYPHS_PER_ROW * glyph_width;
    let height = rows * glyph_height;

    GrayImage::from_fn(width, height, |x, y| {
        let cell = (y / glyph_height) * GLYPHS_PER_ROW + x / glyph_width;
        if cell >= font.glyph_count {
            return image::Luma([0]);
        }
        let offset = glyph_size * cell as usize
            + ((y % glyph_height) * glyph_width + x % glyph_width) as usize;
        image::Luma([font.glyph_data.get(offset).copied().unwrap_or(0)])
    })
}

/// Render the atlas and encode it as PNG bytes.
///
/// # Errors
/// Returns [`Error::PngEncodeFailed`] if encoding fails.
///
/// [`Error::PngEncodeFailed`]: crate::Error::PngEncodeFailed
pub fn atlas_png_bytes(font: &FontTable) -> Result<Vec<u8>> {
    let atlas = render_atlas(font);

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_data);
    atlas.write_with_encoder(encoder)?;
    Ok(png_data)
}

/// Render the atlas and write it to a PNG file.
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn write_atlas_png<P: AsRef<Path>>(font: &FontTable, path: P) -> Result<()> {
    let bytes = atlas_png_bytes(font)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
