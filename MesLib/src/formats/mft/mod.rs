//! MFNT bitmap font format
//!
//! Holds the glyph bitmaps the character table indexes into: a fixed
//! header with glyph dimensions, six (offset, count) directory slots,
//! and a zlib block of 8-bit grayscale glyphs. Slots 3, 5, and 6 are
//! empty in every known file. Read-only; fonts are never written back.

mod atlas;
mod reader;

pub use atlas::{atlas_png_bytes, render_atlas, write_atlas_png};
pub use reader::{parse_mft_bytes, read_mft};

/// "MFNT" magic signature.
pub const MFT_MAGIC: &[u8; 4] = b"MFNT";

/// Glyphs per atlas row, same as the font.txt line width.
pub const GLYPHS_PER_ROW: u32 = 64;

/// A parsed MFNT font.
#[derive(Debug, Clone)]
pub struct FontTable {
    /// First header field of unknown meaning.
    pub unk1: u16,
    /// Second header field of unknown meaning.
    pub unk2: u16,
    /// Width of one glyph in pixels.
    pub glyph_width: u16,
    /// Height of one glyph in pixels.
    pub glyph_height: u16,
    /// Directory slot 1 payload, meaning unknown.
    pub entries1: Vec<u16>,
    /// Directory slot 2 payload, one value per glyph cell.
    pub entries2: Vec<u16>,
    /// Number of glyph bitmaps in [`Self::glyph_data`].
    pub glyph_count: u32,
    /// Decompressed glyph bitmaps, 8-bit grayscale, back to back.
    pub glyph_data: Vec<u8>,
}

impl FontTable {
    /// Size of one glyph bitmap in bytes.
    #[must_use]
    pub fn glyph_size(&self) -> usize {
        usize::from(self.glyph_width) * usize::from(self.glyph_height)
    }

    /// Get one glyph's pixels, or `None` past the glyph count.
    #[must_use]
    pub fn glyph(&self, index: u32) -> Option<&[u8]> {
        if index >= self.glyph_count {
            return None;
        }
        let size = self.glyph_size();
        let start = size * index as usize;
        self.glyph_data.get(start..start + size)
    }
}
