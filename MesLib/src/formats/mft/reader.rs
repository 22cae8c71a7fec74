//! MFNT file reading and parsing

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{FontTable, MFT_MAGIC};
use crate::error::{Error, Result};
use crate::io::read_magic;

/// Read an MFNT font from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// whatever [`parse_mft_bytes`] returns for the content.
pub fn read_mft<P: AsRef<Path>>(path: P) -> Result<FontTable> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_mft_bytes(&buffer)
}

/// Parse MFNT data from bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidMftMagic`] on the wrong file kind,
/// [`Error::MftSlotNotEmpty`] if a known-empty directory slot holds
/// entries, [`Error::ZlibDecompressionFailed`] for a corrupt glyph
/// block, and [`Error::SizeMismatch`] when the block is shorter than
/// the glyph count requires.
pub fn parse_mft_bytes(data: &[u8]) -> Result<FontTable> {
    let mut cursor = Cursor::new(data);

    let magic = read_magic(&mut cursor)?;
    if &magic != MFT_MAGIC {
        return Err(Error::InvalidMftMagic(magic));
    }

    let unk1 = cursor.read_u16::<LittleEndian>()?;
    let unk2 = cursor.read_u16::<LittleEndian>()?;
    let glyph_width = cursor.read_u16::<LittleEndian>()?;
    let glyph_height = cursor.read_u16::<LittleEndian>()?;
    let compressed_datasize = cursor.read_u32::<LittleEndian>()?;

    let mut slots = [(0u32, 0u32); 6];
    for slot in &mut slots {
        slot.0 = cursor.read_u32::<LittleEndian>()?;
        slot.1 = cursor.read_u32::<LittleEndian>()?;
    }
    for index in [2usize, 4, 5] {
        let (_, count) = slots[index];
        if count != 0 {
            return Err(Error::MftSlotNotEmpty {
                slot: index as u8 + 1,
                count,
            });
        }
    }

    let (offset1, count1) = slots[0];
    let (offset2, count2) = slots[1];
    let (offset4, count4) = slots[3];

    cursor.seek(SeekFrom::Start(u64::from(offset1)))?;
    let mut entries1 = Vec::with_capacity(count1 as usize);
    for _ in 0..count1 {
        entries1.push(cursor.read_u16::<LittleEndian>()?);
    }

    cursor.seek(SeekFrom::Start(u64::from(offset2)))?;
    let mut entries2 = Vec::with_capacity(count2 as usize);
    for _ in 0..count2 {
        entries2.push(cursor.read_u16::<LittleEndian>()?);
    }

    cursor.seek(SeekFrom::Start(u64::from(offset4)))?;
    let mut compressed = vec![0u8; compressed_datasize as usize];
    cursor.read_exact(&mut compressed)?;

    let glyph_data = {
        use flate2::read::ZlibDecoder;

        let mut decoder = ZlibDecoder::new(compressed.as_slice());
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| Error::ZlibDecompressionFailed {
                message: format!("glyph block: {e}"),
            })?;
        decompressed
    };

    let glyph_size = usize::from(glyph_width) * usize::from(glyph_height);
    let needed = glyph_size * count4 as usize;
    if glyph_data.len() < needed {
        return Err(Error::SizeMismatch {
            name: "MFNT glyph block".to_string(),
            expected: needed as u64,
            found: glyph_data.len() as u64,
        });
    }

    tracing::debug!(
        "Parsed MFNT font: {}x{} glyphs, {} bitmaps",
        glyph_width,
        glyph_height,
        count4
    );

    Ok(FontTable {
        unk1,
        unk2,
        glyph_width,
        glyph_height,
        entries1,
        entries2,
        glyph_count: count4,
        glyph_data,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use super::fixtures::build_mft;

    #[test]
    fn test_parse_round_trip() {
        let bytes = build_mft(3, 3);
        let font = parse_mft_bytes(&bytes).unwrap();

        assert_eq!(font.glyph_width, 2);
        assert_eq!(font.glyph_height, 2);
        assert_eq!(font.glyph_count, 3);
        assert_eq!(font.entries1, vec![0, 1, 2]);
        assert_eq!(font.entries2, vec![100, 101, 102]);
        assert_eq!(font.glyph_data.len(), 12);
        assert_eq!(font.glyph(0).unwrap(), &[1, 1, 1, 1]);
        assert_eq!(font.glyph(2).unwrap(), &[3, 3, 3, 3]);
        assert!(font.glyph(3).is_none());
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = build_mft(1, 1);
        bytes[..4].copy_from_slice(b"MPK\x00");

        assert!(matches!(
            parse_mft_bytes(&bytes),
            Err(Error::InvalidMftMagic(_))
        ));
    }

    #[test]
    fn test_populated_empty_slot_rejected() {
        let mut bytes = build_mft(1, 1);
        // Slot 3 count lives at 16 (fixed header) + 2 * 8 (slots 1, 2) + 4.
        bytes[36] = 5;

        let err = parse_mft_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::MftSlotNotEmpty { slot: 3, count: 5 }));
    }

    #[test]
    fn test_short_glyph_block_rejected() {
        let mut bytes = build_mft(2, 2);
        // Claim one more bitmap than the block holds (slot 4 count).
        bytes[44] = 3;

        assert!(matches!(
            parse_mft_bytes(&bytes),
            Err(Error::SizeMismatch { .. })
        ));
    }
}
