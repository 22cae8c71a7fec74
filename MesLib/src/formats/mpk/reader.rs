//! MPK file reading and parsing

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{HEADER_SIZE, MPK_MAGIC, MpkArchive, MpkEntry, PATH_FIELD_SIZE, RECORD_SIZE};
use crate::error::{Error, Result};
use crate::io::{read_magic, read_padded_string};

/// Read an MPK archive from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// whatever [`parse_mpk_bytes`] returns for the content.
pub fn read_mpk<P: AsRef<Path>>(path: P) -> Result<MpkArchive> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_mpk_bytes(&buffer)
}

/// Parse MPK data from bytes.
///
/// Payloads are captured exactly as stored; nothing is decompressed
/// until [`MpkEntry::extracted_data`] asks for it.
///
/// # Errors
///
/// Returns [`Error::InvalidMpkMagic`] on the wrong file kind,
/// [`Error::UnexpectedEof`] when the record table runs past the file,
/// and [`Error::EntryOffsetOutOfBounds`] for a payload outside the file.
pub fn parse_mpk_bytes(data: &[u8]) -> Result<MpkArchive> {
    let mut cursor = Cursor::new(data);
    let file_size = data.len() as u64;

    let magic = read_magic(&mut cursor)?;
    if &magic != MPK_MAGIC {
        return Err(Error::InvalidMpkMagic(magic));
    }

    let unk1 = cursor.read_u16::<LittleEndian>()?;
    let unk2 = cursor.read_u16::<LittleEndian>()?;
    let entry_count = cursor.read_u64::<LittleEndian>()?;
    let mut reserved = [0u8; 0x30];
    cursor.read_exact(&mut reserved)?;

    // Sanity-check the count against the file before trusting it.
    if HEADER_SIZE + entry_count.saturating_mul(RECORD_SIZE) > file_size {
        return Err(Error::UnexpectedEof);
    }
    let entry_count = entry_count as usize;

    let mut entries = Vec::with_capacity(entry_count);
    for index in 0..entry_count {
        cursor.seek(SeekFrom::Start(HEADER_SIZE + RECORD_SIZE * index as u64))?;

        let compress_flag = cursor.read_u32::<LittleEndian>()?;
        let record_index = cursor.read_u32::<LittleEndian>()?;
        let data_offset = cursor.read_u64::<LittleEndian>()?;
        let compressed_size = cursor.read_u64::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u64::<LittleEndian>()?;
        let path = read_padded_string(&mut cursor, PATH_FIELD_SIZE)?;

        let end = data_offset.saturating_add(compressed_size);
        if end > file_size {
            return Err(Error::EntryOffsetOutOfBounds {
                index,
                offset: data_offset,
                stream_size: file_size,
            });
        }

        entries.push(MpkEntry {
            compress_flag,
            index: record_index,
            uncompressed_size,
            path,
            data: data[data_offset as usize..end as usize].to_vec(),
        });
    }

    tracing::debug!("Parsed MPK archive with {} entries", entries.len());

    Ok(MpkArchive {
        unk1,
        unk2,
        reserved,
        entries,
    })
}
