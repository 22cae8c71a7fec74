//! MPK file writing
//!
//! Payload offsets are computed up front from the record table size and
//! the 0x800 alignment rule, so the archive is emitted in one forward
//! pass with no seek-backs.

use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{DATA_ALIGNMENT, HEADER_SIZE, MPK_MAGIC, MpkArchive, PATH_FIELD_SIZE, RECORD_SIZE};
use crate::error::Result;
use crate::io::{align_up, write_padded_string};

/// Write an MPK archive to disk.
///
/// # Errors
///
/// Returns any serialization error from [`mpk_to_bytes`], or
/// [`Error::Io`] if the file cannot be written.
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_mpk<P: AsRef<Path>>(path: P, archive: &MpkArchive) -> Result<()> {
    let bytes = mpk_to_bytes(archive)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Serialize an MPK archive to bytes.
///
/// Record offsets and compressed sizes are recomputed from the payloads
/// actually held, so stale header fields cannot survive a rewrite.
///
/// # Errors
///
/// Returns [`Error::EntryPathTooLong`] if a path does not fit its
/// 0xE0-byte record field.
///
/// [`Error::EntryPathTooLong`]: crate::Error::EntryPathTooLong
pub fn mpk_to_bytes(archive: &MpkArchive) -> Result<Vec<u8>> {
    let record_table_end = HEADER_SIZE + RECORD_SIZE * archive.entries.len() as u64;

    // Pass 1: lay out the payload region.
    let mut offsets = Vec::with_capacity(archive.entries.len());
    let mut cursor = record_table_end;
    for entry in &archive.entries {
        let aligned = align_up(cursor, DATA_ALIGNMENT);
        offsets.push(aligned);
        cursor = aligned + entry.data.len() as u64;
    }

    // Pass 2: header, records, padded payloads.
    let mut out = Vec::with_capacity(cursor as usize);
    out.extend_from_slice(MPK_MAGIC);
    out.write_u16::<LittleEndian>(archive.unk1)?;
    out.write_u16::<LittleEndian>(archive.unk2)?;
    out.write_u64::<LittleEndian>(archive.entries.len() as u64)?;
    out.extend_from_slice(&archive.reserved);

    for (entry, offset) in archive.entries.iter().zip(&offsets) {
        out.write_u32::<LittleEndian>(entry.compress_flag)?;
        out.write_u32::<LittleEndian>(entry.index)?;
        out.write_u64::<LittleEndian>(*offset)?;
        out.write_u64::<LittleEndian>(entry.data.len() as u64)?;
        out.write_u64::<LittleEndian>(entry.uncompressed_size)?;
        write_padded_string(&mut out, &entry.path, PATH_FIELD_SIZE)?;
    }

    for (entry, offset) in archive.entries.iter().zip(&offsets) {
        out.resize(*offset as usize, 0);
        out.extend_from_slice(&entry.data);
    }

    Ok(out)
}
