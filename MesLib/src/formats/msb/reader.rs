//! MSB file reading and parsing

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{MSB_MAGIC, MsbScript};
use crate::error::{Error, Result};
use crate::formats::text::{INVALID_OFFSET, ScriptEntry, decode_entry};
use crate::io::read_magic;
use crate::profile::Profile;

/// Read an MSB script from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// whatever [`parse_msb_bytes`] returns for the content.
pub fn read_msb<P: AsRef<Path>>(path: P, profile: &Profile) -> Result<MsbScript> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_msb_bytes(&buffer, profile)
}

/// Parse MSB data from bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidMsbMagic`] on the wrong file kind,
/// [`Error::EntryOffsetOutOfBounds`] for a slot pointing outside the
/// file, and any text-codec error for a malformed instruction stream.
pub fn parse_msb_bytes(data: &[u8], profile: &Profile) -> Result<MsbScript> {
    let mut cursor = Cursor::new(data);

    let magic = read_magic(&mut cursor)?;
    if &magic != MSB_MAGIC {
        return Err(Error::InvalidMsbMagic(magic));
    }

    let unk = cursor.read_u32::<LittleEndian>()?;
    let entry_count = cursor.read_u32::<LittleEndian>()? as usize;
    let stream_base = cursor.read_u32::<LittleEndian>()?;

    let mut slots = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        let raw_unk = cursor.read_u32::<LittleEndian>()?;
        let offset = cursor.read_u32::<LittleEndian>()?;
        slots.push((raw_unk, offset));
    }

    let file_size = data.len() as u64;
    let stream_size = file_size.saturating_sub(u64::from(stream_base));

    let mut entries = Vec::with_capacity(entry_count);
    for (index, (raw_unk, offset)) in slots.into_iter().enumerate() {
        if offset == INVALID_OFFSET {
            entries.push(ScriptEntry::invalid(raw_unk));
            continue;
        }

        let start = u64::from(stream_base) + u64::from(offset);
        if start >= file_size {
            return Err(Error::EntryOffsetOutOfBounds {
                index,
                offset: u64::from(offset),
                stream_size,
            });
        }

        cursor.seek(SeekFrom::Start(start))?;
        let mut entry = decode_entry(&mut cursor, profile)?;
        entry.raw_unk = raw_unk;
        entries.push(entry);
    }

    Ok(MsbScript {
        unk,
        stream_base,
        entries,
    })
}
