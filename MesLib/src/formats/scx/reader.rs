//! SCX file reading and parsing

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use super::{HEADER_SIZE, SCX_MAGIC, ScxScript};
use crate::error::{Error, Result};
use crate::formats::text::{INVALID_OFFSET, ScriptEntry, decode_entry};
use crate::io::read_magic;
use crate::profile::Profile;

/// Read an SCX script from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// whatever [`parse_scx_bytes`] returns for the content.
pub fn read_scx<P: AsRef<Path>>(path: P, profile: &Profile) -> Result<ScxScript> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_scx_bytes(&buffer, profile)
}

/// Parse SCX data from bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidScxMagic`] on the wrong file kind,
/// [`Error::ScxTableOutOfBounds`] when the header offsets are
/// inconsistent, [`Error::EntryOffsetOutOfBounds`] for a slot pointing
/// outside the file, and any text-codec error for a malformed
/// instruction stream.
pub fn parse_scx_bytes(data: &[u8], profile: &Profile) -> Result<ScxScript> {
    let mut cursor = Cursor::new(data);
    let file_size = data.len() as u64;

    let magic = read_magic(&mut cursor)?;
    if &magic != SCX_MAGIC {
        return Err(Error::InvalidScxMagic(magic));
    }

    let text_table_offset = cursor.read_u32::<LittleEndian>()?;
    let second_table_offset = cursor.read_u32::<LittleEndian>()?;

    if text_table_offset < HEADER_SIZE
        || second_table_offset < text_table_offset
        || u64::from(second_table_offset) > file_size
    {
        return Err(Error::ScxTableOutOfBounds {
            text_table: text_table_offset,
            second_table: second_table_offset,
            file_size,
        });
    }

    let entry_count = ((second_table_offset - text_table_offset) / 4) as usize;

    let mut script_data = vec![0u8; (text_table_offset - HEADER_SIZE) as usize];
    cursor.read_exact(&mut script_data)?;

    let mut offsets = Vec::with_capacity(entry_count);
    for _ in 0..entry_count {
        offsets.push(cursor.read_u32::<LittleEndian>()?);
    }

    // The unknown table runs up to the first live entry. A leading run of
    // invalid slots carries no stream data, so the bound comes from the
    // first slot that is not the sentinel.
    let unk_table_end = match offsets.iter().position(|&o| o != INVALID_OFFSET) {
        Some(index) => {
            let offset = u64::from(offsets[index]);
            if offset < u64::from(second_table_offset) || offset > file_size {
                return Err(Error::EntryOffsetOutOfBounds {
                    index,
                    offset,
                    stream_size: file_size,
                });
            }
            offset
        }
        None => file_size,
    };

    let mut unk_table = vec![0u8; (unk_table_end - u64::from(second_table_offset)) as usize];
    cursor.read_exact(&mut unk_table)?;

    let mut entries = Vec::with_capacity(entry_count);
    for (index, offset) in offsets.into_iter().enumerate() {
        if offset == INVALID_OFFSET {
            entries.push(ScriptEntry::invalid(0));
            continue;
        }

        if u64::from(offset) >= file_size {
            return Err(Error::EntryOffsetOutOfBounds {
                index,
                offset: u64::from(offset),
                stream_size: file_size,
            });
        }

        cursor.seek(SeekFrom::Start(u64::from(offset)))?;
        entries.push(decode_entry(&mut cursor, profile)?);
    }

    Ok(ScxScript {
        script_data,
        unk_table,
        entries,
    })
}
