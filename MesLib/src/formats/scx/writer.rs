//! SCX file writing
//!
//! Same two-pass layout as the MSB writer, with absolute slot offsets:
//! every entry is encoded first, then header, bytecode, slots, unknown
//! table, and streams are emitted forward. The opaque regions are copied
//! through untouched.

use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{HEADER_SIZE, SCX_MAGIC, ScxScript};
use crate::error::Result;
use crate::formats::text::{EncodeReport, INVALID_OFFSET, encode_entry};
use crate::profile::Profile;

/// Write an SCX script to disk.
///
/// Returns the encode diagnostics so callers can surface dropped glyphs.
///
/// # Errors
///
/// Returns any text-codec error for malformed annotated text, or
/// [`Error::Io`] if the file cannot be written.
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_scx<P: AsRef<Path>>(
    path: P,
    script: &ScxScript,
    profile: &Profile,
) -> Result<EncodeReport> {
    let mut report = EncodeReport::default();
    let bytes = scx_to_bytes(script, profile, &mut report)?;
    fs::write(path, bytes)?;
    Ok(report)
}

/// Serialize an SCX script to bytes.
pub fn scx_to_bytes(
    script: &ScxScript,
    profile: &Profile,
    report: &mut EncodeReport,
) -> Result<Vec<u8>> {
    let entry_count = script.entries.len() as u32;
    let text_table_offset = HEADER_SIZE + script.script_data.len() as u32;
    let second_table_offset = text_table_offset + 4 * entry_count;
    let stream_start = second_table_offset + script.unk_table.len() as u32;

    // Pass 1: encode every entry to learn the absolute slot offsets.
    let mut stream = Vec::new();
    let mut slots = Vec::with_capacity(script.entries.len());
    for entry in &script.entries {
        if entry.is_invalid {
            slots.push(INVALID_OFFSET);
            continue;
        }
        slots.push(stream_start + stream.len() as u32);
        stream.extend(encode_entry(entry, profile, report)?);
    }

    // Pass 2: header, bytecode, slots, unknown table, streams.
    let mut out = Vec::with_capacity(stream_start as usize + stream.len());
    out.extend_from_slice(SCX_MAGIC);
    out.write_u32::<LittleEndian>(text_table_offset)?;
    out.write_u32::<LittleEndian>(second_table_offset)?;
    out.extend_from_slice(&script.script_data);
    for slot in slots {
        out.write_u32::<LittleEndian>(slot)?;
    }
    out.extend_from_slice(&script.unk_table);
    out.extend_from_slice(&stream);
    Ok(out)
}
