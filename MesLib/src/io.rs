//! Shared binary I/O helpers
//!
//! Container framing in every MAGES format is little-endian while script
//! instruction streams are big-endian. Each read site picks its byte order
//! explicitly through `byteorder` type parameters; the helpers here cover
//! the few patterns the formats share.

use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Read a 4-byte magic signature.
pub fn read_magic<R: Read>(reader: &mut R) -> Result<[u8; 4]> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    Ok(magic)
}

/// Read a fixed-size, null-padded UTF-8 string field.
pub fn read_padded_string<R: Read>(reader: &mut R, field_size: usize) -> Result<String> {
    let mut buf = vec![0u8; field_size];
    reader.read_exact(&mut buf)?;
    let len = buf.iter().position(|&b| b == 0).unwrap_or(field_size);
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

/// Write a string into a fixed-size, null-padded field.
pub fn write_padded_string<W: Write>(writer: &mut W, text: &str, field_size: usize) -> Result<()> {
    let bytes = text.as_bytes();
    if bytes.len() > field_size {
        return Err(Error::EntryPathTooLong {
            path: text.to_string(),
            len: bytes.len(),
            max: field_size,
        });
    }
    writer.write_all(bytes)?;
    writer.write_all(&vec![0u8; field_size - bytes.len()])?;
    Ok(())
}

/// Round `offset` up to the next multiple of `alignment`.
#[must_use]
pub fn align_up(offset: u64, alignment: u64) -> u64 {
    offset.div_ceil(alignment) * alignment
}
