//! MSB file writing
//!
//! Entries are re-encoded and laid out contiguously first, so every slot
//! offset is known before a single header byte goes out. The file is then
//! emitted in one forward pass.

use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use super::{HEADER_SIZE, MSB_MAGIC, MsbScript, SLOT_SIZE};
use crate::error::Result;
use crate::formats::text::{EncodeReport, INVALID_OFFSET, encode_entry};
use crate::profile::Profile;

/// Write an MSB script to disk.
///
/// Returns the encode diagnostics so callers can surface dropped glyphs.
///
/// # Errors
///
/// Returns any text-codec error for malformed annotated text, or
/// [`Error::Io`] if the file cannot be written.
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_msb<P: AsRef<Path>>(
    path: P,
    script: &MsbScript,
    profile: &Profile,
) -> Result<EncodeReport> {
    let mut report = EncodeReport::default();
    let bytes = msb_to_bytes(script, profile, &mut report)?;
    fs::write(path, bytes)?;
    Ok(report)
}

/// Serialize an MSB script to bytes.
pub fn msb_to_bytes(
    script: &MsbScript,
    profile: &Profile,
    report: &mut EncodeReport,
) -> Result<Vec<u8>> {
    let entry_count = script.entries.len() as u32;
    let stream_base = HEADER_SIZE + SLOT_SIZE * entry_count;

    // Pass 1: encode every entry to learn the slot offsets.
    let mut stream = Vec::new();
    let mut slots = Vec::with_capacity(script.entries.len());
    for entry in &script.entries {
        if entry.is_invalid {
            slots.push((entry.raw_unk, INVALID_OFFSET));
            continue;
        }
        slots.push((entry.raw_unk, stream.len() as u32));
        stream.extend(encode_entry(entry, profile, report)?);
    }

    // Pass 2: header, slot table, stream.
    let mut out = Vec::with_capacity(stream_base as usize + stream.len());
    out.extend_from_slice(MSB_MAGIC);
    out.write_u32::<LittleEndian>(script.unk)?;
    out.write_u32::<LittleEndian>(entry_count)?;
    out.write_u32::<LittleEndian>(stream_base)?;
    for (raw_unk, offset) in slots {
        out.write_u32::<LittleEndian>(raw_unk)?;
        out.write_u32::<LittleEndian>(offset)?;
    }
    out.extend_from_slice(&stream);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::super::reader::parse_msb_bytes;
    use super::*;
    use crate::formats::text::fixtures::simple_profile;
    use crate::formats::text::{EntryKind, ScriptEntry};
    use pretty_assertions::assert_eq;

    fn sample_script() -> MsbScript {
        MsbScript {
            unk: 0xDEAD,
            stream_base: 0,
            entries: vec![
                ScriptEntry {
                    body: "A\nB".to_string(),
                    raw_unk: 10,
                    ..ScriptEntry::default()
                },
                ScriptEntry::invalid(11),
                ScriptEntry {
                    kind: EntryKind::Dialogue,
                    speaker: "C".to_string(),
                    body: "AB".to_string(),
                    raw_unk: 12,
                    ..ScriptEntry::default()
                },
            ],
        }
    }

    #[test]
    fn test_round_trip() {
        let profile = simple_profile();
        let script = sample_script();

        let mut report = EncodeReport::default();
        let bytes = msb_to_bytes(&script, &profile, &mut report).unwrap();
        assert!(report.is_clean());

        let parsed = parse_msb_bytes(&bytes, &profile).unwrap();
        assert_eq!(parsed.unk, 0xDEAD);
        assert_eq!(parsed.stream_base, 16 + 8 * 3);
        assert_eq!(parsed.entries, script.entries);
    }

    #[test]
    fn test_slot_offsets_are_cumulative_lengths() {
        let profile = simple_profile();
        let script = sample_script();

        let mut report = EncodeReport::default();
        let bytes = msb_to_bytes(&script, &profile, &mut report).unwrap();

        // Entry 0 is "A\nB" plus the terminator: 6 bytes. Entry 1 is
        // invalid and takes no stream space, so entry 2 starts at 6.
        let slot = |i: usize| {
            let base = 16 + 8 * i;
            (
                u32::from_le_bytes(bytes[base..base + 4].try_into().unwrap()),
                u32::from_le_bytes(bytes[base + 4..base + 8].try_into().unwrap()),
            )
        };
        assert_eq!(slot(0), (10, 0));
        assert_eq!(slot(1), (11, INVALID_OFFSET));
        assert_eq!(slot(2), (12, 6));
    }

    #[test]
    fn test_bad_magic() {
        let profile = simple_profile();
        let err = parse_msb_bytes(b"NOPE\x00\x00\x00\x00", &profile).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMsbMagic(_)));
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let profile = simple_profile();
        let script = MsbScript {
            unk: 0,
            stream_base: 0,
            entries: vec![ScriptEntry::default()],
        };
        let mut report = EncodeReport::default();
        let mut bytes = msb_to_bytes(&script, &profile, &mut report).unwrap();

        // Point the only slot past the end of the file.
        bytes[20..24].copy_from_slice(&0x1000u32.to_le_bytes());
        let err = parse_msb_bytes(&bytes, &profile).unwrap_err();
        assert!(matches!(err, crate::Error::EntryOffsetOutOfBounds { index: 0, .. }));
    }
}
