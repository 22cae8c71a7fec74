//! Instruction-stream decoding
//!
//! One entry's stream is a byte-driven state machine: an optional run of
//! leading opcode residue, an optional `0x01` speaker segment, a `0x02`
//! body segment (or an unprefixed body for plain UI text), and a `0xFF`
//! terminator. Text segments share one sub-decoder that stops at any of
//! the three framing bytes and hands the terminator back to the caller.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

use super::{
    BODY_MARKER, COLOR_OPCODE, END_MARKER, EntryKind, LINE_BREAK, SPEAKER_MARKER, ScriptEntry,
};
use crate::error::{Error, Result};
use crate::profile::{CharWidth, Profile};

/// Decode one entry from a cursor positioned at its first stream byte.
///
/// The entry's `raw_unk` is slot data the container owns; it is left at
/// zero here and filled in by the container reader.
///
/// # Errors
///
/// Returns [`Error::UnknownOpcode`] on a byte that is neither framing,
/// a character reference, nor in the profile's opcode table, and
/// [`Error::CharIndexOutOfRange`] on a reference past the character
/// table. Both are fatal for the file: framing after either cannot be
/// trusted.
pub fn decode_entry<R: Read + Seek>(reader: &mut R, profile: &Profile) -> Result<ScriptEntry> {
    let mut entry = ScriptEntry::default();
    let mut pending_body: Option<String> = None;
    let mut pending_before_speaker = false;

    let mut val = reader.read_u8()?;
    loop {
        match val {
            SPEAKER_MARKER => {
                entry.kind = EntryKind::Dialogue;
                let (text, term) = decode_segment(reader, profile)?;
                entry.speaker = text;
                val = term;
            }
            BODY_MARKER => {
                // Text decoded before any speaker marker is opcode residue,
                // not the body.
                if pending_before_speaker {
                    if let Some(text) = pending_body.take() {
                        entry.static_code = text;
                    }
                    pending_before_speaker = false;
                }
                let (text, term) = decode_segment(reader, profile)?;
                pending_body = Some(text);
                val = term;
            }
            END_MARKER => break,
            _ => {
                // Unprefixed text: rewind so the sub-decoder sees the byte.
                reader.seek(SeekFrom::Current(-1))?;
                let (text, term) = decode_segment(reader, profile)?;
                pending_before_speaker = true;
                pending_body = Some(text);
                val = term;
            }
        }
    }

    entry.body = pending_body.unwrap_or_default();
    Ok(entry)
}

/// Decode one text segment up to (and consuming) a framing byte, which is
/// returned alongside the text for the caller to dispatch on.
fn decode_segment<R: Read + Seek>(reader: &mut R, profile: &Profile) -> Result<(String, u8)> {
    let settings = profile.settings();
    // Resets per segment: each speaker/body/residue run starts "closed".
    let mut color_open = false;
    let mut text = String::new();

    loop {
        let val = reader.read_u8()?;
        match val {
            SPEAKER_MARKER | BODY_MARKER | END_MARKER => return Ok((text, val)),
            LINE_BREAK => text.push('\n'),
            v if v >= 0x80 => {
                reader.seek(SeekFrom::Current(-1))?;
                let index = read_char_reference(reader, settings.char_width)?;
                if let Some(name) = profile.button_name_for(index) {
                    text.push('<');
                    text.push_str(name);
                    text.push('>');
                } else if let Some(special) = profile.special_char_for(index) {
                    text.push(special);
                } else {
                    text.push(profile.character_at(index)?);
                }
            }
            v => {
                let Some(def) = profile.opcode_for(v) else {
                    let offset = reader.stream_position()? - 1;
                    return Err(Error::UnknownOpcode { opcode: v, offset });
                };

                let mut arg_count = def.arg_count;
                if v == COLOR_OPCODE && settings.asymmetric_color_code {
                    arg_count = if color_open { 3 } else { 4 };
                    color_open = !color_open;
                }

                if arg_count == 0 {
                    text.push_str(&format!("<{}>", def.name));
                } else {
                    let mut args = Vec::with_capacity(arg_count);
                    for _ in 0..arg_count {
                        args.push(reader.read_u8()?.to_string());
                    }
                    text.push_str(&format!("<{}:{}>", def.name, args.join(",")));
                }
            }
        }
    }
}

/// Re-read a high-bit byte as a full character-table reference and strip
/// the bias.
fn read_char_reference<R: Read>(reader: &mut R, width: CharWidth) -> Result<u32> {
    let raw = match width {
        CharWidth::Two => u32::from(reader.read_u16::<BigEndian>()?),
        CharWidth::Four => reader.read_u32::<BigEndian>()?,
    };
    Ok(raw - width.bias())
}
