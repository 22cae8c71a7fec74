//! Instruction-stream encoding
//!
//! The inverse of the decoder: annotated text back to big-endian stream
//! bytes. Tags resolve against the opcode table first, then the button
//! table. Characters missing from the character table are dropped with a
//! diagnostic rather than failing the entry, so a partially translated
//! script still encodes.

use super::{BODY_MARKER, END_MARKER, EntryKind, LINE_BREAK, SPEAKER_MARKER, ScriptEntry};
use crate::error::{Error, Result};
use crate::profile::{CharWidth, Profile};

/// Diagnostics accumulated while encoding.
#[derive(Debug, Clone, Default)]
pub struct EncodeReport {
    /// Characters dropped because the character table lacks them.
    pub missing_glyphs: Vec<char>,
}

impl EncodeReport {
    /// True when nothing was dropped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing_glyphs.is_empty()
    }
}

/// Encode one entry back to instruction-stream bytes.
///
/// Invalid entries encode to zero bytes. Everything else is framed as
/// `static_code [0x01 speaker] 0x02 body 0xFF` for dialogue, with the
/// `0x02` kept for static entries that carry residue so the residue/body
/// boundary survives a re-decode.
///
/// # Errors
///
/// Returns [`Error::UnknownTag`], [`Error::UnterminatedTag`], or
/// [`Error::InvalidTagArgument`] for malformed annotated text. A missing
/// glyph is not an error; it is recorded in `report` and skipped.
pub fn encode_entry(
    entry: &ScriptEntry,
    profile: &Profile,
    report: &mut EncodeReport,
) -> Result<Vec<u8>> {
    if entry.is_invalid {
        return Ok(Vec::new());
    }

    let mut out = encode_segment(&entry.static_code, profile, report)?;
    match entry.kind {
        EntryKind::Dialogue => {
            out.push(SPEAKER_MARKER);
            out.extend(encode_segment(&entry.speaker, profile, report)?);
            out.push(BODY_MARKER);
        }
        EntryKind::Static => {
            if !entry.static_code.is_empty() {
                out.push(BODY_MARKER);
            }
        }
    }
    out.extend(encode_segment(&entry.body, profile, report)?);
    out.push(END_MARKER);
    Ok(out)
}

/// Encode one text segment (speaker, body, or residue) without framing.
fn encode_segment(text: &str, profile: &Profile, report: &mut EncodeReport) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 2);
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch == '<' {
            let mut tag = String::new();
            loop {
                match chars.next() {
                    Some('>') => break,
                    Some(c) => tag.push(c),
                    None => return Err(Error::UnterminatedTag(tag)),
                }
            }
            encode_tag(&tag, profile, &mut out)?;
        } else {
            encode_char(ch, profile, report, &mut out);
        }
    }
    Ok(out)
}

fn encode_tag(tag: &str, profile: &Profile, out: &mut Vec<u8>) -> Result<()> {
    let (name, args) = match tag.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (tag, None),
    };

    if let Some(byte) = profile.opcode_byte_for(name) {
        out.push(byte);
    } else if let Some(index) = profile.index_of_button(name) {
        push_char_reference(out, index, profile.settings().char_width);
    } else {
        return Err(Error::UnknownTag(tag.to_string()));
    }

    if let Some(args) = args {
        for arg in args.split(',') {
            let value: u8 = arg.parse().map_err(|_| Error::InvalidTagArgument {
                tag: tag.to_string(),
                value: arg.to_string(),
            })?;
            out.push(value);
        }
    }
    Ok(())
}

fn encode_char(ch: char, profile: &Profile, report: &mut EncodeReport, out: &mut Vec<u8>) {
    match ch {
        '\n' => out.push(LINE_BREAK),
        // Carriage returns are editor noise, never content.
        '\r' => {}
        _ => {
            let index = profile
                .index_of_special_char(ch)
                .or_else(|| profile.index_of_character(ch));
            if let Some(index) = index {
                push_char_reference(out, index, profile.settings().char_width);
            } else {
                tracing::warn!(
                    "Character '{}' (U+{:04X}) is not in the character table, skipping it",
                    ch,
                    u32::from(ch)
                );
                report.missing_glyphs.push(ch);
            }
        }
    }
}

fn push_char_reference(out: &mut Vec<u8>, index: u32, width: CharWidth) {
    let value = width.bias() + index;
    match width {
        CharWidth::Two => out.extend_from_slice(&(value as u16).to_be_bytes()),
        CharWidth::Four => out.extend_from_slice(&value.to_be_bytes()),
    }
}
