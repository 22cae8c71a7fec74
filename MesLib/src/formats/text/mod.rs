//! Script text instruction streams
//!
//! The bidirectional codec between packed binary instruction streams and
//! the annotated text representation translators edit. Both script
//! containers (MSB and SCX) frame entries differently but share this
//! encoding, so the codec knows nothing about offset tables; it operates
//! on a cursor positioned at one entry's first byte.
//!
//! Instruction streams are big-endian throughout, unlike the little-endian
//! container framing around them.
//!
//! # Annotated strings
//!
//! Decoded text is plain Unicode interspersed with tags: `<Name>` for a
//! zero-argument opcode or a button reference, `<Name:1,2,3>` for an
//! opcode with arguments (unsigned bytes, rendered decimal). `\n` stands
//! for the explicit line-break byte.

mod decoder;
mod encoder;

pub use decoder::decode_entry;
pub use encoder::{EncodeReport, encode_entry};

/// Marks the start of a dialogue entry's speaker segment.
pub const SPEAKER_MARKER: u8 = 0x01;

/// Marks the start of an entry's body segment.
pub const BODY_MARKER: u8 = 0x02;

/// Terminates an entry's instruction stream.
pub const END_MARKER: u8 = 0xFF;

/// Explicit line break inside a text segment.
pub const LINE_BREAK: u8 = 0x00;

/// Offset-slot sentinel for an entry that owns no instruction stream.
pub const INVALID_OFFSET: u32 = 0xFFFF_FFFF;

/// The opcode subject to the 4-then-3 argument-count alternation.
pub const COLOR_OPCODE: u8 = 0x04;

/// Whether an entry carries a speaker segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    /// UI or system text with no speaker.
    #[default]
    Static,
    /// A spoken line with a named speaker.
    Dialogue,
}

impl EntryKind {
    /// Label used in translation tables.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dialogue => "dialogue",
        }
    }
}

/// One translatable unit decoded from a script container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Whether the entry has a speaker segment.
    pub kind: EntryKind,
    /// True when the offset slot held [`INVALID_OFFSET`]. Invalid entries
    /// own no instruction stream and encode to zero bytes.
    pub is_invalid: bool,
    /// Speaker name as annotated text (empty for static entries).
    pub speaker: String,
    /// The primary translatable text.
    pub body: String,
    /// Opcode residue appearing before the speaker/body markers in some
    /// titles; preserved and re-emitted first on encode.
    pub static_code: String,
    /// Container-dependent slot value carried through unchanged.
    pub raw_unk: u32,
}

impl ScriptEntry {
    /// An entry whose offset slot held the invalid sentinel.
    #[must_use]
    pub fn invalid(raw_unk: u32) -> Self {
        Self {
            is_invalid: true,
            raw_unk,
            ..Self::default()
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;

    use crate::profile::{CharWidth, OpcodeDef, Profile, ProfileSettings};

    /// `['A', 'B', 'C']` and a zero-argument `NextLine`, 2-byte references.
    pub(crate) fn simple_profile() -> Profile {
        let mut opcodes = HashMap::new();
        opcodes.insert(
            0x00,
            OpcodeDef {
                name: "NextLine".to_string(),
                arg_count: 0,
            },
        );
        Profile::new(
            vec!['A', 'B', 'C'],
            opcodes,
            HashMap::new(),
            HashMap::new(),
            ProfileSettings {
                char_width: CharWidth::Two,
                asymmetric_color_code: false,
            },
        )
        .unwrap()
    }

    /// Lowercase alphabet, `Color`/`Center` opcodes, one button over index 3,
    /// one special character at index 0x7F.
    pub(crate) fn full_profile(asymmetric_color: bool, char_width: CharWidth) -> Profile {
        let mut opcodes = HashMap::new();
        opcodes.insert(
            0x00,
            OpcodeDef {
                name: "NextLine".to_string(),
                arg_count: 0,
            },
        );
        opcodes.insert(
            0x04,
            OpcodeDef {
                name: "Color".to_string(),
                arg_count: 3,
            },
        );
        opcodes.insert(
            0x0F,
            OpcodeDef {
                name: "Center".to_string(),
                arg_count: 0,
            },
        );
        opcodes.insert(
            0x11,
            OpcodeDef {
                name: "InputInit".to_string(),
                arg_count: 2,
            },
        );

        let mut buttons = HashMap::new();
        buttons.insert(3, "BUTTON_A".to_string());

        let mut special_chars = HashMap::new();
        special_chars.insert(0x7F, '\u{2009}');

        Profile::new(
            ('a'..='z').collect(),
            opcodes,
            buttons,
            special_chars,
            ProfileSettings {
                char_width,
                asymmetric_color_code: asymmetric_color,
            },
        )
        .unwrap()
    }
}
