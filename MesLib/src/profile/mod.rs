//! Per-title codec configuration
//!
//! A profile bundles everything the text codec needs to know about one
//! game: the character table (the glyph order of the game's font), the
//! opcode table, the button/icon table, special-character overrides, and
//! encoding settings. Profiles live on disk as `profiles/<title>/` with a
//! `profile.toml` manifest and a `font.txt` character table.

mod loader;

pub use loader::{load_font_txt, write_font_txt};

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Entry-framing bytes that may never appear in the opcode table.
pub const RESERVED_CONTROL_BYTES: [u8; 3] = [0x01, 0x02, 0xFF];

/// Width of one character-table reference in the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharWidth {
    /// 16-bit references, biased by 0x8000.
    Two,
    /// 32-bit references, biased by 0x8000_0000.
    Four,
}

impl CharWidth {
    /// Construct from the manifest's `bytes_per_char` value.
    pub fn from_bytes_per_char(bytes: u8) -> Result<Self> {
        match bytes {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(Error::ProfileMalformed {
                reason: format!("bytes_per_char must be 2 or 4, got {other}"),
            }),
        }
    }

    /// The bias added to a character-table index on the wire.
    #[must_use]
    pub fn bias(self) -> u32 {
        match self {
            Self::Two => 0x8000,
            Self::Four => 0x8000_0000,
        }
    }
}

/// Encoding settings for one title.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSettings {
    /// Width of character-table references.
    pub char_width: CharWidth,
    /// Whether opcode 0x04 alternates 4-then-3 trailing argument bytes.
    pub asymmetric_color_code: bool,
}

/// One opcode-table row: symbolic name plus trailing argument count.
#[derive(Debug, Clone)]
pub struct OpcodeDef {
    /// Name used inside `<...>` tags.
    pub name: String,
    /// Number of raw argument bytes following the opcode.
    pub arg_count: usize,
}

/// Immutable per-title configuration, threaded through every codec call.
#[derive(Debug, Clone)]
pub struct Profile {
    characters: Vec<char>,
    opcodes: HashMap<u8, OpcodeDef>,
    buttons: HashMap<u32, String>,
    special_chars: HashMap<u32, char>,
    settings: ProfileSettings,

    // Reverse lookup tables, precomputed at construction.
    char_indexes: HashMap<char, u32>,
    opcode_bytes: HashMap<String, u8>,
    button_indexes: HashMap<String, u32>,
    special_char_indexes: HashMap<char, u32>,
}

impl Profile {
    /// Build a profile from its tables, validating the opcode table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProfileMalformed`] if the opcode table claims a
    /// reserved control byte or if two opcodes or buttons share a name.
    pub fn new(
        characters: Vec<char>,
        opcodes: HashMap<u8, OpcodeDef>,
        buttons: HashMap<u32, String>,
        special_chars: HashMap<u32, char>,
        settings: ProfileSettings,
    ) -> Result<Self> {
        for reserved in RESERVED_CONTROL_BYTES {
            if opcodes.contains_key(&reserved) {
                return Err(Error::ProfileMalformed {
                    reason: format!("opcode table claims reserved control byte {reserved:#04x}"),
                });
            }
        }

        let max_len = settings.char_width.bias() as usize;
        if characters.len() > max_len {
            return Err(Error::ProfileMalformed {
                reason: format!(
                    "character table length {} exceeds the reference range for this width ({max_len})",
                    characters.len()
                ),
            });
        }

        let mut opcode_bytes = HashMap::with_capacity(opcodes.len());
        for (&byte, def) in &opcodes {
            if opcode_bytes.insert(def.name.clone(), byte).is_some() {
                return Err(Error::ProfileMalformed {
                    reason: format!("duplicate opcode name '{}'", def.name),
                });
            }
        }

        let mut button_indexes = HashMap::with_capacity(buttons.len());
        for (&index, name) in &buttons {
            if button_indexes.insert(name.clone(), index).is_some() {
                return Err(Error::ProfileMalformed {
                    reason: format!("duplicate button name '{name}'"),
                });
            }
        }

        // First occurrence wins for duplicated glyphs.
        let mut char_indexes = HashMap::with_capacity(characters.len());
        for (index, &ch) in characters.iter().enumerate() {
            char_indexes.entry(ch).or_insert(index as u32);
        }

        let special_char_indexes = special_chars.iter().map(|(&i, &c)| (c, i)).collect();

        Ok(Self {
            characters,
            opcodes,
            buttons,
            special_chars,
            settings,
            char_indexes,
            opcode_bytes,
            button_indexes,
            special_char_indexes,
        })
    }

    /// Load the profile for `title` from a `profiles/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProfileNotFound`] if `profiles_dir/title` does not
    /// exist, or [`Error::ProfileMalformed`] if the manifest or character
    /// table is absent or unusable.
    pub fn load<P: AsRef<Path>>(profiles_dir: P, title: &str) -> Result<Self> {
        loader::load_profile(profiles_dir.as_ref(), title)
    }

    /// The encoding settings.
    #[must_use]
    pub fn settings(&self) -> ProfileSettings {
        self.settings
    }

    /// Number of glyphs in the character table.
    #[must_use]
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// Glyph at `index` in the character table.
    pub fn character_at(&self, index: u32) -> Result<char> {
        self.characters
            .get(index as usize)
            .copied()
            .ok_or(Error::CharIndexOutOfRange {
                index,
                table_len: self.characters.len(),
            })
    }

    /// First character-table index holding `glyph`, if any.
    #[must_use]
    pub fn index_of_character(&self, glyph: char) -> Option<u32> {
        self.char_indexes.get(&glyph).copied()
    }

    /// Opcode-table row for `byte`, if any.
    #[must_use]
    pub fn opcode_for(&self, byte: u8) -> Option<&OpcodeDef> {
        self.opcodes.get(&byte)
    }

    /// Opcode byte for a tag `name`, if any.
    #[must_use]
    pub fn opcode_byte_for(&self, name: &str) -> Option<u8> {
        self.opcode_bytes.get(name).copied()
    }

    /// Button name for a character-table `index`, if any.
    #[must_use]
    pub fn button_name_for(&self, index: u32) -> Option<&str> {
        self.buttons.get(&index).map(String::as_str)
    }

    /// Character-table index for a button `name`, if any.
    #[must_use]
    pub fn index_of_button(&self, name: &str) -> Option<u32> {
        self.button_indexes.get(name).copied()
    }

    /// Special-character override for `index`, if any.
    #[must_use]
    pub fn special_char_for(&self, index: u32) -> Option<char> {
        self.special_chars.get(&index).copied()
    }

    /// Override index for `glyph`, if any.
    #[must_use]
    pub fn index_of_special_char(&self, glyph: char) -> Option<u32> {
        self.special_char_indexes.get(&glyph).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> ProfileSettings {
        ProfileSettings {
            char_width: CharWidth::Two,
            asymmetric_color_code: false,
        }
    }

    #[test]
    fn test_reserved_control_byte_rejected() {
        let mut opcodes = HashMap::new();
        opcodes.insert(
            0x01,
            OpcodeDef {
                name: "Bad".to_string(),
                arg_count: 0,
            },
        );
        let result = Profile::new(vec!['a'], opcodes, HashMap::new(), HashMap::new(), settings());
        assert!(matches!(result, Err(Error::ProfileMalformed { .. })));
    }

    #[test]
    fn test_duplicate_opcode_name_rejected() {
        let mut opcodes = HashMap::new();
        opcodes.insert(
            0x04,
            OpcodeDef {
                name: "Color".to_string(),
                arg_count: 3,
            },
        );
        opcodes.insert(
            0x05,
            OpcodeDef {
                name: "Color".to_string(),
                arg_count: 0,
            },
        );
        let result = Profile::new(vec!['a'], opcodes, HashMap::new(), HashMap::new(), settings());
        assert!(matches!(result, Err(Error::ProfileMalformed { .. })));
    }

    #[test]
    fn test_duplicate_glyph_first_occurrence_wins() {
        let profile = Profile::new(
            vec!['a', 'b', 'a'],
            HashMap::new(),
            HashMap::new(),
            HashMap::new(),
            settings(),
        )
        .unwrap();
        assert_eq!(profile.index_of_character('a'), Some(0));
        assert_eq!(profile.character_at(2).unwrap(), 'a');
    }

    #[test]
    fn test_character_index_out_of_range() {
        let profile = Profile::new(
            vec!['a'],
            HashMap::new(),
            HashMap::new(),
            HashMap::new(),
            settings(),
        )
        .unwrap();
        let err = profile.character_at(5).unwrap_err();
        assert!(matches!(
            err,
            Error::CharIndexOutOfRange { index: 5, table_len: 1 }
        ));
    }

    #[test]
    fn test_char_width_bias() {
        assert_eq!(CharWidth::Two.bias(), 0x8000);
        assert_eq!(CharWidth::Four.bias(), 0x8000_0000);
        assert!(CharWidth::from_bytes_per_char(3).is_err());
    }
}
