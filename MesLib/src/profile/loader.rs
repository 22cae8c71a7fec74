//! Profile manifest and character table loading
//!
//! A profile directory holds `profile.toml` (settings plus the opcode,
//! button, and special-character tables as arrays-of-tables) and
//! `font.txt` (the character table as plain text, one glyph per index,
//! newlines ignored).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{CharWidth, OpcodeDef, Profile, ProfileSettings};
use crate::error::{Error, Result};

/// Manifest file name inside a profile directory.
const MANIFEST_NAME: &str = "profile.toml";

/// Character table file name inside a profile directory.
const FONT_NAME: &str = "font.txt";

/// Glyphs per line when writing a character table.
const FONT_LINE_WIDTH: usize = 64;

#[derive(Debug, Deserialize)]
struct Manifest {
    settings: ManifestSettings,
    #[serde(default)]
    opcode: Vec<ManifestOpcode>,
    #[serde(default)]
    button: Vec<ManifestButton>,
    #[serde(default)]
    special_char: Vec<ManifestSpecialChar>,
}

#[derive(Debug, Deserialize)]
struct ManifestSettings {
    bytes_per_char: u8,
    #[serde(default)]
    asymmetric_color_code: bool,
}

#[derive(Debug, Deserialize)]
struct ManifestOpcode {
    byte: u8,
    name: String,
    #[serde(default)]
    args: usize,
}

#[derive(Debug, Deserialize)]
struct ManifestButton {
    index: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ManifestSpecialChar {
    index: u32,
    glyph: char,
}

pub(super) fn load_profile(profiles_dir: &Path, title: &str) -> Result<Profile> {
    let dir = profiles_dir.join(title);
    if !dir.is_dir() {
        return Err(Error::ProfileNotFound {
            title: title.to_string(),
        });
    }

    let manifest_text =
        fs::read_to_string(dir.join(MANIFEST_NAME)).map_err(|_| Error::ProfileMalformed {
            reason: format!("missing or unreadable {MANIFEST_NAME} in {}", dir.display()),
        })?;
    let manifest: Manifest = toml::from_str(&manifest_text)?;

    let characters = load_font_txt(dir.join(FONT_NAME)).map_err(|_| Error::ProfileMalformed {
        reason: format!("missing or unreadable {FONT_NAME} in {}", dir.display()),
    })?;

    let mut opcodes = HashMap::with_capacity(manifest.opcode.len());
    for row in manifest.opcode {
        let byte = row.byte;
        let def = OpcodeDef {
            name: row.name,
            arg_count: row.args,
        };
        if opcodes.insert(byte, def).is_some() {
            return Err(Error::ProfileMalformed {
                reason: format!("duplicate opcode byte {byte:#04x}"),
            });
        }
    }

    let mut buttons = HashMap::with_capacity(manifest.button.len());
    for row in manifest.button {
        if buttons.insert(row.index, row.name).is_some() {
            return Err(Error::ProfileMalformed {
                reason: format!("duplicate button index {:#x}", row.index),
            });
        }
    }

    let mut special_chars = HashMap::with_capacity(manifest.special_char.len());
    for row in manifest.special_char {
        if special_chars.insert(row.index, row.glyph).is_some() {
            return Err(Error::ProfileMalformed {
                reason: format!("duplicate special character index {:#x}", row.index),
            });
        }
    }

    let settings = ProfileSettings {
        char_width: CharWidth::from_bytes_per_char(manifest.settings.bytes_per_char)?,
        asymmetric_color_code: manifest.settings.asymmetric_color_code,
    };

    tracing::debug!(
        "Loaded profile '{}': {} glyphs, {} opcodes, {} buttons",
        title,
        characters.len(),
        opcodes.len(),
        buttons.len()
    );

    Profile::new(characters, opcodes, buttons, special_chars, settings)
}

/// Read a `font.txt` character table.
///
/// The file is UTF-8 with an optional BOM; line breaks are layout only and
/// carry no index, so they are stripped before indexing.
pub fn load_font_txt<P: AsRef<Path>>(path: P) -> Result<Vec<char>> {
    let text = fs::read_to_string(path)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(text.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// Write a `font.txt` character table, 64 glyphs per line.
pub fn write_font_txt<P: AsRef<Path>>(path: P, characters: &[char]) -> Result<()> {
    let mut out = String::with_capacity(characters.len() * 3 + 4);
    out.push('\u{feff}');
    for line in characters.chunks(FONT_LINE_WIDTH) {
        out.extend(line.iter());
        if line.len() == FONT_LINE_WIDTH {
            out.push('\n');
        }
    }
    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_profile(dir: &Path, manifest: &str, font: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(MANIFEST_NAME), manifest).unwrap();
        fs::write(dir.join(FONT_NAME), font).unwrap();
    }

    #[test]
    fn test_load_profile() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = r#"
[settings]
bytes_per_char = 2
asymmetric_color_code = true

[[opcode]]
byte = 0x00
name = "NextLine"

[[opcode]]
byte = 0x04
name = "Color"
args = 3

[[button]]
index = 0x65
name = "BUTTON_A"

[[special_char]]
index = 0x7F
glyph = "\u2009"
"#;
        write_profile(&tmp.path().join("switch"), manifest, "\u{feff}abc\ndef\n");

        let profile = Profile::load(tmp.path(), "switch").unwrap();
        assert_eq!(profile.character_count(), 6);
        assert_eq!(profile.character_at(3).unwrap(), 'd');
        assert_eq!(profile.settings().char_width, CharWidth::Two);
        assert!(profile.settings().asymmetric_color_code);
        assert_eq!(profile.opcode_for(0x04).unwrap().arg_count, 3);
        assert_eq!(profile.button_name_for(0x65), Some("BUTTON_A"));
        assert_eq!(profile.special_char_for(0x7F), Some('\u{2009}'));
    }

    #[test]
    fn test_missing_profile_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Profile::load(tmp.path(), "nowhere").unwrap_err();
        assert!(matches!(err, Error::ProfileNotFound { .. }));
    }

    #[test]
    fn test_missing_font_txt() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("switch");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_NAME), "[settings]\nbytes_per_char = 2\n").unwrap();

        let err = Profile::load(tmp.path(), "switch").unwrap_err();
        assert!(matches!(err, Error::ProfileMalformed { .. }));
    }

    #[test]
    fn test_reserved_opcode_byte_in_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = "[settings]\nbytes_per_char = 2\n\n[[opcode]]\nbyte = 0xFF\nname = \"End\"\n";
        write_profile(&tmp.path().join("bad"), manifest, "abc");

        let err = Profile::load(tmp.path(), "bad").unwrap_err();
        assert!(matches!(err, Error::ProfileMalformed { .. }));
    }

    #[test]
    fn test_font_txt_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("font.txt");
        let characters: Vec<char> = ('a'..='z').cycle().take(100).collect();

        write_font_txt(&path, &characters).unwrap();
        let loaded = load_font_txt(&path).unwrap();
        assert_eq!(loaded, characters);
    }
}
