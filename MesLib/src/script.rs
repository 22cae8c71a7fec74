//! Unified script-file handling
//!
//! MSB and SCX containers carry the same kind of entries but frame them
//! differently. `ScriptFile` wraps either variant behind one API so the
//! translation workflow and the CLI can load, edit, and save scripts
//! without caring which container is on disk.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::msb::{self, MsbScript};
use crate::formats::scx::{self, ScxScript};
use crate::formats::text::{EncodeReport, ScriptEntry};
use crate::profile::Profile;

/// Script container variants, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// "MES\0" flat-table container (`.msb`)
    Msb,
    /// "SC3\0" inline-offset container (`.scx`)
    Scx,
}

impl ScriptFormat {
    /// Get the canonical file extension for this format (no dot).
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Msb => "msb",
            Self::Scx => "scx",
        }
    }

    /// Determine the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    /// Returns [`Error::InvalidPath`] if the extension is missing or not a
    /// known script extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "msb" => Ok(Self::Msb),
            "scx" => Ok(Self::Scx),
            _ => Err(Error::InvalidPath(format!(
                "not a script file (expected .msb or .scx): {}",
                path.display()
            ))),
        }
    }
}

/// A loaded script of either container variant.
///
/// Container-specific fields (header unknowns, opaque SCX regions) stay
/// inside the wrapped struct and are carried through a load/edit/save
/// cycle untouched.
#[derive(Debug, Clone)]
pub enum ScriptFile {
    /// MSB flat-table script
    Msb(MsbScript),
    /// SCX scene script
    Scx(ScxScript),
}

impl ScriptFile {
    /// Load a script, picking the parser from the file extension.
    ///
    /// # Errors
    /// Returns an error if the extension is unrecognized, the file cannot
    /// be read, or parsing fails.
    pub fn load<P: AsRef<Path>>(path: P, profile: &Profile) -> Result<Self> {
        let path = path.as_ref();
        match ScriptFormat::from_path(path)? {
            ScriptFormat::Msb => Ok(Self::Msb(msb::read_msb(path, profile)?)),
            ScriptFormat::Scx => Ok(Self::Scx(scx::read_scx(path, profile)?)),
        }
    }

    /// Parse a script from an in-memory buffer.
    ///
    /// Used for scripts pulled out of MPK archives without touching disk.
    ///
    /// # Errors
    /// Returns an error if parsing fails.
    pub fn from_bytes(format: ScriptFormat, data: &[u8], profile: &Profile) -> Result<Self> {
        match format {
            ScriptFormat::Msb => Ok(Self::Msb(msb::parse_msb_bytes(data, profile)?)),
            ScriptFormat::Scx => Ok(Self::Scx(scx::parse_scx_bytes(data, profile)?)),
        }
    }

    /// Write the script back to disk in its own container format.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails. Characters missing
    /// from the profile's font table are reported, not fatal.
    pub fn save<P: AsRef<Path>>(&self, path: P, profile: &Profile) -> Result<EncodeReport> {
        match self {
            Self::Msb(script) => msb::write_msb(path, script, profile),
            Self::Scx(script) => scx::write_scx(path, script, profile),
        }
    }

    /// Serialize the script to bytes in its own container format.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self, profile: &Profile, report: &mut EncodeReport) -> Result<Vec<u8>> {
        match self {
            Self::Msb(script) => msb::msb_to_bytes(script, profile, report),
            Self::Scx(script) => scx::scx_to_bytes(script, profile, report),
        }
    }

    /// Get the container format of this script.
    #[must_use]
    pub const fn format(&self) -> ScriptFormat {
        match self {
            Self::Msb(_) => ScriptFormat::Msb,
            Self::Scx(_) => ScriptFormat::Scx,
        }
    }

    /// Get the entries in slot order.
    #[must_use]
    pub fn entries(&self) -> &[ScriptEntry] {
        match self {
            Self::Msb(script) => &script.entries,
            Self::Scx(script) => &script.entries,
        }
    }

    /// Get mutable access to the entries.
    pub fn entries_mut(&mut self) -> &mut Vec<ScriptEntry> {
        match self {
            Self::Msb(script) => &mut script.entries,
            Self::Scx(script) => &mut script.entries,
        }
    }

    /// Collect the distinct non-empty speaker names used in this script.
    ///
    /// Sorted and deduplicated, so aggregating over many scripts yields a
    /// stable glossary order.
    #[must_use]
    pub fn speakers(&self) -> BTreeSet<String> {
        self.entries()
            .iter()
            .filter(|entry| !entry.speaker.is_empty())
            .map(|entry| entry.speaker.clone())
            .collect()
    }

    /// Replace speaker names according to a glossary map.
    ///
    /// Entries whose speaker is not in the map keep their current name.
    /// Returns the number of entries changed.
    pub fn apply_speaker_map(&mut self, map: &HashMap<String, String>) -> usize {
        let mut changed = 0;
        for entry in self.entries_mut() {
            if let Some(replacement) = map.get(&entry.speaker) {
                if *replacement != entry.speaker {
                    entry.speaker.clone_from(replacement);
                    changed += 1;
                }
            }
        }
        changed
    }
}
