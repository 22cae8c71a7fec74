#![allow(non_snake_case)]
//! # MesLib
//!
//! A pure-Rust library for working with MAGES engine script and asset
//! formats used by console visual novels.
//!
//! ## Supported Formats
//!
//! - **MSB scripts** - Flat-table blackboard text scripts
//! - **SCX scripts** - Scene scripts with embedded bytecode
//! - **MPK archives** - Extract, import, and rebuild asset packages
//! - **MFNT fonts** - Bitmap font inspection and atlas export
//! - **TSV/CSV rows** - Translation round-trip files
//!
//! Scripts store text as packed instruction streams indexing a per-title
//! font table. A [`profile::Profile`] supplies that table plus the
//! title's opcode, button, and special-character maps, so every decode
//! and encode is parameterized by profile rather than hard-coded.
//!
//! ## Quick Start
//!
//! ### Editing a Script
//!
//! ```no_run
//! use meslib::profile::Profile;
//! use meslib::script::ScriptFile;
//!
//! // Profiles live in per-title directories: profiles/<title>/
//! let profile = Profile::load("profiles", "robotics_notes")?;
//!
//! let mut script = ScriptFile::load("script/scene01.scx", &profile)?;
//! for entry in script.entries_mut() {
//!     entry.body = entry.body.replace("...", "\u{2026}");
//! }
//! let report = script.save("script/scene01.scx", &profile)?;
//! println!("{} glyphs dropped", report.missing_glyphs.len());
//! # Ok::<(), meslib::Error>(())
//! ```
//!
//! ### Translation Round Trip
//!
//! ```no_run
//! use meslib::profile::Profile;
//! use meslib::script::ScriptFile;
//! use meslib::translation::{ExportFormat, export_script, import_script};
//!
//! let profile = Profile::load("profiles", "robotics_notes")?;
//! let mut script = ScriptFile::load("script/scene01.msb", &profile)?;
//!
//! // Hand scene01.msb.tsv to the translators...
//! export_script(&script, "rows/scene01.msb.tsv", ExportFormat::Tsv)?;
//!
//! // ...and pull the edited rows back in.
//! let stats = import_script(&mut script, "rows/scene01.msb.tsv", ExportFormat::Tsv)?;
//! println!("{} of {} entries changed", stats.changed, stats.rows);
//! script.save("script/scene01.msb", &profile)?;
//! # Ok::<(), meslib::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! The prelude provides convenient access to commonly used types:
//!
//! ```
//! use meslib::prelude::*;
//!
//! // Now you have access to:
//! // - Profile, ScriptFile, ScriptFormat, ScriptEntry
//! // - MpkArchive, FontTable
//! // - Error, Result, and more
//! ```

pub mod error;
pub mod io;
pub mod profile;
pub mod formats;
pub mod script;
pub mod translation;
pub mod batch;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::profile::{CharWidth, OpcodeDef, Profile, ProfileSettings};
    pub use crate::script::{ScriptFile, ScriptFormat};

    // Format-level exports
    pub use crate::formats::{
        EncodeReport, EntryKind, ScriptEntry,
        MsbScript, read_msb, write_msb,
        ScxScript, read_scx, write_scx,
        MpkArchive, MpkEntry, read_mpk, write_mpk,
        FontTable, read_mft, write_atlas_png,
    };

    // Translation workflow
    pub use crate::translation::{
        ExportFormat, ImportStats, TranslationRow,
        export_script, import_script, rows_from_entries, apply_rows,
    };
    pub use crate::translation::speakers::{
        collect_speakers, read_speakers, write_speakers,
    };

    // Batch drivers
    pub use crate::batch::{
        BatchResult, find_mpk_files, find_script_files,
        batch_export_scripts, batch_import_scripts,
        batch_extract_mpks, batch_import_mpks,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
