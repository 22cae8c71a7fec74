//! File format handlers for MAGES engine formats

pub mod mft;
pub mod mpk;
pub mod msb;
pub mod scx;
pub mod text;

// Re-export main format types
pub use mft::{FontTable, read_mft, write_atlas_png};
pub use mpk::{MpkArchive, MpkEntry, parse_mpk_bytes, read_mpk, write_mpk};
pub use msb::{MsbScript, parse_msb_bytes, read_msb, write_msb};
pub use scx::{ScxScript, parse_scx_bytes, read_scx, write_scx};
pub use text::{EncodeReport, EntryKind, ScriptEntry, decode_entry, encode_entry};
