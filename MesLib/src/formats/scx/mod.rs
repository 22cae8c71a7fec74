//! SCX scene script format
//!
//! Inline-offset script container. The header carries two table offsets
//! instead of an entry count: the count is derived from their distance.
//! Entry slots hold absolute offsets (or the invalid sentinel), and two
//! opaque regions are round-tripped byte-for-byte: the bytecode before
//! the offset table and the unknown table between the slots and the
//! instruction streams.

mod reader;
mod writer;

pub use reader::{parse_scx_bytes, read_scx};
pub use writer::{scx_to_bytes, write_scx};

use crate::formats::text::ScriptEntry;

/// "SC3\0" magic signature.
pub const SCX_MAGIC: &[u8; 4] = b"SC3\x00";

/// Size of the fixed header (magic + two table offsets).
pub const HEADER_SIZE: u32 = 12;

/// A parsed SCX script.
#[derive(Debug, Clone)]
pub struct ScxScript {
    /// Opaque bytecode region between the header and the offset table.
    pub script_data: Vec<u8>,
    /// Opaque region between the offset slots and the instruction
    /// streams. Internal structure unknown; preserved verbatim.
    pub unk_table: Vec<u8>,
    /// Entries in slot order.
    pub entries: Vec<ScriptEntry>,
}
