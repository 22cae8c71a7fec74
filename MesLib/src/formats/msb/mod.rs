//! MSB blackboard script format
//!
//! Flat-table script container: a 16-byte little-endian header, one
//! 8-byte slot per entry (an unknown field plus a relative offset or the
//! invalid sentinel), then the big-endian instruction-stream region the
//! text codec operates on.

mod reader;
mod writer;

pub use reader::{parse_msb_bytes, read_msb};
pub use writer::{msb_to_bytes, write_msb};

use crate::formats::text::ScriptEntry;

/// "MES\0" magic signature.
pub const MSB_MAGIC: &[u8; 4] = b"MES\x00";

/// Size of the fixed header (magic + unk + entry count + stream base).
pub const HEADER_SIZE: u32 = 16;

/// Size of each entry slot (unk + offset).
pub const SLOT_SIZE: u32 = 8;

/// A parsed MSB script.
#[derive(Debug, Clone)]
pub struct MsbScript {
    /// Header field of unknown meaning, carried through unchanged.
    pub unk: u32,
    /// Start of the instruction-stream region as read from the header.
    /// Recomputed from the entry count on save.
    pub stream_base: u32,
    /// Entries in slot order.
    pub entries: Vec<ScriptEntry>,
}
