//! Error types for `MesLib`

use thiserror::Error;

/// The error type for `MesLib` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Script Container Errors ====================
    /// The file is not a valid MSB script (missing MES magic).
    #[error("invalid MSB magic: expected MES, found {0:?}")]
    InvalidMsbMagic([u8; 4]),

    /// The file is not a valid SCX script (missing SC3 magic).
    #[error("invalid SCX magic: expected SC3, found {0:?}")]
    InvalidScxMagic([u8; 4]),

    /// The SCX header tables overlap or run past the end of the file.
    #[error("SCX table layout out of bounds: text table at {text_table:#x}, second table at {second_table:#x}, file size {file_size:#x}")]
    ScxTableOutOfBounds {
        /// Offset of the entry offset table.
        text_table: u32,
        /// Offset of the table following the entry offsets.
        second_table: u32,
        /// Total file size in bytes.
        file_size: u64,
    },

    /// An entry's offset slot points outside the instruction-stream region.
    #[error("entry {index} offset {offset:#x} is out of bounds (stream size {stream_size:#x})")]
    EntryOffsetOutOfBounds {
        /// Index of the entry in the offset table.
        index: usize,
        /// The offset read from the slot.
        offset: u64,
        /// Size of the region the offset must fall within.
        stream_size: u64,
    },

    // ==================== Text Codec Errors ====================
    /// An unrecognized control byte was encountered while decoding text.
    ///
    /// Fatal for the file: stream framing after an unknown opcode cannot
    /// be trusted.
    #[error("unknown opcode {opcode:#04x} at offset {offset:#x}")]
    UnknownOpcode {
        /// The unrecognized byte value.
        opcode: u8,
        /// Absolute offset of the byte within the instruction stream.
        offset: u64,
    },

    /// A character-table reference resolved outside the character table.
    #[error("character index {index} is beyond the character table length {table_len}")]
    CharIndexOutOfRange {
        /// The decoded character-table index.
        index: u32,
        /// Number of glyphs in the character table.
        table_len: usize,
    },

    /// An encode-time tag name matched neither an opcode nor a button.
    #[error("unknown tag <{0}>")]
    UnknownTag(String),

    /// A `<` was opened but the closing `>` never appeared.
    #[error("unterminated tag <{0}")]
    UnterminatedTag(String),

    /// A tag argument was not a decimal integer in 0-255.
    #[error("invalid argument '{value}' in tag <{tag}>")]
    InvalidTagArgument {
        /// The tag the argument belongs to.
        tag: String,
        /// The offending argument text.
        value: String,
    },

    // ==================== Profile Errors ====================
    /// No profile directory exists for the requested title.
    #[error("profile not found for title '{title}'")]
    ProfileNotFound {
        /// The title identifier that was looked up.
        title: String,
    },

    /// The profile exists but its tables or settings are unusable.
    #[error("malformed profile: {reason}")]
    ProfileMalformed {
        /// Description of what is wrong.
        reason: String,
    },

    /// TOML parsing error in a profile manifest.
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    // ==================== Translation Table Errors ====================
    /// A translation file's row count does not match the script's entry count.
    #[error("row count mismatch: script has {expected} entries, table has {found} rows")]
    RowCountMismatch {
        /// Number of entries in the script.
        expected: usize,
        /// Number of rows in the translation table.
        found: usize,
    },

    /// A translation file row has too few columns.
    #[error("malformed row at line {line}: expected {expected} columns, found {found}")]
    MalformedRow {
        /// 1-based line number in the translation file.
        line: usize,
        /// Number of columns required.
        expected: usize,
        /// Number of columns present.
        found: usize,
    },

    // ==================== MPK Archive Errors ====================
    /// The file is not a valid MPK archive (missing MPK magic).
    #[error("invalid MPK magic: expected MPK, found {0:?}")]
    InvalidMpkMagic([u8; 4]),

    /// The entry uses a compression flag this library does not handle.
    #[error("unsupported compression with id {flag}")]
    UnsupportedCompression {
        /// The compression flag from the entry record.
        flag: u32,
    },

    /// Decompressed entry data does not match the recorded size.
    #[error("size mismatch for '{name}': expected {expected} bytes, got {found}")]
    SizeMismatch {
        /// The archive-internal path of the entry.
        name: String,
        /// The uncompressed size recorded in the entry.
        expected: u64,
        /// The actual decompressed length.
        found: u64,
    },

    /// An entry path does not fit in the fixed-size record field.
    #[error("entry path too long ({len} bytes, max {max}): {path}")]
    EntryPathTooLong {
        /// The offending path.
        path: String,
        /// Its UTF-8 byte length.
        len: usize,
        /// Maximum storable length.
        max: usize,
    },

    // ==================== MFNT Font Table Errors ====================
    /// The file is not a valid MFNT font table.
    #[error("invalid MFNT magic: expected MFNT, found {0:?}")]
    InvalidMftMagic([u8; 4]),

    /// A directory slot that is always empty in known files has entries.
    #[error("MFNT directory slot {slot} has {count} entries, expected 0")]
    MftSlotNotEmpty {
        /// The 1-based directory slot number.
        slot: u8,
        /// The entry count found.
        count: u32,
    },

    // ==================== Compression Errors ====================
    /// Zlib decompression failed.
    #[error("zlib decompression failed: {message}")]
    ZlibDecompressionFailed {
        /// The error message.
        message: String,
    },

    // ==================== Image Errors ====================
    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    PngEncodeFailed(#[from] image::ImageError),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// Unexpected end of file.
    #[error("unexpected end of file")]
    UnexpectedEof,
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `MesLib` operations.
pub type Result<T> = std::result::Result<T, Error>;
