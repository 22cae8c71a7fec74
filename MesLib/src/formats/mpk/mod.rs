//! MPK archive format
//!
//! Flat container the engine ships scripts and assets in. A 0x40-byte
//! header, one 0x100-byte record per entry (compression flag, index,
//! offset, sizes, and a null-padded path), then the payloads aligned to
//! 0x800-byte boundaries. Payloads are either stored raw or
//! zlib-compressed, per entry.

mod reader;
mod writer;

pub use reader::{parse_mpk_bytes, read_mpk};
pub use writer::{mpk_to_bytes, write_mpk};

use std::path::Path;

use crate::error::{Error, Result};

/// "MPK\0" magic signature.
pub const MPK_MAGIC: &[u8; 4] = b"MPK\x00";

/// Size of the fixed header (magic + two unknowns + count + reserved).
pub const HEADER_SIZE: u64 = 0x40;

/// Size of each entry record.
pub const RECORD_SIZE: u64 = 0x100;

/// Size of the null-padded path field inside a record.
pub const PATH_FIELD_SIZE: usize = 0xE0;

/// Alignment of each payload within the archive.
pub const DATA_ALIGNMENT: u64 = 0x800;

/// Compression flag for raw payloads.
pub const COMPRESSION_STORED: u32 = 0;

/// Compression flag for zlib payloads.
pub const COMPRESSION_ZLIB: u32 = 1;

/// A parsed MPK archive.
#[derive(Debug, Clone)]
pub struct MpkArchive {
    /// First header field of unknown meaning, carried through unchanged.
    pub unk1: u16,
    /// Second header field of unknown meaning, carried through unchanged.
    pub unk2: u16,
    /// Reserved header tail, zero in every known file.
    pub reserved: [u8; 0x30],
    /// Entries in record order.
    pub entries: Vec<MpkEntry>,
}

/// One archived file.
#[derive(Debug, Clone)]
pub struct MpkEntry {
    /// [`COMPRESSION_STORED`] or [`COMPRESSION_ZLIB`].
    pub compress_flag: u32,
    /// Entry index as recorded in the archive.
    pub index: u32,
    /// Size the payload decompresses to.
    pub uncompressed_size: u64,
    /// Archive-internal path, empty for unused records.
    pub path: String,
    /// Payload exactly as stored (compressed when the flag says so).
    pub data: Vec<u8>,
}

impl MpkEntry {
    /// Get the payload with compression undone.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedCompression`] for unknown flags,
    /// [`Error::ZlibDecompressionFailed`] for corrupt zlib streams, and
    /// [`Error::SizeMismatch`] when the result does not match the
    /// recorded uncompressed size.
    pub fn extracted_data(&self) -> Result<Vec<u8>> {
        let out = match self.compress_flag {
            COMPRESSION_STORED => self.data.clone(),
            COMPRESSION_ZLIB => {
                use flate2::read::ZlibDecoder;
                use std::io::Read;

                let mut decoder = ZlibDecoder::new(self.data.as_slice());
                let mut decompressed = Vec::with_capacity(self.uncompressed_size as usize);
                decoder.read_to_end(&mut decompressed).map_err(|e| {
                    Error::ZlibDecompressionFailed {
                        message: format!("entry '{}': {e}", self.path),
                    }
                })?;
                decompressed
            }
            flag => return Err(Error::UnsupportedCompression { flag }),
        };

        if out.len() as u64 != self.uncompressed_size {
            return Err(Error::SizeMismatch {
                name: self.path.clone(),
                expected: self.uncompressed_size,
                found: out.len() as u64,
            });
        }
        Ok(out)
    }

    /// Replace the payload, recompressing under the entry's own flag.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedCompression`] for unknown flags or
    /// [`Error::Io`] if compression fails.
    pub fn replace_data(&mut self, new_data: &[u8]) -> Result<()> {
        self.data = match self.compress_flag {
            COMPRESSION_STORED => new_data.to_vec(),
            COMPRESSION_ZLIB => {
                use flate2::Compression;
                use flate2::write::ZlibEncoder;
                use std::io::Write;

                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(new_data)?;
                encoder.finish()?
            }
            flag => return Err(Error::UnsupportedCompression { flag }),
        };
        self.uncompressed_size = new_data.len() as u64;
        Ok(())
    }
}

impl MpkArchive {
    /// Look up an entry by its archive-internal path.
    #[must_use]
    pub fn entry_by_path(&self, path: &str) -> Option<&MpkEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Look up an entry by its archive-internal path, mutably.
    pub fn entry_by_path_mut(&mut self, path: &str) -> Option<&mut MpkEntry> {
        self.entries.iter_mut().find(|e| e.path == path)
    }

    /// Extract every named entry into a directory tree.
    ///
    /// Records with an empty path are unused slots and are skipped.
    /// Returns the number of files written.
    ///
    /// # Errors
    /// Returns an error if a payload fails to decompress or a file
    /// cannot be written.
    pub fn unpack_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut written = 0;
        for entry in &self.entries {
            if entry.path.is_empty() {
                continue;
            }
            tracing::debug!("Extracting {} ({} bytes)", entry.path, entry.uncompressed_size);

            let out_path = dir.join(&entry.path);
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out_path, entry.extracted_data()?)?;
            written += 1;
        }
        Ok(written)
    }

    /// Pull replacement payloads from a directory tree.
    ///
    /// Each entry whose path exists under `dir` gets that file's content
    /// via [`MpkEntry::replace_data`]; everything else stays untouched.
    /// Returns the number of entries replaced.
    ///
    /// # Errors
    /// Returns an error if a replacement file cannot be read or
    /// recompressed.
    pub fn import_from_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();

        let mut replaced = 0;
        for entry in &mut self.entries {
            if entry.path.is_empty() {
                continue;
            }
            let source = dir.join(&entry.path);
            if !source.exists() {
                continue;
            }
            tracing::debug!("Importing {}", entry.path);

            let new_data = std::fs::read(source)?;
            entry.replace_data(&new_data)?;
            replaced += 1;
        }
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stored_entry(path: &str, data: &[u8]) -> MpkEntry {
        MpkEntry {
            compress_flag: COMPRESSION_STORED,
            index: 0,
            uncompressed_size: data.len() as u64,
            path: path.to_string(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_stored_round_trip() {
        let mut entry = stored_entry("data/test.msb", b"hello");
        assert_eq!(entry.extracted_data().unwrap(), b"hello");

        entry.replace_data(b"longer payload").unwrap();
        assert_eq!(entry.uncompressed_size, 14);
        assert_eq!(entry.extracted_data().unwrap(), b"longer payload");
    }

    #[test]
    fn test_zlib_round_trip() {
        let mut entry = stored_entry("data/test.msb", b"");
        entry.compress_flag = COMPRESSION_ZLIB;

        let payload = b"compress me ".repeat(64);
        entry.replace_data(&payload).unwrap();
        assert!(entry.data.len() < payload.len());
        assert_eq!(entry.extracted_data().unwrap(), payload);
    }

    #[test]
    fn test_unknown_compression_rejected() {
        let mut entry = stored_entry("x", b"data");
        entry.compress_flag = 9;

        assert!(matches!(
            entry.extracted_data(),
            Err(Error::UnsupportedCompression { flag: 9 })
        ));
        assert!(matches!(
            entry.replace_data(b"new"),
            Err(Error::UnsupportedCompression { flag: 9 })
        ));
    }

    #[test]
    fn test_size_mismatch_detected() {
        let mut entry = stored_entry("x", b"data");
        entry.uncompressed_size = 99;

        assert!(matches!(
            entry.extracted_data(),
            Err(Error::SizeMismatch { expected: 99, found: 4, .. })
        ));
    }

    #[test]
    fn test_entry_lookup_by_path() {
        let archive = MpkArchive {
            unk1: 0,
            unk2: 0,
            reserved: [0; 0x30],
            entries: vec![stored_entry("a.msb", b"1"), stored_entry("b.msb", b"2")],
        };

        assert_eq!(archive.entry_by_path("b.msb").unwrap().data, b"2");
        assert!(archive.entry_by_path("c.msb").is_none());
    }
}
