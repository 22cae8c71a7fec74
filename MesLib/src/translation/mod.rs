//! Translation workflow support
//!
//! Export script entries to TSV/CSV for translators, import the edited
//! rows back. Rows map to entries by position, so the row count must
//! match the entry count exactly and no row may be dropped.
//!
//! # Row format
//!
//! One row per entry, in slot order. Columns:
//!
//! 1. Type (`static` or `dialogue`, informational)
//! 2. Speaker
//! 3. `SpeakerTranslation` (prefilled with the speaker)
//! 4. Original
//! 5. Translation (prefilled with the original)
//! 6. `StaticCode`
//! 7. `StaticCodeTranslation` (prefilled with the static code)
//!
//! Translation columns are prefilled so an untouched export imports as a
//! no-op. Cells use backslash escapes (`\n`, `\t`, `\r`, `\\`, and `\,`
//! in CSV) because bodies contain literal line breaks and tag arguments
//! contain commas.
//!
//! # Example
//!
//! ```tsv
//! Type\tSpeaker\tSpeakerTranslation\tOriginal\tTranslation\tStaticCode\tStaticCodeTranslation
//! dialogue\t結衣\t結衣\tこんにちは\tこんにちは\t\t
//! static\t\t\tはい\tはい\t<Center>\t<Center>
//! ```

pub mod speakers;

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::text::{EntryKind, ScriptEntry};
use crate::script::ScriptFile;

/// Number of columns in a row file.
pub const COLUMN_COUNT: usize = 7;

/// Export format for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Tab-separated values (recommended for spreadsheets)
    Tsv,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Csv => "csv",
        }
    }

    /// Get the delimiter character
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::Tsv => '\t',
            Self::Csv => ',',
        }
    }
}

/// One editable row of a translation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRow {
    /// Entry kind at export time. Informational only; the script stays
    /// authoritative on import.
    pub kind: EntryKind,
    /// Speaker name as decoded from the script
    pub speaker: String,
    /// Translated speaker name
    pub speaker_translation: String,
    /// Body text as decoded from the script
    pub original: String,
    /// Translated body text
    pub translation: String,
    /// Leading opcode residue as decoded from the script
    pub static_code: String,
    /// Translated opcode residue
    pub static_code_translation: String,
}

/// Result of applying translation rows to a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Number of rows applied
    pub rows: usize,
    /// Number of entries whose text actually changed
    pub changed: usize,
}

/// Build translation rows from script entries, one row per entry.
///
/// Translation columns are prefilled with the source columns. Invalid
/// entries produce all-empty rows so positions stay aligned.
#[must_use]
pub fn rows_from_entries(entries: &[ScriptEntry]) -> Vec<TranslationRow> {
    entries
        .iter()
        .map(|entry| TranslationRow {
            kind: entry.kind,
            speaker: entry.speaker.clone(),
            speaker_translation: entry.speaker.clone(),
            original: entry.body.clone(),
            translation: entry.body.clone(),
            static_code: entry.static_code.clone(),
            static_code_translation: entry.static_code.clone(),
        })
        .collect()
}

/// Apply translation rows to script entries by position.
///
/// Each entry takes its speaker, body, and static code from the row's
/// translation columns. Entry kind and validity are not touched, so a
/// row cannot turn a static entry into a dialogue one or revive an
/// invalid slot.
///
/// # Errors
/// Returns [`Error::RowCountMismatch`] if the row count differs from the
/// entry count.
pub fn apply_rows(entries: &mut [ScriptEntry], rows: &[TranslationRow]) -> Result<ImportStats> {
    if rows.len() != entries.len() {
        return Err(Error::RowCountMismatch {
            expected: entries.len(),
            found: rows.len(),
        });
    }

    let mut changed = 0;
    for (entry, row) in entries.iter_mut().zip(rows) {
        let differs = entry.speaker != row.speaker_translation
            || entry.body != row.translation
            || entry.static_code != row.static_code_translation;

        if differs {
            entry.speaker.clone_from(&row.speaker_translation);
            entry.body.clone_from(&row.translation);
            entry.static_code.clone_from(&row.static_code_translation);
            changed += 1;
        }
    }

    Ok(ImportStats {
        rows: rows.len(),
        changed,
    })
}

/// Write translation rows to a TSV/CSV file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_rows<P: AsRef<Path>>(
    rows: &[TranslationRow],
    path: P,
    format: ExportFormat,
) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let d = format.delimiter();

    writeln!(
        writer,
        "Type{d}Speaker{d}SpeakerTranslation{d}Original{d}Translation{d}StaticCode{d}StaticCodeTranslation"
    )?;

    for row in rows {
        writeln!(
            writer,
            "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
            row.kind.as_str(),
            escape_cell(&row.speaker, d),
            escape_cell(&row.speaker_translation, d),
            escape_cell(&row.original, d),
            escape_cell(&row.translation, d),
            escape_cell(&row.static_code, d),
            escape_cell(&row.static_code_translation, d),
        )?;
    }

    writer.flush()?;
    Ok(rows.len())
}

/// Read translation rows from a TSV/CSV file.
///
/// The header line is skipped and blank lines are ignored. Every other
/// line must have exactly [`COLUMN_COUNT`] cells.
///
/// # Errors
/// Returns [`Error::MalformedRow`] for lines with the wrong cell count,
/// or an I/O error if the file cannot be read.
pub fn read_rows<P: AsRef<Path>>(path: P, format: ExportFormat) -> Result<Vec<TranslationRow>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let delimiter = format.delimiter();

    let mut rows = Vec::new();
    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if index == 0 || line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(delimiter).collect();
        if cells.len() != COLUMN_COUNT {
            return Err(Error::MalformedRow {
                line: index + 1,
                expected: COLUMN_COUNT,
                found: cells.len(),
            });
        }

        rows.push(TranslationRow {
            kind: kind_from_cell(cells[0]),
            speaker: unescape_cell(cells[1]),
            speaker_translation: unescape_cell(cells[2]),
            original: unescape_cell(cells[3]),
            translation: unescape_cell(cells[4]),
            static_code: unescape_cell(cells[5]),
            static_code_translation: unescape_cell(cells[6]),
        });
    }

    Ok(rows)
}

/// Export a script to a translation file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_script<P: AsRef<Path>>(
    script: &ScriptFile,
    path: P,
    format: ExportFormat,
) -> Result<usize> {
    let rows = rows_from_entries(script.entries());
    write_rows(&rows, path, format)
}

/// Import a translation file into a script.
///
/// # Errors
/// Returns an error if the file cannot be read, a row is malformed, or
/// the row count differs from the script's entry count.
pub fn import_script<P: AsRef<Path>>(
    script: &mut ScriptFile,
    path: P,
    format: ExportFormat,
) -> Result<ImportStats> {
    let rows = read_rows(path, format)?;
    apply_rows(script.entries_mut(), &rows)
}

fn kind_from_cell(cell: &str) -> EntryKind {
    if cell.trim() == "dialogue" {
        EntryKind::Dialogue
    } else {
        EntryKind::Static
    }
}

// ============================================================================
// Cell escaping
// ============================================================================

/// Escape a cell for single-line delimited output.
///
/// Backslash escapes keep every cell on one line: `\n`, `\t`, `\r`,
/// `\\`, and `\,` when the delimiter is a comma.
#[must_use]
pub fn escape_cell(text: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_cell`]. Unknown escapes keep the escaped character.
#[must_use]
pub fn unescape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
