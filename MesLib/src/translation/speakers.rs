//! Speaker glossary support
//!
//! Speaker names repeat across every script of a title, so they are
//! translated once in a shared glossary instead of row by row. The
//! glossary is a two-column TSV (`Speaker | Translation`), prefilled
//! with identity mappings on export.

use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::{TranslationRow, escape_cell, unescape_cell};
use crate::error::{Error, Result};
use crate::script::ScriptFile;

/// Default glossary file name.
pub const SPEAKERS_FILE: &str = "speakers.tsv";

/// Collect the distinct speaker names used across several scripts.
#[must_use]
pub fn collect_speakers<'a, I>(scripts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a ScriptFile>,
{
    let mut speakers = BTreeSet::new();
    for script in scripts {
        speakers.extend(script.speakers());
    }
    speakers
}

/// Write a speaker glossary, one `Speaker\tTranslation` row per name.
///
/// The translation column is prefilled with the speaker itself, so an
/// untouched glossary applies as a no-op.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_speakers<P: AsRef<Path>>(path: P, speakers: &BTreeSet<String>) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);

    writeln!(writer, "Speaker\tTranslation")?;
    for speaker in speakers {
        let cell = escape_cell(speaker, '\t');
        writeln!(writer, "{cell}\t{cell}")?;
    }

    writer.flush()?;
    Ok(speakers.len())
}

/// Read a speaker glossary into a name map.
///
/// # Errors
/// Returns [`Error::MalformedRow`] for lines without exactly two cells,
/// or an I/O error if the file cannot be read.
pub fn read_speakers<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut map = HashMap::new();
    for (index, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if index == 0 || line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() != 2 {
            return Err(Error::MalformedRow {
                line: index + 1,
                expected: 2,
                found: cells.len(),
            });
        }

        map.insert(unescape_cell(cells[0]), unescape_cell(cells[1]));
    }

    Ok(map)
}

/// Fill the `SpeakerTranslation` column of exported rows from a glossary.
///
/// Rows whose speaker is absent from the map are left alone. Returns the
/// number of rows changed.
pub fn apply_speakers_to_rows(rows: &mut [TranslationRow], map: &HashMap<String, String>) -> usize {
    let mut changed = 0;
    for row in rows {
        if let Some(translation) = map.get(&row.speaker) {
            if row.speaker_translation != *translation {
                row.speaker_translation.clone_from(translation);
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::formats::msb::MsbScript;
    use crate::formats::text::{EntryKind, ScriptEntry};
    use crate::translation::rows_from_entries;

    fn script_with_speakers(names: &[&str]) -> ScriptFile {
        let entries = names
            .iter()
            .map(|name| ScriptEntry {
                kind: EntryKind::Dialogue,
                speaker: (*name).to_string(),
                body: "line".to_string(),
                ..ScriptEntry::default()
            })
            .collect();

        ScriptFile::Msb(MsbScript {
            unk: 0,
            stream_base: 0,
            entries,
        })
    }

    #[test]
    fn test_collect_speakers_across_scripts() {
        let a = script_with_speakers(&["Yuki", "Akira"]);
        let b = script_with_speakers(&["Akira", "Sora"]);

        let speakers: Vec<String> = collect_speakers([&a, &b]).into_iter().collect();
        assert_eq!(speakers, vec!["Akira", "Sora", "Yuki"]);
    }

    #[test]
    fn test_glossary_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SPEAKERS_FILE);

        let speakers: BTreeSet<String> =
            ["Yuki", "Akira"].iter().map(ToString::to_string).collect();
        let written = write_speakers(&path, &speakers).unwrap();
        assert_eq!(written, 2);

        let map = read_speakers(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Yuki"], "Yuki");
        assert_eq!(map["Akira"], "Akira");
    }

    #[test]
    fn test_read_speakers_malformed_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, "Speaker\tTranslation\nonly-one-cell\n").unwrap();

        let err = read_speakers(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow {
                line: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_apply_speakers_to_rows() {
        let script = script_with_speakers(&["Yuki", "Akira", "Yuki"]);
        let mut rows = rows_from_entries(script.entries());

        let mut map = HashMap::new();
        map.insert("Yuki".to_string(), "Yuki (EN)".to_string());

        let changed = apply_speakers_to_rows(&mut rows, &map);
        assert_eq!(changed, 2);
        assert_eq!(rows[0].speaker_translation, "Yuki (EN)");
        assert_eq!(rows[1].speaker_translation, "Akira");
        assert_eq!(rows[0].speaker, "Yuki");
    }
}
