//! Batch operations over directory trees
//!
//! Directory drivers for the translation workflow: find script or
//! archive files, then process them in parallel. One file's failure is
//! recorded and does not stop its siblings.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::formats::mpk::{read_mpk, write_mpk};
use crate::profile::Profile;
use crate::script::ScriptFile;
use crate::translation::speakers::{SPEAKERS_FILE, write_speakers};
use crate::translation::{ExportFormat, export_script, import_script};

/// Result of a batch operation
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Number of successful operations
    pub success_count: usize,
    /// Number of failed operations
    pub fail_count: usize,
    /// Messages for each file processed
    pub results: Vec<String>,
}

/// Find all files with the given extension in a directory recursively
///
/// # Arguments
/// * `dir` - Directory to search
/// * `extension` - Extension to match, without the dot, case-insensitive
///
/// # Returns
/// A sorted list of matching paths.
pub fn find_files_with_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.path().is_file()
                && e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// Find all script files (`.msb` and `.scx`) in a directory recursively
///
/// # Returns
/// A sorted list of script paths.
pub fn find_script_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let dir = dir.as_ref();
    let mut files = find_files_with_extension(dir, "msb");
    files.extend(find_files_with_extension(dir, "scx"));
    files.sort();
    files
}

/// Find all `.mpk` archives in a directory recursively
///
/// # Returns
/// A sorted list of archive paths.
pub fn find_mpk_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    find_files_with_extension(dir, "mpk")
}

/// Batch export scripts to translation row files in parallel
///
/// Each script becomes `<name>.<row extension>` under `dest_base`,
/// preserving the directory structure below `source_base`. The distinct
/// speakers of every successfully exported script are merged into one
/// `speakers.tsv` glossary at the root of `dest_base`.
///
/// # Arguments
/// * `script_files` - Script files to export
/// * `source_base` - Base directory of the source (for relative paths)
/// * `dest_base` - Destination directory for row files
/// * `profile` - Title profile the scripts decode under
/// * `format` - Row file format
///
/// # Returns
/// Summary of the batch export.
pub fn batch_export_scripts(
    script_files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
    profile: &Profile,
    format: ExportFormat,
) -> BatchResult {
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);

    // Parallel script export
    let outcomes: Vec<(String, BTreeSet<String>)> = script_files
        .par_iter()
        .map(|script_path| {
            let relative_path = script_path
                .strip_prefix(source_base)
                .unwrap_or(script_path.as_path());
            let display_path = relative_path.to_string_lossy();

            let row_path = match row_file_path(dest_base, relative_path, format) {
                Ok(path) => path,
                Err(message) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    return (message, BTreeSet::new());
                }
            };

            let script = match ScriptFile::load(script_path, profile) {
                Ok(script) => script,
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    return (format!("Failed {display_path}: {e}"), BTreeSet::new());
                }
            };

            match export_script(&script, &row_path, format) {
                Ok(rows) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    (
                        format!("Exported: {display_path} ({rows} rows)"),
                        script.speakers(),
                    )
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    (format!("Failed {display_path}: {e}"), BTreeSet::new())
                }
            }
        })
        .collect();

    let mut speakers = BTreeSet::new();
    let mut results = Vec::with_capacity(outcomes.len() + 1);
    for (message, file_speakers) in outcomes {
        results.push(message);
        speakers.extend(file_speakers);
    }

    match write_speakers(dest_base.join(SPEAKERS_FILE), &speakers) {
        Ok(count) => results.push(format!("Wrote {SPEAKERS_FILE} ({count} speakers)")),
        Err(e) => {
            fail_counter.fetch_add(1, Ordering::SeqCst);
            results.push(format!("Failed {SPEAKERS_FILE}: {e}"));
        }
    }

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

/// Batch import translation row files back into scripts in parallel
///
/// Each script is rewritten in place from its row file under
/// `rows_base`, located by the same naming rule the export used.
///
/// # Arguments
/// * `script_files` - Script files to rewrite
/// * `source_base` - Base directory of the scripts (for relative paths)
/// * `rows_base` - Directory holding the exported row files
/// * `profile` - Title profile the scripts encode under
/// * `format` - Row file format
///
/// # Returns
/// Summary of the batch import.
pub fn batch_import_scripts(
    script_files: &[PathBuf],
    source_base: &Path,
    rows_base: &Path,
    profile: &Profile,
    format: ExportFormat,
) -> BatchResult {
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);

    // Parallel script rewrite
    let results: Vec<String> = script_files
        .par_iter()
        .map(|script_path| {
            let relative_path = script_path
                .strip_prefix(source_base)
                .unwrap_or(script_path.as_path());
            let display_path = relative_path.to_string_lossy();

            let row_path = match row_file_path(rows_base, relative_path, format) {
                Ok(path) => path,
                Err(message) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    return message;
                }
            };

            let outcome = ScriptFile::load(script_path, profile).and_then(|mut script| {
                let stats = import_script(&mut script, &row_path, format)?;
                let report = script.save(script_path, profile)?;
                Ok((stats, report))
            });

            match outcome {
                Ok((stats, report)) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    if report.is_clean() {
                        format!(
                            "Imported: {display_path} ({} rows, {} changed)",
                            stats.rows, stats.changed
                        )
                    } else {
                        format!(
                            "Imported: {display_path} ({} rows, {} changed, {} glyphs dropped)",
                            stats.rows,
                            stats.changed,
                            report.missing_glyphs.len()
                        )
                    }
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

/// Batch extract MPK archives in parallel
///
/// Each archive is extracted into a directory named after the archive
/// (without extension), preserving the source directory structure.
///
/// # Arguments
/// * `mpk_files` - Archives to extract
/// * `source_base` - Base directory of the archives (for relative paths)
/// * `dest_base` - Destination directory for extracted trees
///
/// # Returns
/// Summary of the batch extraction.
pub fn batch_extract_mpks(
    mpk_files: &[PathBuf],
    source_base: &Path,
    dest_base: &Path,
) -> BatchResult {
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);

    // Parallel archive extraction
    let results: Vec<String> = mpk_files
        .par_iter()
        .map(|mpk_path| {
            let display_path = display_relative(mpk_path, source_base);

            let outcome = read_mpk(mpk_path).and_then(|archive| {
                archive.unpack_to_dir(extracted_dir(dest_base, source_base, mpk_path))
            });

            match outcome {
                Ok(written) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Extracted: {display_path} ({written} files)")
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

/// Batch import replacement files into MPK archives in parallel
///
/// Each archive pulls replacements from the directory its extraction
/// produced, then is rewritten in place.
///
/// # Arguments
/// * `mpk_files` - Archives to rewrite
/// * `source_base` - Base directory of the archives (for relative paths)
/// * `extracted_base` - Directory holding the extracted trees
///
/// # Returns
/// Summary of the batch import.
pub fn batch_import_mpks(
    mpk_files: &[PathBuf],
    source_base: &Path,
    extracted_base: &Path,
) -> BatchResult {
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);

    // Parallel archive rewrite
    let results: Vec<String> = mpk_files
        .par_iter()
        .map(|mpk_path| {
            let display_path = display_relative(mpk_path, source_base);

            let outcome = read_mpk(mpk_path).and_then(|mut archive| {
                let replaced = archive
                    .import_from_dir(extracted_dir(extracted_base, source_base, mpk_path))?;
                write_mpk(mpk_path, &archive)?;
                Ok(replaced)
            });

            match outcome {
                Ok(replaced) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Imported: {display_path} ({replaced} files replaced)")
                }
                Err(e) => {
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    format!("Failed {display_path}: {e}")
                }
            }
        })
        .collect();

    BatchResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}

/// Row file path for a script: same relative location, with the row
/// extension appended to the full file name. Parent directories are
/// created on the way.
fn row_file_path(
    base: &Path,
    relative_path: &Path,
    format: ExportFormat,
) -> std::result::Result<PathBuf, String> {
    let file_name = relative_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let relative_parent = relative_path.parent().unwrap_or(Path::new(""));

    let dir = base.join(relative_parent);
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create folder for {file_name}: {e}"))?;

    Ok(dir.join(format!("{file_name}.{}", format.extension())))
}

/// Extraction directory for an archive: same relative location, named
/// after the archive without its extension.
fn extracted_dir(base: &Path, source_base: &Path, mpk_path: &Path) -> PathBuf {
    let relative_path = mpk_path.strip_prefix(source_base).unwrap_or(mpk_path);
    let relative_parent = relative_path.parent().unwrap_or(Path::new(""));
    let stem = mpk_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    base.join(relative_parent).join(stem)
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::formats::msb::{MsbScript, msb_to_bytes, read_msb};
    use crate::formats::text::fixtures::simple_profile;
    use crate::formats::text::{EncodeReport, EntryKind, ScriptEntry};
    use crate::translation::read_rows;

    fn write_sample_msb(path: &Path, body: &str) {
        let script = MsbScript {
            unk: 0,
            stream_base: 0,
            entries: vec![ScriptEntry {
                kind: EntryKind::Dialogue,
                speaker: "A".to_string(),
                body: body.to_string(),
                ..ScriptEntry::default()
            }],
        };
        let mut report = EncodeReport::default();
        let bytes = msb_to_bytes(&script, &simple_profile(), &mut report).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_find_script_files_sorted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.SCX"), b"").unwrap();
        std::fs::write(dir.path().join("a.msb"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let files = find_script_files(dir.path());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name().unwrap(), "a.msb");
        assert_eq!(files[1].file_name().unwrap(), "b.SCX");
    }

    #[test]
    fn test_batch_export_and_import() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scripts");
        let rows = dir.path().join("rows");
        std::fs::create_dir_all(source.join("day1")).unwrap();

        write_sample_msb(&source.join("day1/scene01.msb"), "AB");
        write_sample_msb(&source.join("scene02.msb"), "C");

        let profile = simple_profile();
        let files = find_script_files(&source);
        let export = batch_export_scripts(&files, &source, &rows, &profile, ExportFormat::Tsv);
        assert_eq!(export.success_count, 2);
        assert_eq!(export.fail_count, 0);
        assert!(rows.join("day1/scene01.msb.tsv").exists());
        assert!(rows.join(SPEAKERS_FILE).exists());

        // Retranslate one body, then push everything back.
        let row_file = rows.join("scene02.msb.tsv");
        let mut parsed = read_rows(&row_file, ExportFormat::Tsv).unwrap();
        parsed[0].translation = "BA".to_string();
        crate::translation::write_rows(&parsed, &row_file, ExportFormat::Tsv).unwrap();

        let import = batch_import_scripts(&files, &source, &rows, &profile, ExportFormat::Tsv);
        assert_eq!(import.success_count, 2);
        assert_eq!(import.fail_count, 0);

        let reloaded = read_msb(source.join("scene02.msb"), &profile).unwrap();
        assert_eq!(reloaded.entries[0].body, "BA");
    }

    #[test]
    fn test_batch_import_missing_rows_counted_as_failure() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("scripts");
        std::fs::create_dir_all(&source).unwrap();
        write_sample_msb(&source.join("scene01.msb"), "A");

        let profile = simple_profile();
        let files = find_script_files(&source);
        let empty_rows = dir.path().join("rows");
        std::fs::create_dir_all(&empty_rows).unwrap();

        let result = batch_import_scripts(&files, &source, &empty_rows, &profile, ExportFormat::Tsv);
        assert_eq!(result.success_count, 0);
        assert_eq!(result.fail_count, 1);
        assert!(result.results[0].starts_with("Failed scene01.msb"));
    }
}
