use std::path::Path;

use meslib::batch::find_files_with_extension;
use meslib::translation::speakers::{apply_speakers_to_rows, read_speakers, SPEAKERS_FILE};
use meslib::translation::{read_rows, write_rows};

use super::parse_format;

pub fn execute(rows: &Path, glossary: Option<&Path>, format: &str) -> anyhow::Result<()> {
    let format = parse_format(format)?;
    let glossary_path = glossary.map_or_else(|| rows.join(SPEAKERS_FILE), Path::to_path_buf);

    let map = read_speakers(&glossary_path)?;
    println!("Loaded {} speakers from {:?}", map.len(), glossary_path);

    let mut updated_files = 0;
    for row_path in find_files_with_extension(rows, format.extension()) {
        if row_path.file_name().is_some_and(|name| name == SPEAKERS_FILE) {
            continue;
        }

        let mut table = read_rows(&row_path, format)?;
        let changed = apply_speakers_to_rows(&mut table, &map);
        if changed > 0 {
            write_rows(&table, &row_path, format)?;
            updated_files += 1;
            println!("  {:?}: {changed} speakers filled in", row_path);
        }
    }

    println!("✓ Updated {updated_files} row files");
    Ok(())
}
