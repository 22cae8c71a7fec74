use std::path::{Path, PathBuf};

use meslib::batch::{batch_import_scripts, find_script_files};
use meslib::profile::Profile;

use super::parse_format;

pub fn execute(
    source: &Path,
    rows: &Path,
    profiles: &Path,
    title: &str,
    format: &str,
    backup: bool,
) -> anyhow::Result<()> {
    let format = parse_format(format)?;
    let profile = Profile::load(profiles, title)?;

    let files = find_script_files(source);
    if files.is_empty() {
        println!("No script files found in {:?}", source);
        return Ok(());
    }

    if backup {
        for file in &files {
            std::fs::copy(file, backup_path(file))?;
        }
        println!("Backed up {} scripts", files.len());
    }

    println!("Importing {} row files from {:?} into {:?}", files.len(), rows, source);
    let result = batch_import_scripts(&files, source, rows, &profile, format);
    for line in &result.results {
        println!("  {line}");
    }

    if result.fail_count > 0 {
        anyhow::bail!("{} of {} scripts failed", result.fail_count, files.len());
    }
    println!("✓ Imported {} scripts", result.success_count);
    Ok(())
}

/// `scene01.msb` backs up to `scene01.msb.bak`.
fn backup_path(script: &Path) -> PathBuf {
    let mut name = script.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
