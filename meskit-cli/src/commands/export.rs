use std::path::Path;

use meslib::batch::{batch_export_scripts, find_script_files};
use meslib::profile::Profile;

use super::parse_format;

pub fn execute(
    source: &Path,
    destination: &Path,
    profiles: &Path,
    title: &str,
    format: &str,
) -> anyhow::Result<()> {
    let format = parse_format(format)?;
    let profile = Profile::load(profiles, title)?;

    let files = find_script_files(source);
    if files.is_empty() {
        println!("No script files found in {:?}", source);
        return Ok(());
    }

    println!("Exporting {} scripts from {:?} to {:?}", files.len(), source, destination);
    std::fs::create_dir_all(destination)?;

    let result = batch_export_scripts(&files, source, destination, &profile, format);
    for line in &result.results {
        println!("  {line}");
    }

    if result.fail_count > 0 {
        anyhow::bail!("{} of {} scripts failed", result.fail_count, files.len());
    }
    println!("✓ Exported {} scripts", result.success_count);
    Ok(())
}
