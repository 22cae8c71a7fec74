use std::path::Path;

use meslib::profile::Profile;
use meslib::script::ScriptFile;

pub fn execute(source: &Path, profiles: &Path, title: &str) -> anyhow::Result<()> {
    let profile = Profile::load(profiles, title)?;
    let script = ScriptFile::load(source, &profile)?;

    println!("{:?}: {} entries", source, script.entries().len());
    for (index, entry) in script.entries().iter().enumerate() {
        if entry.is_invalid {
            println!("[{index}] invalid");
            continue;
        }

        let mut header = format!("[{index}] {}", entry.kind.as_str());
        if !entry.speaker.is_empty() {
            header.push(' ');
            header.push_str(&entry.speaker);
        }
        if !entry.static_code.is_empty() {
            header.push(' ');
            header.push_str(&entry.static_code);
        }
        println!("{header}");

        for line in entry.body.lines() {
            println!("      {line}");
        }
    }
    Ok(())
}
