use meslib::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const MANIFEST: &str = r#"
[settings]
bytes_per_char = 2
asymmetric_color_code = true

[[opcode]]
byte = 0x00
name = "NextLine"

[[opcode]]
byte = 0x04
name = "Color"
args = 3

[[opcode]]
byte = 0x0F
name = "Center"

[[button]]
index = 0x65
name = "BUTTON_A"

[[special_char]]
index = 0x7F
glyph = " "
"#;

const FONT: &str = " abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.,!?";

/// Lay out profiles/testgame/{profile.toml,font.txt} and load it.
fn write_test_profile(root: &Path) -> (PathBuf, Profile) {
    let profiles_dir = root.join("profiles");
    let title_dir = profiles_dir.join("testgame");
    std::fs::create_dir_all(&title_dir).unwrap();
    std::fs::write(title_dir.join("profile.toml"), MANIFEST).unwrap();
    std::fs::write(title_dir.join("font.txt"), FONT).unwrap();

    let profile = Profile::load(&profiles_dir, "testgame").unwrap();
    (profiles_dir, profile)
}

fn dialogue(speaker: &str, body: &str) -> ScriptEntry {
    ScriptEntry {
        kind: EntryKind::Dialogue,
        speaker: speaker.to_string(),
        body: body.to_string(),
        ..ScriptEntry::default()
    }
}

#[test]
fn test_msb_file_round_trip() {
    let dir = tempdir().unwrap();
    let (_, profile) = write_test_profile(dir.path());
    let path = dir.path().join("scene01.msb");

    let script = MsbScript {
        unk: 3,
        stream_base: 0,
        entries: vec![
            dialogue("Rin", "Hello!\nNice to meet you."),
            ScriptEntry {
                body: "Chapter One".to_string(),
                static_code: "<Center>".to_string(),
                ..ScriptEntry::default()
            },
            ScriptEntry::invalid(9),
            dialogue("Aki", "Press <BUTTON_A> to continue."),
        ],
    };

    let report = write_msb(&path, &script, &profile).unwrap();
    assert!(report.is_clean());

    let reloaded = read_msb(&path, &profile).unwrap();
    assert_eq!(reloaded.unk, 3);
    assert_eq!(reloaded.entries, script.entries);
}

#[test]
fn test_scx_file_round_trip_preserves_opaque_regions() {
    let dir = tempdir().unwrap();
    let (_, profile) = write_test_profile(dir.path());
    let path = dir.path().join("scene01.scx");

    let script = ScxScript {
        script_data: vec![0x13, 0x37, 0x00, 0x42],
        unk_table: vec![0xAA, 0xBB],
        entries: vec![
            dialogue("Rin", "Colors <Color:10,20,30,40>shine<Color:1,2,3> here."),
            ScriptEntry::invalid(0),
        ],
    };

    ScriptFile::Scx(script.clone()).save(&path, &profile).unwrap();

    let loaded = ScriptFile::load(&path, &profile).unwrap();
    assert_eq!(loaded.format(), ScriptFormat::Scx);

    let ScriptFile::Scx(reloaded) = loaded else {
        panic!("wrong container variant");
    };
    assert_eq!(reloaded.script_data, script.script_data);
    assert_eq!(reloaded.unk_table, script.unk_table);
    assert_eq!(reloaded.entries, script.entries);
}

#[test]
fn test_translation_workflow_end_to_end() {
    let dir = tempdir().unwrap();
    let (_, profile) = write_test_profile(dir.path());

    let scripts_dir = dir.path().join("scripts");
    let rows_dir = dir.path().join("rows");
    std::fs::create_dir_all(&scripts_dir).unwrap();

    let script = MsbScript {
        unk: 0,
        stream_base: 0,
        entries: vec![
            dialogue("Rin", "Good morning."),
            dialogue("Aki", "You again, Rin?"),
        ],
    };
    write_msb(scripts_dir.join("scene01.msb"), &script, &profile).unwrap();

    // Export everything for the translators.
    let files = find_script_files(&scripts_dir);
    let export = batch_export_scripts(
        &files,
        &scripts_dir,
        &rows_dir,
        &profile,
        ExportFormat::Tsv,
    );
    assert_eq!(export.success_count, 1);
    assert_eq!(export.fail_count, 0);

    // Translate the speaker glossary once, apply it to the row files.
    let speakers_path = rows_dir.join("speakers.tsv");
    let mut glossary = read_speakers(&speakers_path).unwrap();
    assert_eq!(glossary.len(), 2);
    glossary.insert("Rin".to_string(), "RIN".to_string());

    let row_path = rows_dir.join("scene01.msb.tsv");
    let mut rows = meslib::translation::read_rows(&row_path, ExportFormat::Tsv).unwrap();
    let renamed = meslib::translation::speakers::apply_speakers_to_rows(&mut rows, &glossary);
    assert_eq!(renamed, 1);

    // Translate one line.
    rows[0].translation = "Morning already?".to_string();
    meslib::translation::write_rows(&rows, &row_path, ExportFormat::Tsv).unwrap();

    // Pull the rows back into the script files.
    let import = batch_import_scripts(
        &files,
        &scripts_dir,
        &rows_dir,
        &profile,
        ExportFormat::Tsv,
    );
    assert_eq!(import.success_count, 1);
    assert_eq!(import.fail_count, 0);

    let reloaded = read_msb(scripts_dir.join("scene01.msb"), &profile).unwrap();
    assert_eq!(reloaded.entries[0].speaker, "RIN");
    assert_eq!(reloaded.entries[0].body, "Morning already?");
    assert_eq!(reloaded.entries[1].speaker, "Aki");
    assert_eq!(reloaded.entries[1].body, "You again, Rin?");
}

#[test]
fn test_script_inside_mpk_archive() {
    let dir = tempdir().unwrap();
    let (_, profile) = write_test_profile(dir.path());
    let mpk_path = dir.path().join("script.mpk");

    let script = MsbScript {
        unk: 0,
        stream_base: 0,
        entries: vec![dialogue("Rin", "Packed away.")],
    };
    let mut report = EncodeReport::default();
    let script_bytes =
        meslib::formats::msb::msb_to_bytes(&script, &profile, &mut report).unwrap();

    let mut entry = MpkEntry {
        compress_flag: meslib::formats::mpk::COMPRESSION_ZLIB,
        index: 0,
        uncompressed_size: 0,
        path: "script/scene01.msb".to_string(),
        data: Vec::new(),
    };
    entry.replace_data(&script_bytes).unwrap();

    let archive = MpkArchive {
        unk1: 0,
        unk2: 2,
        reserved: [0; 0x30],
        entries: vec![entry],
    };
    write_mpk(&mpk_path, &archive).unwrap();

    // Read the script straight out of the archive, no disk extraction.
    let reloaded = read_mpk(&mpk_path).unwrap();
    let payload = reloaded
        .entry_by_path("script/scene01.msb")
        .unwrap()
        .extracted_data()
        .unwrap();
    let inner = ScriptFile::from_bytes(ScriptFormat::Msb, &payload, &profile).unwrap();
    assert_eq!(inner.entries()[0].body, "Packed away.");
}

#[test]
fn test_missing_glyph_survives_translation() {
    let dir = tempdir().unwrap();
    let (_, profile) = write_test_profile(dir.path());
    let path = dir.path().join("scene01.msb");

    let script = MsbScript {
        unk: 0,
        stream_base: 0,
        // The em-dash is not in the font table.
        entries: vec![dialogue("Rin", "Wait\u{2014}what?")],
    };

    let report = write_msb(&path, &script, &profile).unwrap();
    assert_eq!(report.missing_glyphs, vec!['\u{2014}']);

    let reloaded = read_msb(&path, &profile).unwrap();
    assert_eq!(reloaded.entries[0].body, "Waitwhat?");
}
