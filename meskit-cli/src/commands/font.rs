use clap::Subcommand;
use std::path::{Path, PathBuf};

use meslib::formats::mft::{read_mft, write_atlas_png};

#[derive(Subcommand)]
pub enum FontCommands {
    /// Render the glyph atlas to a grayscale PNG
    Export {
        /// Source MFNT font table
        #[arg(short, long)]
        source: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        destination: PathBuf,
    },
}

impl FontCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            FontCommands::Export { source, destination } => {
                export(source, destination)
            }
        }
    }
}

fn export(source: &Path, destination: &Path) -> anyhow::Result<()> {
    let font = read_mft(source)?;
    println!(
        "{:?}: {} glyphs of {}x{} pixels",
        source, font.glyph_count, font.glyph_width, font.glyph_height
    );
    write_atlas_png(&font, destination)?;
    println!("✓ Atlas written to {:?}", destination);
    Ok(())
}
