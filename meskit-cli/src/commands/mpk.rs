use clap::Subcommand;
use std::path::{Path, PathBuf};

use meslib::formats::mpk::{read_mpk, write_mpk, COMPRESSION_STORED, COMPRESSION_ZLIB};

#[derive(Subcommand)]
pub enum MpkCommands {
    /// Extract an archive into a directory
    Extract {
        /// Source MPK archive
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        destination: PathBuf,
    },

    /// Replace archive entries from a directory tree
    Import {
        /// MPK archive to rewrite in place
        #[arg(short, long)]
        source: PathBuf,

        /// Directory holding replacement files
        #[arg(short, long)]
        directory: PathBuf,
    },

    /// List archive contents
    List {
        /// MPK archive
        #[arg(short, long)]
        source: PathBuf,
    },
}

impl MpkCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            MpkCommands::Extract { source, destination } => {
                extract(source, destination)
            }
            MpkCommands::Import { source, directory } => {
                import(source, directory)
            }
            MpkCommands::List { source } => {
                list(source)
            }
        }
    }
}

fn extract(source: &Path, destination: &Path) -> anyhow::Result<()> {
    println!("Extracting {:?} to {:?}", source, destination);
    let archive = read_mpk(source)?;
    let written = archive.unpack_to_dir(destination)?;
    println!("✓ Extracted {written} files");
    Ok(())
}

fn import(source: &Path, directory: &Path) -> anyhow::Result<()> {
    println!("Importing {:?} into {:?}", directory, source);
    let mut archive = read_mpk(source)?;
    let replaced = archive.import_from_dir(directory)?;
    write_mpk(source, &archive)?;
    println!("✓ Replaced {replaced} entries");
    Ok(())
}

fn list(source: &Path) -> anyhow::Result<()> {
    let archive = read_mpk(source)?;
    println!("{:?}: {} entries", source, archive.entries.len());
    println!("{:>5}  {:>10}  {:>10}  {:<7}  path", "idx", "packed", "size", "method");
    for entry in &archive.entries {
        let method = match entry.compress_flag {
            COMPRESSION_STORED => "stored",
            COMPRESSION_ZLIB => "zlib",
            _ => "?",
        };
        println!(
            "{:>5}  {:>10}  {:>10}  {:<7}  {}",
            entry.index,
            entry.data.len(),
            entry.uncompressed_size,
            method,
            entry.path
        );
    }
    Ok(())
}
