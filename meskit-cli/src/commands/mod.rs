use clap::Subcommand;
use std::path::PathBuf;

use meslib::translation::ExportFormat;

pub mod export;
pub mod import;
pub mod dump;
pub mod speakers;
pub mod mpk;
pub mod font;

#[derive(Subcommand)]
pub enum Commands {
    /// Export scripts to editable translation row files
    Export {
        /// Directory containing .msb/.scx scripts
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory for row files
        #[arg(short, long)]
        destination: PathBuf,

        /// Directory holding title profiles
        #[arg(short, long, default_value = "profiles")]
        profiles: PathBuf,

        /// Title profile name
        #[arg(short, long)]
        title: String,

        /// Row file format (tsv or csv)
        #[arg(short, long, default_value = "tsv")]
        format: String,
    },

    /// Import translated row files back into scripts
    Import {
        /// Directory containing .msb/.scx scripts (rewritten in place)
        #[arg(short, long)]
        source: PathBuf,

        /// Directory holding the exported row files
        #[arg(short, long)]
        rows: PathBuf,

        /// Directory holding title profiles
        #[arg(short, long, default_value = "profiles")]
        profiles: PathBuf,

        /// Title profile name
        #[arg(short, long)]
        title: String,

        /// Row file format (tsv or csv)
        #[arg(short, long, default_value = "tsv")]
        format: String,

        /// Keep a .bak copy of each script before rewriting
        #[arg(long)]
        backup: bool,
    },

    /// Decode a script and print its entries
    Dump {
        /// Script file (.msb or .scx)
        #[arg(short, long)]
        source: PathBuf,

        /// Directory holding title profiles
        #[arg(short, long, default_value = "profiles")]
        profiles: PathBuf,

        /// Title profile name
        #[arg(short, long)]
        title: String,
    },

    /// Apply a speaker glossary to exported row files
    Speakers {
        /// Directory holding the exported row files
        #[arg(short, long)]
        rows: PathBuf,

        /// Glossary file (defaults to speakers.tsv inside the rows directory)
        #[arg(short, long)]
        glossary: Option<PathBuf>,

        /// Row file format (tsv or csv)
        #[arg(short, long, default_value = "tsv")]
        format: String,
    },

    /// MPK archive operations
    Mpk {
        #[command(subcommand)]
        command: mpk::MpkCommands,
    },

    /// MFNT font table operations
    Font {
        #[command(subcommand)]
        command: font::FontCommands,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Export { source, destination, profiles, title, format } => {
                export::execute(source, destination, profiles, title, format)
            }
            Commands::Import { source, rows, profiles, title, format, backup } => {
                import::execute(source, rows, profiles, title, format, *backup)
            }
            Commands::Dump { source, profiles, title } => {
                dump::execute(source, profiles, title)
            }
            Commands::Speakers { rows, glossary, format } => {
                speakers::execute(rows, glossary.as_deref(), format)
            }
            Commands::Mpk { command } => command.execute(),
            Commands::Font { command } => command.execute(),
        }
    }
}

fn parse_format(name: &str) -> anyhow::Result<ExportFormat> {
    match name.to_lowercase().as_str() {
        "tsv" => Ok(ExportFormat::Tsv),
        "csv" => Ok(ExportFormat::Csv),
        _ => anyhow::bail!("unknown row file format '{name}' (expected tsv or csv)"),
    }
}
