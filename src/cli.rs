use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Generate Asterisk container build configurations from layered templates")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory containing the layered template files
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,

    /// Output directory for generated configuration documents
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Path to the supported-builds matrix file
    #[arg(long)]
    pub builds_file: Option<PathBuf>,

    /// Path to configuration file (overrides default /etc/switchboard/switchboard.toml)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Suppress informational output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Generate the config for one version/distribution pair
    Generate {
        /// Asterisk version (e.g. 18.26.4, 22.5.2, 13.21-cert6, git)
        version: String,
        /// Distribution name (e.g. trixie, bookworm)
        distribution: String,
        /// Specific output file path (overrides --output-dir)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Regenerate even if the output file already exists
        #[arg(long)]
        force: bool,
    },
    /// Generate configs for every entry in the supported-builds matrix
    GenerateAll {
        /// Regenerate configs that already exist
        #[arg(long)]
        force: bool,
    },
    /// Print the expected image name for a version
    ImageName { version: String },
    /// Print the menuselect commands for a version
    Menuselect { version: String },
}
