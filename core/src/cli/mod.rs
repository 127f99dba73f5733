pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::ingest::DEFAULT_TARGET_REGION;

/// Command-line arguments for cardiovol
#[derive(Parser, Debug)]
#[command(name = "cardiovol")]
#[command(about = "Inspect a DICOM file and report its region volume data")]
#[command(version)]
pub struct Cli {
    /// Path to DICOM file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Region of interest to compute the volume of
    #[arg(short, long, default_value = DEFAULT_TARGET_REGION)]
    pub region: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Initializes env_logger at Info level, Debug when verbose
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
