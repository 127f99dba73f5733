use cardiovol_core::cli::setup_logging;
use cardiovol_core::{BatchReport, Ingestor, StorageLayout, StructureSetRecord, Upload};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;

/// CLI tool for ingesting a directory of DICOM uploads
#[derive(Parser, Debug)]
#[command(name = "cardioingest")]
#[command(about = "Ingest a directory of DICOM files and report calibrated region volumes")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Base directory uploads are persisted under
    #[arg(short, long, default_value = "uploads")]
    storage_root: PathBuf,

    /// Region of interest to compute the volume of
    #[arg(short, long, default_value = "HEART")]
    region: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("Processing directory: {}", cli.directory.display());

    let uploads = match collect_uploads(&cli.directory) {
        Ok(uploads) => uploads,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };

    if uploads.is_empty() {
        eprintln!("Error: No files found in directory");
        process::exit(1);
    }

    info!("Found {} files", uploads.len());

    let ingestor =
        Ingestor::new(StorageLayout::new(&cli.storage_root)).with_target_region(&cli.region);

    let report = ingestor.process_batch(&uploads);

    if report.processed.is_empty() {
        for failure in &report.failures {
            eprintln!("{}: {}", failure.filename, failure.reason);
        }
        eprintln!("Error: No files could be ingested");
        process::exit(1);
    }

    info!(
        "Ingested {} of {} files",
        report.processed.len(),
        report.submitted
    );

    let listing = ingestor.listing();
    output_results(&report, &listing, cli.format);
}

/// Reads every regular file in the directory, non-recursively
///
/// Files are submitted as-is; the ingestor's extension allow-list
/// decides what gets processed. A `.dcm` file without the DICM magic
/// code gets a warning up front since its decode is going to fail.
fn collect_uploads(directory: &Path) -> std::io::Result<Vec<Upload>> {
    let mut uploads = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                warn!("Skipping file with non-UTF-8 name: {}", path.display());
                continue;
            }
        };

        let bytes = std::fs::read(&path)?;
        if filename.to_ascii_lowercase().ends_with(".dcm") && !has_dicom_magic(&bytes) {
            warn!("{} does not look like a DICOM file", filename);
        }

        uploads.push(Upload::new(filename, bytes));
    }

    Ok(uploads)
}

/// Checks for the DICM magic code after the 128-byte preamble, or at
/// the start of the stream for files written without a preamble
fn has_dicom_magic(bytes: &[u8]) -> bool {
    (bytes.len() >= 132 && &bytes[128..132] == b"DICM")
        || (bytes.len() >= 4 && &bytes[..4] == b"DICM")
}

fn output_results(report: &BatchReport, listing: &[StructureSetRecord], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            print_text(report, listing);
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(report, listing) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                let _ = (report, listing);
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

fn print_text(report: &BatchReport, listing: &[StructureSetRecord]) {
    println!("Batch Report");
    println!("============");
    println!();
    println!("Submitted: {}", report.submitted);
    println!("Processed: {}", report.processed.len());
    println!("Failed:    {}", report.failures.len());
    println!();

    for file in &report.processed {
        match &file.patient_id {
            Some(patient_id) => println!("{} (patient {})", file.summary, patient_id),
            None => println!("{}", file.summary),
        }
    }
    for failure in &report.failures {
        println!("{} failed: {}", failure.filename, failure.reason);
    }
    println!();

    println!("{}", cardiovol_core::ListingTable::new(listing));
}

#[cfg(feature = "json")]
fn output_json(
    report: &BatchReport,
    listing: &[StructureSetRecord],
) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct IngestJson<'a> {
        report: &'a BatchReport,
        listing: &'a [StructureSetRecord],
    }

    serde_json::to_string_pretty(&IngestJson { report, listing })
}
