use cardiovol_core::cli::{setup_logging, Cli, OutputFormat};
use cardiovol_core::{ClassifiedUpload, UploadExtractor, VolumeReport};
use clap::Parser;
use log::{error, info};
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if !cli.file.is_file() {
        eprintln!("Error: {} is not a file", cli.file.display());
        process::exit(1);
    }

    info!("Reading {}", cli.file.display());

    let obj = match dicom_object::open_file(&cli.file) {
        Ok(obj) => obj,
        Err(e) => {
            error!("Failed to read DICOM file: {}", e);
            eprintln!("Error: Failed to read {}: {}", cli.file.display(), e);
            process::exit(1);
        }
    };

    let upload = match UploadExtractor::extract(&obj) {
        Ok(upload) => upload,
        Err(e) => {
            error!("Failed to extract metadata: {}", e);
            eprintln!("Error: Failed to extract metadata: {}", e);
            process::exit(1);
        }
    };

    output_report(&upload, &cli.region, cli.format);
}

fn output_report(upload: &ClassifiedUpload, region: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", VolumeReport::new(upload, region));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(upload, region) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                let _ = (upload, region);
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

#[cfg(feature = "json")]
fn output_json(upload: &ClassifiedUpload, region: &str) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct ReportJson<'a> {
        #[serde(flatten)]
        upload: &'a ClassifiedUpload,
        target_region: &'a str,
        raw_volume: Option<f64>,
    }

    let raw_volume = match upload {
        ClassifiedUpload::StructureSet(meta) => meta.region_volume(region),
        _ => None,
    };

    serde_json::to_string_pretty(&ReportJson {
        upload,
        target_region: region,
        raw_volume,
    })
}
