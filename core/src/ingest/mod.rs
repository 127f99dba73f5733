//! Upload ingestion: decode, classify, persist, accumulate, calibrate
//!
//! The [`Ingestor`] sequences the whole pipeline per uploaded file and
//! owns the two pieces of state the pipeline accumulates: the storage
//! layout on disk and the in-memory record store consumed by the
//! calibration join.

pub mod storage;
pub mod store;

pub use storage::StorageLayout;
pub use store::RecordStore;

use std::sync::OnceLock;

use dicom_object::DefaultDicomObject;
use log::{debug, warn};
use regex::Regex;

use crate::api::{ClassifiedUpload, UploadExtractor};
use crate::error::{CardiovolError, Result};
use crate::types::{ImageSpacingRecord, StructureSetRecord};

/// File extensions accepted for ingestion, compared case-insensitively
pub const ALLOWED_EXTENSIONS: &[&str] = &["dcm"];

/// Region searched for by default when no override is given
pub const DEFAULT_TARGET_REGION: &str = "HEART";

/// Magic code at offset 128 of a standard DICOM file
const DICM_MAGIC: &[u8; 4] = b"DICM";

/// One submitted file: its original name and raw bytes
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Outcome of one successfully processed file
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ProcessedFile {
    /// Sanitized filename the upload was stored under
    pub filename: String,
    pub patient_id: Option<String>,
    /// One-line classification summary
    pub summary: String,
}

/// Outcome of one file that failed to process
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FailedFile {
    pub filename: String,
    pub reason: String,
}

/// Report for one upload batch
///
/// `submitted` counts every file handed in, including those skipped by
/// the extension allow-list; skipped files appear in no other field.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct BatchReport {
    pub submitted: usize,
    pub processed: Vec<ProcessedFile>,
    pub failures: Vec<FailedFile>,
}

/// Sequences the ingestion pipeline and owns its accumulated state
#[derive(Debug)]
pub struct Ingestor {
    layout: StorageLayout,
    store: RecordStore,
    target_region: String,
}

impl Ingestor {
    /// Creates an ingestor over the given storage layout
    ///
    /// The target region defaults to [`DEFAULT_TARGET_REGION`].
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            store: RecordStore::new(),
            target_region: DEFAULT_TARGET_REGION.to_string(),
        }
    }

    /// Overrides the region whose volume is computed on ingestion
    pub fn with_target_region(mut self, name: impl Into<String>) -> Self {
        self.target_region = name.into();
        self
    }

    /// Region this ingestor computes volumes for
    pub fn target_region(&self) -> &str {
        &self.target_region
    }

    /// The record store accumulated by this ingestor
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Processes a batch of uploads, one file at a time
    ///
    /// Files without an allowed extension are skipped silently: counted
    /// in the batch total, absent from both the processed and failed
    /// lists. A failure on one file never aborts the rest of the batch.
    pub fn process_batch(&self, uploads: &[Upload]) -> BatchReport {
        let mut report = BatchReport {
            submitted: uploads.len(),
            ..BatchReport::default()
        };

        for upload in uploads {
            if !has_allowed_extension(&upload.filename) {
                debug!("Skipping {}: extension not allowed", upload.filename);
                continue;
            }
            match self.process_upload(upload) {
                Ok(processed) => report.processed.push(processed),
                Err(e) => {
                    warn!("Failed to process {}: {}", upload.filename, e);
                    report.failures.push(FailedFile {
                        filename: upload.filename.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Decodes, classifies, persists, and records one upload
    ///
    /// The caller is responsible for the extension allow-list; this
    /// method assumes the file was accepted for ingestion.
    ///
    /// # Errors
    ///
    /// Decode failures, missing required identifiers, a malformed
    /// scan-reference path, and storage IO failures all surface here as
    /// per-file errors.
    pub fn process_upload(&self, upload: &Upload) -> Result<ProcessedFile> {
        let filename = sanitize_filename(&upload.filename);
        let obj = decode_upload(&upload.bytes)?;
        let classified = UploadExtractor::extract(&obj)?;

        self.layout
            .save(classified.modality(), &filename, &upload.bytes)?;

        match &classified {
            ClassifiedUpload::CtImage(meta) => {
                if let Some(spacing) = meta.pixel_spacing {
                    self.store.insert_spacing(ImageSpacingRecord {
                        patient_id: meta.patient_id.clone(),
                        study_uid: meta.study_uid.clone(),
                        series_uid: meta.series_uid.clone(),
                        pixel_spacing: spacing,
                    });
                } else {
                    debug!("{} carries no pixel spacing", filename);
                }
            }
            ClassifiedUpload::StructureSet(meta) => {
                self.store.insert_structure_set(StructureSetRecord {
                    filename: filename.clone(),
                    patient_id: meta.patient_id.clone(),
                    study_uid: meta.study_uid.clone(),
                    series_uid: meta.series_uid.clone(),
                    raw_volume: meta.region_volume(&self.target_region),
                    pixel_spacing: None,
                    volume_cc: None,
                    approved_images: meta.approved_image_count(),
                    total_scans: meta.total_scans,
                });
            }
            ClassifiedUpload::Other(_) => {}
        }

        Ok(ProcessedFile {
            patient_id: classified.patient_id().map(str::to_string),
            summary: classified.summary(&filename),
            filename,
        })
    }

    /// Runs the calibration join and returns the listing rows
    pub fn listing(&self) -> Vec<StructureSetRecord> {
        self.store.calibrated_rows()
    }

    /// Re-decodes a stored structure set by filename
    ///
    /// The name is sanitized the same way as on upload, then the file is
    /// read directly from the structure-set root on every call.
    ///
    /// # Errors
    ///
    /// Returns [`CardiovolError::NotFound`] when no stored file matches,
    /// and a decode error if the stored bytes are not readable DICOM.
    pub fn load_structure_set(&self, filename: &str) -> Result<DefaultDicomObject> {
        let filename = sanitize_filename(filename);
        let path = self.layout.structure_set_path(&filename);
        if !path.is_file() {
            return Err(CardiovolError::NotFound(filename));
        }
        Ok(dicom_object::open_file(path)?)
    }
}

/// Whether a filename passes the extension allow-list
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Makes a submitted filename safe to use as a storage key
///
/// Drops any path components, replaces characters outside
/// `[A-Za-z0-9._-]` with underscores, and strips leading dots so the
/// result can never escape or hide inside the storage root.
pub fn sanitize_filename(filename: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("Failed to compile regex"));

    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    re.replace_all(basename, "_")
        .trim_start_matches('.')
        .to_string()
}

/// Decodes upload bytes into a file-backed DICOM object
///
/// Standard files carry a 128-byte preamble before the DICM magic code;
/// some producers omit it and start at the magic directly. Both forms
/// are accepted.
fn decode_upload(bytes: &[u8]) -> Result<DefaultDicomObject> {
    let stream = if bytes.len() >= 132 && &bytes[128..132] == DICM_MAGIC {
        &bytes[128..]
    } else {
        bytes
    };
    Ok(dicom_object::from_reader(stream)?)
}
