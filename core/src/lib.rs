pub mod api;
pub mod cli;
pub mod error;
pub mod extraction;
pub mod ingest;
pub mod types;
pub mod volume;

pub use api::{
    ClassifiedUpload, CtImageMetadata, OtherUpload, StructureSetMetadata, UploadExtractor,
};
pub use cli::report::{ListingTable, VolumeReport};
pub use error::{CardiovolError, Result};
pub use ingest::{
    BatchReport, FailedFile, Ingestor, ProcessedFile, RecordStore, StorageLayout, Upload,
};
pub use types::*;
pub use volume::{calibrated_volume, contour_area, contour_stack_area, CUBIC_MM_TO_CC};
