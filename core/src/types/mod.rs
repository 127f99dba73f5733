//! Core type definitions for the upload pipeline
//!
//! This module provides the fundamental types used throughout the cardiovol library:
//! - [`Modality`]: Classification of uploaded DICOM files (CT image, RT structure set, other)
//! - [`PixelSpacing`]: Physical pixel spacing pair used for volume calibration
//! - [`Region`]: A named region of interest together with its contour stack
//! - [`ImageSpacingRecord`]: Accumulated spacing metadata from CT image uploads
//! - [`StructureSetRecord`]: Accumulated volume results from structure-set uploads

mod modality;
mod pixel_spacing;
mod records;
mod region;

pub use modality::Modality;
pub use pixel_spacing::PixelSpacing;
pub use records::{ImageSpacingRecord, StructureSetRecord};
pub use region::Region;
