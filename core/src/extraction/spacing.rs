use dicom_object::InMemDicomObject;

use crate::types::PixelSpacing;

use super::tags::{get_float_values, get_string_value, PIXEL_SPACING};

/// Extracts the pixel spacing pair from a DICOM dataset
///
/// # Algorithm
///
/// 1. Read the PixelSpacing element as multi-valued decimals; accept a
///    pair with exactly two components
/// 2. Fall back to reading it as a single string and parsing out two
///    numbers (covers unsplit values like `"0.5\\0.5"`)
/// 3. Absent or malformed spacing yields `None`, never an error
pub fn extract_pixel_spacing(dcm: &InMemDicomObject) -> Option<PixelSpacing> {
    if let Some(values) = get_float_values(dcm, PIXEL_SPACING) {
        if values.len() == 2 {
            return Some(PixelSpacing::new(values[0], values[1]));
        }
    }

    get_string_value(dcm, PIXEL_SPACING).and_then(|s| PixelSpacing::parse(&s).ok())
}
