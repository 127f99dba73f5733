use crate::types::PixelSpacing;

/// Pixel-spacing record accumulated from one accepted CT image upload
///
/// These records are the calibration side of the join: structure sets
/// adopt the spacing of the most recently ingested record sharing their
/// patient identifier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageSpacingRecord {
    pub patient_id: String,
    pub study_uid: String,
    pub series_uid: String,
    pub pixel_spacing: PixelSpacing,
}

/// Structure-set record accumulated from one accepted RT structure set upload
///
/// `raw_volume` is fixed at ingestion and never mutated afterwards;
/// `volume_cc` is derived from it by the calibration join. Keeping the
/// two apart makes repeated calibration passes return the same value
/// instead of rescaling an already-calibrated number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct StructureSetRecord {
    pub filename: String,
    pub patient_id: String,
    pub study_uid: String,
    pub series_uid: String,
    /// Signed shoelace volume in pixel units; `None` when the target
    /// region was not present in the file
    pub raw_volume: Option<f64>,
    /// Spacing adopted by the calibration join, once a matching CT
    /// upload has been seen
    pub pixel_spacing: Option<PixelSpacing>,
    /// Calibrated volume in cubic centimeters, derived from `raw_volume`
    pub volume_cc: Option<f64>,
    /// Sum of contour counts across every region in the file
    pub approved_images: usize,
    /// Number of contour-image references on the acquisition series
    pub total_scans: usize,
}

impl StructureSetRecord {
    /// Returns whether the calibration join has produced a physical volume
    pub fn is_calibrated(&self) -> bool {
        self.volume_cc.is_some()
    }

    /// Volume for listing display: calibrated when available, raw otherwise
    pub fn display_volume(&self) -> Option<f64> {
        self.volume_cc.or(self.raw_volume)
    }
}
