/// A named region of interest with its contour stack
///
/// Carries the ROI name and its per-slice contour data together in one
/// record, so a lookup by name yields the contours directly with no
/// index bookkeeping against a second list.
///
/// Each contour is a flattened `(x0, y0, x1, y1, ...)` point list for one
/// image slice, with the depth coordinate already stripped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Region {
    pub name: String,
    pub contours: Vec<Vec<f64>>,
}

impl Region {
    /// Creates a new region
    pub fn new(name: impl Into<String>, contours: Vec<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            contours,
        }
    }

    /// Number of image slices this region has contours on
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }
}
