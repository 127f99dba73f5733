use std::fmt;

use crate::extraction::tags::{trim_uid, CT_IMAGE_STORAGE, RT_STRUCTURE_SET_STORAGE};

/// Modality classification of an uploaded DICOM file
///
/// Decided once per upload from the SOP Class UID in the file metadata.
/// Anything that is not a CT image or an RT structure set is `Other`,
/// including files with no classification code at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum Modality {
    CtImage,
    RtStructureSet,
    Other,
}

impl Modality {
    /// Returns whether this is an unrecognized modality
    pub fn is_other(&self) -> bool {
        matches!(self, Modality::Other)
    }

    /// Returns whether this is a CT image instance
    pub fn is_ct_image(&self) -> bool {
        matches!(self, Modality::CtImage)
    }

    /// Returns whether this is an RT structure set
    pub fn is_structure_set(&self) -> bool {
        matches!(self, Modality::RtStructureSet)
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            Modality::CtImage => "ct-image",
            Modality::RtStructureSet => "rt-structure-set",
            Modality::Other => "other",
        }
    }

    /// Classifies from a SOP Class UID
    ///
    /// An absent UID is a valid input and classifies as `Other`; no error
    /// is ever raised here. Trailing NUL/space padding is trimmed before
    /// the comparison.
    pub fn from_sop_class_uid(uid: Option<&str>) -> Self {
        match uid.map(trim_uid) {
            Some(CT_IMAGE_STORAGE) => Modality::CtImage,
            Some(RT_STRUCTURE_SET_STORAGE) => Modality::RtStructureSet,
            _ => Modality::Other,
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}
