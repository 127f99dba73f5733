use dicom_object::{DefaultDicomObject, InMemDicomObject};

use crate::types::Modality;

use super::tags::{get_string_value, trim_uid, SOP_CLASS_UID};

/// Classifies a dataset by its SOP Class UID element
///
/// Used for objects without a file meta header. The classification code
/// is the only field examined; a dataset without one classifies as
/// [`Modality::Other`] rather than raising.
pub fn classify_modality(dcm: &InMemDicomObject) -> Modality {
    let uid = get_string_value(dcm, SOP_CLASS_UID);
    Modality::from_sop_class_uid(uid.as_deref())
}

/// Classifies a file-backed object by its Media Storage SOP Class UID
///
/// # Algorithm
///
/// 1. Read the Media Storage SOP Class UID from the file meta header
/// 2. If the header value is empty, fall back to the dataset SOP Class UID
/// 3. Unrecognized or absent codes classify as [`Modality::Other`]
pub fn classify_file(obj: &DefaultDicomObject) -> Modality {
    let meta_uid = trim_uid(&obj.meta().media_storage_sop_class_uid);
    if meta_uid.is_empty() {
        classify_modality(obj)
    } else {
        Modality::from_sop_class_uid(Some(meta_uid))
    }
}
