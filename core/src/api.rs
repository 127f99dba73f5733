use crate::error::{CardiovolError, Result};
use crate::extraction::tags::{
    get_int_value, get_string_value, INSTANCE_NUMBER, PATIENT_ID, SERIES_INSTANCE_UID,
    STUDY_INSTANCE_UID,
};
use crate::extraction::{
    classify_file, classify_modality, count_referenced_scans, extract_pixel_spacing,
    extract_regions,
};
use crate::types::{Modality, PixelSpacing, Region};
use crate::volume::contour_stack_area;
use dicom_core::Tag;
use dicom_object::{DefaultDicomObject, InMemDicomObject};

/// Classifier and extractor for uploaded DICOM files
///
/// Classifies an upload once and returns a variant carrying only the
/// fields that modality is guaranteed to have, so downstream code never
/// probes a record for attributes it may not hold.
///
/// # Example
///
/// ```
/// use cardiovol_core::{ClassifiedUpload, UploadExtractor};
/// use dicom_object::InMemDicomObject;
/// use dicom_core::{DataElement, PrimitiveValue, VR, Tag};
///
/// // Create a minimal CT image dataset
/// let mut dcm = InMemDicomObject::new_empty();
///
/// dcm.put(DataElement::new(
///     Tag(0x0008, 0x0016), // SOPClassUID
///     VR::UI,
///     PrimitiveValue::from("1.2.840.10008.5.1.4.1.1.2"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0010, 0x0020), // PatientID
///     VR::LO,
///     PrimitiveValue::from("PAT001"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0020, 0x000D), // StudyInstanceUID
///     VR::UI,
///     PrimitiveValue::from("1.2.3"),
/// ));
/// dcm.put(DataElement::new(
///     Tag(0x0020, 0x000E), // SeriesInstanceUID
///     VR::UI,
///     PrimitiveValue::from("1.2.3.4"),
/// ));
///
/// let upload = UploadExtractor::extract_dataset(&dcm).unwrap();
/// assert!(matches!(upload, ClassifiedUpload::CtImage(_)));
/// assert_eq!(upload.patient_id(), Some("PAT001"));
/// ```
pub struct UploadExtractor;

impl UploadExtractor {
    /// Classifies and extracts a file-backed DICOM object
    ///
    /// Classification reads the Media Storage SOP Class UID from the
    /// file meta header.
    ///
    /// # Errors
    ///
    /// Returns an error if a classified CT image or structure set is
    /// missing its required identifiers, or if a structure set lacks the
    /// nested scan-reference path.
    pub fn extract(obj: &DefaultDicomObject) -> Result<ClassifiedUpload> {
        Self::extract_classified(obj, classify_file(obj))
    }

    /// Classifies and extracts a bare dataset without a file meta header
    ///
    /// Classification falls back to the dataset SOP Class UID element.
    pub fn extract_dataset(dcm: &InMemDicomObject) -> Result<ClassifiedUpload> {
        Self::extract_classified(dcm, classify_modality(dcm))
    }

    fn extract_classified(dcm: &InMemDicomObject, modality: Modality) -> Result<ClassifiedUpload> {
        match modality {
            Modality::CtImage => Ok(ClassifiedUpload::CtImage(CtImageMetadata::from_object(dcm)?)),
            Modality::RtStructureSet => Ok(ClassifiedUpload::StructureSet(
                StructureSetMetadata::from_object(dcm)?,
            )),
            Modality::Other => Ok(ClassifiedUpload::Other(OtherUpload {
                patient_id: get_string_value(dcm, PATIENT_ID),
            })),
        }
    }
}

/// One classified upload, with modality decided exactly once
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(tag = "modality", rename_all = "kebab-case"))]
pub enum ClassifiedUpload {
    CtImage(CtImageMetadata),
    StructureSet(StructureSetMetadata),
    Other(OtherUpload),
}

impl ClassifiedUpload {
    /// Modality of this upload
    pub fn modality(&self) -> Modality {
        match self {
            ClassifiedUpload::CtImage(_) => Modality::CtImage,
            ClassifiedUpload::StructureSet(_) => Modality::RtStructureSet,
            ClassifiedUpload::Other(_) => Modality::Other,
        }
    }

    /// Patient identifier, when the modality carries one
    pub fn patient_id(&self) -> Option<&str> {
        match self {
            ClassifiedUpload::CtImage(meta) => Some(&meta.patient_id),
            ClassifiedUpload::StructureSet(meta) => Some(&meta.patient_id),
            ClassifiedUpload::Other(other) => other.patient_id.as_deref(),
        }
    }

    /// One-line classification summary for batch reporting
    pub fn summary(&self, filename: &str) -> String {
        match self {
            ClassifiedUpload::CtImage(meta) => match meta.instance_number {
                Some(instance) => {
                    format!("{} is a CT image (instance {})", filename, instance)
                }
                None => format!("{} is a CT image", filename),
            },
            ClassifiedUpload::StructureSet(_) => {
                format!("{} is an RT structure set", filename)
            }
            ClassifiedUpload::Other(_) => {
                format!("{} is neither a CT image nor an RT structure set", filename)
            }
        }
    }
}

/// Metadata extracted from a CT image instance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CtImageMetadata {
    pub patient_id: String,
    pub study_uid: String,
    pub series_uid: String,
    pub instance_number: Option<i32>,
    pub pixel_spacing: Option<PixelSpacing>,
}

impl CtImageMetadata {
    /// Extracts CT image metadata from a dataset
    ///
    /// # Errors
    ///
    /// Returns [`CardiovolError::TagNotFound`] if the patient, study, or
    /// series identifier is absent. Instance number and pixel spacing
    /// are optional.
    pub fn from_object(dcm: &InMemDicomObject) -> Result<Self> {
        Ok(Self {
            patient_id: require_string(dcm, PATIENT_ID, "PatientID")?,
            study_uid: require_string(dcm, STUDY_INSTANCE_UID, "StudyInstanceUID")?,
            series_uid: require_string(dcm, SERIES_INSTANCE_UID, "SeriesInstanceUID")?,
            instance_number: get_int_value(dcm, INSTANCE_NUMBER),
            pixel_spacing: extract_pixel_spacing(dcm),
        })
    }
}

/// Metadata extracted from an RT structure set
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct StructureSetMetadata {
    pub patient_id: String,
    pub study_uid: String,
    pub series_uid: String,
    /// Named regions with their contour stacks, in file order
    pub regions: Vec<Region>,
    /// Number of contour-image references on the acquisition series
    pub total_scans: usize,
}

impl StructureSetMetadata {
    /// Extracts structure-set metadata from a dataset
    ///
    /// # Errors
    ///
    /// Returns [`CardiovolError::TagNotFound`] if the patient, study, or
    /// series identifier is absent, and
    /// [`CardiovolError::MalformedStructureSet`] if the nested
    /// scan-reference path is missing.
    pub fn from_object(dcm: &InMemDicomObject) -> Result<Self> {
        Ok(Self {
            patient_id: require_string(dcm, PATIENT_ID, "PatientID")?,
            study_uid: require_string(dcm, STUDY_INSTANCE_UID, "StudyInstanceUID")?,
            series_uid: require_string(dcm, SERIES_INSTANCE_UID, "SeriesInstanceUID")?,
            regions: extract_regions(dcm),
            total_scans: count_referenced_scans(dcm)?,
        })
    }

    /// Finds a region by exact name
    ///
    /// Scans the region list in file order and returns the first exact,
    /// case-sensitive match. A region at position zero is an ordinary
    /// hit; absence is `None`, never an error.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// Signed volume of a named region in uncalibrated pixel units
    ///
    /// `None` means the region is not present, which is distinct from a
    /// located region whose contour stack sums to zero.
    pub fn region_volume(&self, name: &str) -> Option<f64> {
        self.region(name)
            .map(|region| contour_stack_area(&region.contours))
    }

    /// Sum of contour counts across every region in the file
    pub fn approved_image_count(&self) -> usize {
        self.regions.iter().map(Region::contour_count).sum()
    }
}

/// An upload that is neither a CT image nor an RT structure set
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct OtherUpload {
    pub patient_id: Option<String>,
}

fn require_string(dcm: &InMemDicomObject, tag: Tag, name: &str) -> Result<String> {
    get_string_value(dcm, tag).ok_or_else(|| CardiovolError::TagNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tags::{
        CONTOUR_DATA, CONTOUR_IMAGE_SEQUENCE, CONTOUR_SEQUENCE, CT_IMAGE_STORAGE, PIXEL_SPACING,
        REFERENCED_FRAME_OF_REFERENCE_SEQUENCE, ROI_CONTOUR_SEQUENCE, ROI_NAME,
        RT_REFERENCED_SERIES_SEQUENCE, RT_REFERENCED_STUDY_SEQUENCE, RT_STRUCTURE_SET_STORAGE,
        SOP_CLASS_UID, STRUCTURE_SET_ROI_SEQUENCE,
    };
    use dicom_core::value::DataSetSequence;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    fn put_str(dcm: &mut InMemDicomObject, tag: Tag, vr: VR, value: &str) {
        dcm.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
    }

    fn put_identifiers(dcm: &mut InMemDicomObject, patient_id: &str) {
        put_str(dcm, PATIENT_ID, VR::LO, patient_id);
        put_str(dcm, STUDY_INSTANCE_UID, VR::UI, "1.2.3");
        put_str(dcm, SERIES_INSTANCE_UID, VR::UI, "1.2.3.4");
    }

    fn make_ct_dataset(patient_id: &str) -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        put_str(&mut dcm, SOP_CLASS_UID, VR::UI, CT_IMAGE_STORAGE);
        put_identifiers(&mut dcm, patient_id);
        put_str(&mut dcm, INSTANCE_NUMBER, VR::IS, "42");
        dcm.put(DataElement::new(
            PIXEL_SPACING,
            VR::DS,
            PrimitiveValue::Strs(vec!["0.5".to_string(), "0.5".to_string()].into()),
        ));
        dcm
    }

    /// Builds a structure set with the given (name, flat (x,y,z) contour)
    /// regions and `scan_count` referenced images
    fn make_structure_set(regions: &[(&str, Vec<Vec<f64>>)], scan_count: usize) -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        put_str(
            &mut dcm,
            SOP_CLASS_UID,
            VR::UI,
            RT_STRUCTURE_SET_STORAGE,
        );
        put_identifiers(&mut dcm, "PAT001");

        let roi_items: Vec<InMemDicomObject> = regions
            .iter()
            .map(|(name, _)| {
                InMemDicomObject::from_element_iter([DataElement::new(
                    ROI_NAME,
                    VR::LO,
                    PrimitiveValue::from(*name),
                )])
            })
            .collect();
        dcm.put(DataElement::new(
            STRUCTURE_SET_ROI_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(roi_items),
        ));

        let contour_items: Vec<InMemDicomObject> = regions
            .iter()
            .map(|(_, contours)| {
                let items: Vec<InMemDicomObject> = contours
                    .iter()
                    .map(|points| {
                        let strings: Vec<String> =
                            points.iter().map(|p| p.to_string()).collect();
                        InMemDicomObject::from_element_iter([DataElement::new(
                            CONTOUR_DATA,
                            VR::DS,
                            PrimitiveValue::Strs(strings.into()),
                        )])
                    })
                    .collect();
                InMemDicomObject::from_element_iter([DataElement::new(
                    CONTOUR_SEQUENCE,
                    VR::SQ,
                    DataSetSequence::from(items),
                )])
            })
            .collect();
        dcm.put(DataElement::new(
            ROI_CONTOUR_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(contour_items),
        ));

        let image_items: Vec<InMemDicomObject> =
            (0..scan_count).map(|_| InMemDicomObject::new_empty()).collect();
        let series_item = InMemDicomObject::from_element_iter([DataElement::new(
            CONTOUR_IMAGE_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(image_items),
        )]);
        let study_item = InMemDicomObject::from_element_iter([DataElement::new(
            RT_REFERENCED_SERIES_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![series_item]),
        )]);
        let frame_item = InMemDicomObject::from_element_iter([DataElement::new(
            RT_REFERENCED_STUDY_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![study_item]),
        )]);
        dcm.put(DataElement::new(
            REFERENCED_FRAME_OF_REFERENCE_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![frame_item]),
        ));

        dcm
    }

    /// Rectangle contour of (x,y,z) triplets with area 4800 at z
    fn rect_4800(z: f64) -> Vec<f64> {
        vec![0.0, 0.0, z, 80.0, 0.0, z, 80.0, 60.0, z, 0.0, 60.0, z]
    }

    #[test]
    fn test_extract_ct_image() {
        let dcm = make_ct_dataset("PAT001");
        let upload = UploadExtractor::extract_dataset(&dcm).unwrap();

        let meta = match upload {
            ClassifiedUpload::CtImage(meta) => meta,
            other => panic!("expected CT image, got {:?}", other),
        };
        assert_eq!(meta.patient_id, "PAT001");
        assert_eq!(meta.instance_number, Some(42));
        assert_eq!(meta.pixel_spacing, Some(PixelSpacing::new(0.5, 0.5)));
    }

    #[test]
    fn test_extract_ct_missing_patient_fails() {
        let mut dcm = InMemDicomObject::new_empty();
        put_str(&mut dcm, SOP_CLASS_UID, VR::UI, CT_IMAGE_STORAGE);
        put_str(&mut dcm, STUDY_INSTANCE_UID, VR::UI, "1.2.3");
        put_str(&mut dcm, SERIES_INSTANCE_UID, VR::UI, "1.2.3.4");

        let err = UploadExtractor::extract_dataset(&dcm).unwrap_err();
        assert!(matches!(err, CardiovolError::TagNotFound(_)));
    }

    #[test]
    fn test_extract_structure_set() {
        let dcm = make_structure_set(
            &[
                ("LUNG_L", vec![rect_4800(1.0)]),
                ("HEART", vec![rect_4800(1.0), rect_4800(2.0)]),
            ],
            7,
        );
        let upload = UploadExtractor::extract_dataset(&dcm).unwrap();

        let meta = match upload {
            ClassifiedUpload::StructureSet(meta) => meta,
            other => panic!("expected structure set, got {:?}", other),
        };
        assert_eq!(meta.patient_id, "PAT001");
        assert_eq!(meta.total_scans, 7);
        assert_eq!(meta.regions.len(), 2);
        assert_eq!(meta.approved_image_count(), 3);
        assert_eq!(meta.region_volume("HEART"), Some(9600.0));
    }

    #[test]
    fn test_region_lookup_is_case_sensitive() {
        let dcm = make_structure_set(&[("Heart", vec![rect_4800(1.0)])], 1);
        let upload = UploadExtractor::extract_dataset(&dcm).unwrap();

        if let ClassifiedUpload::StructureSet(meta) = upload {
            assert!(meta.region("HEART").is_none());
            assert!(meta.region("Heart").is_some());
        } else {
            panic!("expected structure set");
        }
    }

    #[test]
    fn test_region_at_first_position_is_found() {
        let dcm = make_structure_set(&[("HEART", vec![rect_4800(1.0)])], 1);
        let upload = UploadExtractor::extract_dataset(&dcm).unwrap();

        if let ClassifiedUpload::StructureSet(meta) = upload {
            assert_eq!(meta.region_volume("HEART"), Some(4800.0));
        } else {
            panic!("expected structure set");
        }
    }

    #[test]
    fn test_absent_region_distinct_from_zero() {
        let dcm = make_structure_set(&[("HEART", vec![])], 1);
        let upload = UploadExtractor::extract_dataset(&dcm).unwrap();

        if let ClassifiedUpload::StructureSet(meta) = upload {
            // Located region with no contours is a legitimate zero
            assert_eq!(meta.region_volume("HEART"), Some(0.0));
            // Missing region is no result at all
            assert_eq!(meta.region_volume("LIVER"), None);
        } else {
            panic!("expected structure set");
        }
    }

    #[test]
    fn test_extract_other() {
        let dcm = InMemDicomObject::new_empty();
        let upload = UploadExtractor::extract_dataset(&dcm).unwrap();
        assert!(matches!(upload, ClassifiedUpload::Other(_)));
        assert_eq!(upload.patient_id(), None);
    }

    #[test]
    fn test_summaries() {
        let ct = UploadExtractor::extract_dataset(&make_ct_dataset("PAT001")).unwrap();
        assert_eq!(
            ct.summary("scan.dcm"),
            "scan.dcm is a CT image (instance 42)"
        );

        let rt = UploadExtractor::extract_dataset(&make_structure_set(
            &[("HEART", vec![rect_4800(1.0)])],
            1,
        ))
        .unwrap();
        assert_eq!(rt.summary("rtss.dcm"), "rtss.dcm is an RT structure set");

        let other = UploadExtractor::extract_dataset(&InMemDicomObject::new_empty()).unwrap();
        assert_eq!(
            other.summary("report.dcm"),
            "report.dcm is neither a CT image nor an RT structure set"
        );
    }
}
