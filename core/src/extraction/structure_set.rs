use dicom_object::InMemDicomObject;

use crate::error::{CardiovolError, Result};
use crate::types::Region;

use super::tags::{
    get_float_values, get_string_value, CONTOUR_DATA, CONTOUR_IMAGE_SEQUENCE, CONTOUR_SEQUENCE,
    REFERENCED_FRAME_OF_REFERENCE_SEQUENCE, ROI_CONTOUR_SEQUENCE, ROI_NAME,
    RT_REFERENCED_SERIES_SEQUENCE, RT_REFERENCED_STUDY_SEQUENCE, STRUCTURE_SET_ROI_SEQUENCE,
};

/// Extracts the named regions of a structure set as composite records
///
/// # Algorithm
///
/// 1. Read the ROI names from StructureSetROISequence in file order
/// 2. Read the per-ROI contour stacks from ROIContourSequence in file order
/// 3. Pair the two sequences positionally into [`Region`] records
///
/// The two sequences are required by the data contract to run in the same
/// order; that correspondence is not validated here. A ROI item without a
/// name keeps its slot with an empty name so pairing stays aligned.
pub fn extract_regions(dcm: &InMemDicomObject) -> Vec<Region> {
    let names = roi_names(dcm);
    let stacks = contour_stacks(dcm);

    names
        .into_iter()
        .zip(stacks)
        .map(|(name, contours)| Region::new(name, contours))
        .collect()
}

/// Counts the contour-image references on the acquisition series
///
/// Traverses the fixed nested path
/// ReferencedFrameOfReferenceSequence[0] → RTReferencedStudySequence[0] →
/// RTReferencedSeriesSequence[0] → ContourImageSequence and returns the
/// number of image items found there.
///
/// # Errors
///
/// Any absent link on that path is malformed input, not an expected
/// missing-optional case, and returns
/// [`CardiovolError::MalformedStructureSet`]. A present but empty
/// ContourImageSequence is valid and counts as zero.
pub fn count_referenced_scans(dcm: &InMemDicomObject) -> Result<usize> {
    let frame = dcm
        .element(REFERENCED_FRAME_OF_REFERENCE_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .and_then(|items| items.first())
        .ok_or_else(|| missing_sequence("ReferencedFrameOfReferenceSequence"))?;

    let study = frame
        .element(RT_REFERENCED_STUDY_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .and_then(|items| items.first())
        .ok_or_else(|| missing_sequence("RTReferencedStudySequence"))?;

    let series = study
        .element(RT_REFERENCED_SERIES_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .and_then(|items| items.first())
        .ok_or_else(|| missing_sequence("RTReferencedSeriesSequence"))?;

    let images = series
        .element(CONTOUR_IMAGE_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .ok_or_else(|| missing_sequence("ContourImageSequence"))?;

    Ok(images.len())
}

fn missing_sequence(name: &str) -> CardiovolError {
    CardiovolError::MalformedStructureSet(format!("{} is missing or empty", name))
}

/// ROI names from StructureSetROISequence, in file order
fn roi_names(dcm: &InMemDicomObject) -> Vec<String> {
    dcm.element(STRUCTURE_SET_ROI_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .map(|items| {
            items
                .iter()
                .map(|item| get_string_value(item, ROI_NAME).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

/// Per-ROI contour stacks from ROIContourSequence, in file order
///
/// Each stack holds one flattened (x,y) point list per contour item; a
/// ROI item without contours keeps its slot with an empty stack.
fn contour_stacks(dcm: &InMemDicomObject) -> Vec<Vec<Vec<f64>>> {
    dcm.element(ROI_CONTOUR_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .map(|items| items.iter().map(roi_contours).collect())
        .unwrap_or_default()
}

fn roi_contours(item: &InMemDicomObject) -> Vec<Vec<f64>> {
    item.element(CONTOUR_SEQUENCE)
        .ok()
        .and_then(|seq| seq.items())
        .map(|contours| {
            contours
                .iter()
                .map(|contour| {
                    get_float_values(contour, CONTOUR_DATA)
                        .map(|raw| planar_points(&raw))
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Strips the depth coordinate from raw (x,y,z) contour data
///
/// Keeps the first two values of every coordinate triplet. A trailing
/// partial triplet contributes whatever planar values it has; the area
/// computation tolerates the resulting odd-length list.
fn planar_points(raw: &[f64]) -> Vec<f64> {
    raw.chunks(3)
        .flat_map(|triplet| triplet.iter().take(2).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tags::{REFERENCED_SOP_INSTANCE_UID, ROI_NUMBER};
    use dicom_core::value::DataSetSequence;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    /// Builds a ROI name item for StructureSetROISequence
    fn make_roi_item(number: i32, name: &str) -> InMemDicomObject {
        InMemDicomObject::from_element_iter([
            DataElement::new(
                ROI_NUMBER,
                VR::IS,
                PrimitiveValue::from(number.to_string()),
            ),
            DataElement::new(ROI_NAME, VR::LO, PrimitiveValue::from(name)),
        ])
    }

    /// Builds a contour-stack item for ROIContourSequence
    fn make_contour_item(contours: &[Vec<f64>]) -> InMemDicomObject {
        let contour_items: Vec<InMemDicomObject> = contours
            .iter()
            .map(|points| {
                let strings: Vec<String> = points.iter().map(|p| p.to_string()).collect();
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
            DataSetSequence::from(contour_items),
        )])
    }

    /// Adds the nested referenced-frame path with `scan_count` image items
    fn put_referenced_frame(dcm: &mut InMemDicomObject, scan_count: usize) {
        let image_items: Vec<InMemDicomObject> = (0..scan_count)
            .map(|i| {
                InMemDicomObject::from_element_iter([DataElement::new(
                    REFERENCED_SOP_INSTANCE_UID,
                    VR::UI,
                    PrimitiveValue::from(format!("1.2.3.4.{}", i)),
                )])
            })
            .collect();

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
    }

    /// Builds a full synthetic structure set
    fn make_structure_set(
        regions: &[(&str, Vec<Vec<f64>>)],
        scan_count: usize,
    ) -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();

        let roi_items: Vec<InMemDicomObject> = regions
            .iter()
            .enumerate()
            .map(|(i, (name, _))| make_roi_item(i as i32 + 1, name))
            .collect();
        dcm.put(DataElement::new(
            STRUCTURE_SET_ROI_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(roi_items),
        ));

        let contour_items: Vec<InMemDicomObject> = regions
            .iter()
            .map(|(_, contours)| make_contour_item(contours))
            .collect();
        dcm.put(DataElement::new(
            ROI_CONTOUR_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(contour_items),
        ));

        put_referenced_frame(&mut dcm, scan_count);
        dcm
    }

    #[test]
    fn test_extract_regions_pairs_names_with_contours() {
        let dcm = make_structure_set(
            &[
                ("LUNG_L", vec![vec![0.0, 0.0, 1.0, 1.0, 0.0, 1.0]]),
                ("HEART", vec![vec![0.0, 0.0, 2.0, 0.0, 2.0, 2.0]]),
            ],
            3,
        );

        let regions = extract_regions(&dcm);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "LUNG_L");
        assert_eq!(regions[1].name, "HEART");
        assert_eq!(regions[1].contours.len(), 1);
    }

    #[test]
    fn test_extract_regions_strips_depth_coordinate() {
        // One contour of (x,y,z) triplets: z values 10.0 must vanish
        let dcm = make_structure_set(
            &[(
                "HEART",
                vec![vec![0.0, 0.0, 10.0, 4.0, 0.0, 10.0, 4.0, 3.0, 10.0]],
            )],
            1,
        );

        let regions = extract_regions(&dcm);
        assert_eq!(regions[0].contours[0], vec![0.0, 0.0, 4.0, 0.0, 4.0, 3.0]);
    }

    #[test]
    fn test_extract_regions_empty_dataset() {
        let dcm = InMemDicomObject::new_empty();
        assert!(extract_regions(&dcm).is_empty());
    }

    #[test]
    fn test_extract_regions_keeps_multiple_slices() {
        let slice = vec![0.0, 0.0, 5.0, 1.0, 0.0, 5.0, 1.0, 1.0, 5.0];
        let dcm = make_structure_set(
            &[("HEART", vec![slice.clone(), slice.clone(), slice])],
            3,
        );

        let regions = extract_regions(&dcm);
        assert_eq!(regions[0].contour_count(), 3);
    }

    #[test]
    fn test_count_referenced_scans() {
        let dcm = make_structure_set(&[("HEART", vec![])], 5);
        assert_eq!(count_referenced_scans(&dcm).unwrap(), 5);
    }

    #[test]
    fn test_count_referenced_scans_empty_image_sequence() {
        // Present but empty is a legitimate zero, not an error
        let dcm = make_structure_set(&[("HEART", vec![])], 0);
        assert_eq!(count_referenced_scans(&dcm).unwrap(), 0);
    }

    #[test]
    fn test_count_referenced_scans_missing_path_fails() {
        let dcm = InMemDicomObject::new_empty();
        let err = count_referenced_scans(&dcm).unwrap_err();
        assert!(matches!(err, CardiovolError::MalformedStructureSet(_)));
    }

    #[test]
    fn test_count_referenced_scans_missing_inner_link_fails() {
        // Frame item exists but has no study sequence beneath it
        let mut dcm = InMemDicomObject::new_empty();
        let frame_item = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            REFERENCED_FRAME_OF_REFERENCE_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![frame_item]),
        ));

        let err = count_referenced_scans(&dcm).unwrap_err();
        assert!(matches!(err, CardiovolError::MalformedStructureSet(_)));
        assert!(err.to_string().contains("RTReferencedStudySequence"));
    }

    #[test]
    fn test_planar_points_partial_triplet() {
        // Trailing (x,y) without z still contributes its planar values
        assert_eq!(
            planar_points(&[1.0, 2.0, 9.0, 3.0, 4.0]),
            vec![1.0, 2.0, 3.0, 4.0]
        );
        // Trailing lone x leaves an odd-length list for the caller to truncate
        assert_eq!(planar_points(&[1.0, 2.0, 9.0, 3.0]), vec![1.0, 2.0, 3.0]);
    }
}
