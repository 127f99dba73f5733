use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::types::{ImageSpacingRecord, StructureSetRecord};
use crate::volume::calibrated_volume;

/// Process-wide accumulator for spacing and structure-set records
///
/// Both collections live behind one mutex so that appends and the
/// join-and-calibrate pass are each a single atomic operation. The store
/// is the unit-of-mutation boundary for concurrent callers; wrap it in
/// an `Arc` to share it across threads.
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: Mutex<Collections>,
}

#[derive(Debug, Default)]
struct Collections {
    spacings: Vec<ImageSpacingRecord>,
    structure_sets: Vec<StructureSetRecord>,
}

impl RecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pixel-spacing record from a CT image upload
    ///
    /// An insert identical to an already-held record is dropped, since a
    /// repeat of the same tuple cannot change any join outcome. Records
    /// that differ in any field are kept in arrival order; the join
    /// adopts the most recent match.
    pub fn insert_spacing(&self, record: ImageSpacingRecord) {
        let mut inner = self.lock();
        if inner.spacings.contains(&record) {
            debug!(
                "Ignoring duplicate spacing record for patient {}",
                record.patient_id
            );
            return;
        }
        inner.spacings.push(record);
    }

    /// Appends a structure-set record from an RT structure set upload
    ///
    /// A record whose study UID is already held is silently dropped, so
    /// re-uploading the same structure set neither errors nor duplicates
    /// its listing row. Returns whether the record was inserted.
    pub fn insert_structure_set(&self, record: StructureSetRecord) -> bool {
        let mut inner = self.lock();
        if inner
            .structure_sets
            .iter()
            .any(|existing| existing.study_uid == record.study_uid)
        {
            debug!(
                "Ignoring duplicate structure set for study {}",
                record.study_uid
            );
            return false;
        }
        inner.structure_sets.push(record);
        true
    }

    /// Runs the calibration join and returns the resulting listing rows
    ///
    /// For every structure-set record, the most recently inserted spacing
    /// record sharing its patient identifier is adopted (last write wins
    /// among matches). A record with an adopted spacing and a nonzero raw
    /// volume gets its calibrated volume derived from the raw value;
    /// without a match it keeps no spacing and displays raw.
    ///
    /// The whole read-modify-write pass runs under one lock acquisition,
    /// and the calibrated field is always recomputed from the immutable
    /// raw field, so repeated calls without new uploads return identical
    /// rows.
    pub fn calibrated_rows(&self) -> Vec<StructureSetRecord> {
        let mut inner = self.lock();
        let Collections {
            spacings,
            structure_sets,
        } = &mut *inner;

        for record in structure_sets.iter_mut() {
            let spacing = spacings
                .iter()
                .rev()
                .find(|s| s.patient_id == record.patient_id)
                .map(|s| s.pixel_spacing);

            record.pixel_spacing = spacing;
            record.volume_cc = match (record.raw_volume, spacing) {
                (Some(raw), Some(spacing)) if raw != 0.0 => {
                    Some(calibrated_volume(raw, spacing))
                }
                _ => None,
            };
        }

        structure_sets.clone()
    }

    /// Number of spacing records held
    pub fn spacing_count(&self) -> usize {
        self.lock().spacings.len()
    }

    /// Number of structure-set records held
    pub fn structure_set_count(&self) -> usize {
        self.lock().structure_sets.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Collections> {
        // A panic while holding the lock leaves the data intact; recover
        // rather than poisoning every later request
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
