use crate::api::ClassifiedUpload;
use crate::types::StructureSetRecord;
use std::fmt;

/// Text report formatter for one classified DICOM file
pub struct VolumeReport<'a> {
    upload: &'a ClassifiedUpload,
    region: &'a str,
}

impl<'a> VolumeReport<'a> {
    /// Creates a report for the given upload and target region
    pub fn new(upload: &'a ClassifiedUpload, region: &'a str) -> Self {
        Self { upload, region }
    }
}

impl<'a> fmt::Display for VolumeReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upload {
            ClassifiedUpload::StructureSet(meta) => {
                writeln!(f, "Structure Set")?;
                writeln!(f, "=============")?;
                writeln!(f)?;
                writeln!(f, "Patient:        {}", meta.patient_id)?;
                writeln!(f, "Study:          {}", meta.study_uid)?;
                writeln!(f, "Series:         {}", meta.series_uid)?;
                writeln!(f, "Regions:        {}", meta.regions.len())?;
                writeln!(f, "Approved Images: {}", meta.approved_image_count())?;
                writeln!(f, "Total Scans:    {}", meta.total_scans)?;
                writeln!(f)?;
                writeln!(f, "Target Region:  {}", self.region)?;
                match meta.region_volume(self.region) {
                    Some(volume) => {
                        writeln!(f, "Raw Volume:     {} px", volume)?;
                    }
                    None => {
                        writeln!(f, "Raw Volume:     region not found")?;
                    }
                }
            }
            ClassifiedUpload::CtImage(meta) => {
                writeln!(f, "CT Image")?;
                writeln!(f, "========")?;
                writeln!(f)?;
                writeln!(f, "Patient:        {}", meta.patient_id)?;
                writeln!(f, "Study:          {}", meta.study_uid)?;
                writeln!(f, "Series:         {}", meta.series_uid)?;
                match meta.instance_number {
                    Some(instance) => writeln!(f, "Instance:       {}", instance)?,
                    None => writeln!(f, "Instance:       unknown")?,
                }
                match meta.pixel_spacing {
                    Some(spacing) => writeln!(f, "Pixel Spacing:  {}", spacing)?,
                    None => writeln!(f, "Pixel Spacing:  absent")?,
                }
            }
            ClassifiedUpload::Other(other) => {
                writeln!(f, "Unrecognized Modality")?;
                writeln!(f, "=====================")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "Patient:        {}",
                    other.patient_id.as_deref().unwrap_or("unknown")
                )?;
            }
        }
        Ok(())
    }
}

/// Text table formatter for calibrated listing rows
pub struct ListingTable<'a> {
    rows: &'a [StructureSetRecord],
}

impl<'a> ListingTable<'a> {
    /// Creates a table over the given listing rows
    pub fn new(rows: &'a [StructureSetRecord]) -> Self {
        Self { rows }
    }
}

impl<'a> fmt::Display for ListingTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Structure Set Listing")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;

        if self.rows.is_empty() {
            writeln!(f, "No structure sets ingested")?;
            return Ok(());
        }

        for row in self.rows {
            writeln!(f, "{}", row.filename)?;
            writeln!(f, "  Patient:         {}", row.patient_id)?;
            writeln!(f, "  Study:           {}", row.study_uid)?;
            writeln!(f, "  Series:          {}", row.series_uid)?;
            match (row.display_volume(), row.is_calibrated()) {
                (Some(volume), true) => writeln!(f, "  Volume:          {} cc", volume)?,
                (Some(volume), false) => {
                    writeln!(f, "  Volume:          {} px (uncalibrated)", volume)?
                }
                (None, _) => writeln!(f, "  Volume:          region not found")?,
            }
            writeln!(f, "  Approved Images: {}", row.approved_images)?;
            writeln!(f, "  Total Scans:     {}", row.total_scans)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
