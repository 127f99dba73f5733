pub mod modality;
pub mod spacing;
pub mod structure_set;
pub mod tags;

pub use modality::{classify_file, classify_modality};
pub use spacing::extract_pixel_spacing;
pub use structure_set::{count_referenced_scans, extract_regions};
pub use tags::*;
