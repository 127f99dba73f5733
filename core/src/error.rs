use thiserror::Error;

/// Result type for cardiovol operations
pub type Result<T> = std::result::Result<T, CardiovolError>;

/// Error types for cardiovol operations
#[derive(Error, Debug)]
pub enum CardiovolError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Tag not found in DICOM file
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// Structure set is missing a required nested sequence
    #[error("Malformed structure set: {0}")]
    MalformedStructureSet(String),

    /// Requested file does not exist in storage
    #[error("File not found: {0}")]
    NotFound(String),

    /// Generic extraction error
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for CardiovolError {
    fn from(s: String) -> Self {
        CardiovolError::ExtractionError(s)
    }
}

impl From<&str> for CardiovolError {
    fn from(s: &str) -> Self {
        CardiovolError::ExtractionError(s.to_string())
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for CardiovolError {
    fn from(e: dicom_object::ReadError) -> Self {
        CardiovolError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for CardiovolError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        CardiovolError::InvalidValue(format!("{}", e))
    }
}
