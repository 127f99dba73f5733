use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{CardiovolError, Result};

/// Pixel spacing in millimeters (row, column)
///
/// Physical distance between adjacent pixel centers along the two image
/// axes. Carried on CT image instances and joined onto structure-set
/// records to calibrate pixel-unit volumes into physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

impl PixelSpacing {
    /// Creates a new PixelSpacing
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Parses pixel spacing from string
    ///
    /// Accepts formats like:
    /// - "0.5\\0.5"
    /// - "0.5 0.5"
    /// - "[0.976562, 0.976562]"
    /// - Exponential notation: "5e-1 5e-1"
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two numeric components are found
    pub fn parse(s: &str) -> Result<Self> {
        static REGEX: OnceLock<Regex> = OnceLock::new();
        let re = REGEX.get_or_init(|| {
            Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
        });

        let mut numbers = re.find_iter(s).map(|m| m.as_str());
        let row_str = numbers.next().ok_or_else(|| {
            CardiovolError::InvalidValue(format!("Failed to parse PixelSpacing from '{}'", s))
        })?;
        let col_str = numbers.next().ok_or_else(|| {
            CardiovolError::InvalidValue(format!("Failed to parse PixelSpacing from '{}'", s))
        })?;

        let row: f64 = row_str
            .parse()
            .map_err(|e| CardiovolError::InvalidValue(format!("Failed to parse row value: {}", e)))?;

        let col: f64 = col_str
            .parse()
            .map_err(|e| CardiovolError::InvalidValue(format!("Failed to parse col value: {}", e)))?;

        Ok(PixelSpacing { row, col })
    }
}

impl fmt::Display for PixelSpacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} mm", self.row, self.col)
    }
}
