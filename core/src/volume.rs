//! Signed polygon volume computation and calibration
//!
//! The volume of a region is the sum of signed shoelace areas over its
//! contour stack, one contour per image slice, in uncalibrated pixel
//! units. Calibration rescales that sum into cubic centimeters using the
//! pixel spacing of a correlated CT series.

use crate::types::PixelSpacing;

/// Conversion factor from cubic-millimeter-equivalent pixel volume to
/// cubic centimeters
pub const CUBIC_MM_TO_CC: f64 = 0.001;

/// Computes the signed shoelace area of one flattened contour
///
/// # Algorithm
///
/// Walks the flattened `(x0, y0, x1, y1, ...)` coordinates two at a
/// time, accumulating `(x[i]*y[i+1] - x[i+1]*y[i]) / 2` for consecutive
/// point pairs. The walk never wraps back to the first point, and the
/// sign of the result follows the winding direction; no absolute value
/// is taken.
///
/// A trailing unpaired coordinate is dropped (`chunks_exact` keeps only
/// complete pairs), and fewer than two complete pairs contribute zero.
pub fn contour_area(points: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = points
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect();

    pairs
        .windows(2)
        .map(|w| (w[0].0 * w[1].1 - w[1].0 * w[0].1) / 2.0)
        .sum()
}

/// Aggregates signed contour areas across an entire contour stack
///
/// Returns zero for an empty stack; the caller distinguishes "region
/// absent" from a legitimate zero by never calling this without a
/// located region.
pub fn contour_stack_area(contours: &[Vec<f64>]) -> f64 {
    contours.iter().map(|points| contour_area(points)).sum()
}

/// Calibrates a raw pixel-unit volume into cubic centimeters
///
/// Multiplies by both spacing components and the unit-scale constant,
/// rounding to two decimal places for display stability.
pub fn calibrated_volume(raw: f64, spacing: PixelSpacing) -> f64 {
    round2(raw * spacing.row * spacing.col * CUBIC_MM_TO_CC)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
