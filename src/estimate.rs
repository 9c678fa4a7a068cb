//! Output size estimation.
//!
//! Gives the user an approximate WebP size before committing to a batch. The
//! estimate is a calibrated heuristic, not a model of the encoder:
//!
//! ```text
//! estimate = floor(current_size × pixel_ratio × webp_factor(quality))
//! ```
//!
//! `pixel_ratio` comes from the *capped* sizing rule
//! ([`fit_longer_side_capped`]), so an estimate never assumes enlargement even
//! though the conversion itself may upscale.
//!
//! ## Quality factors
//!
//! [`EstimateMode::Stepped`] (the default) maps quality to a factor in
//! discrete buckets. [`EstimateMode::Interpolated`] is an alternate,
//! opt-in mapping that interpolates linearly between calibration points; it is
//! less stable (see [`interpolated_webp_factor`]) and exists for comparison.

use crate::imaging::calculations::{fit_longer_side_capped, pixel_ratio};
use crate::imaging::{BackendError, ImageBackend, MaxDimension, Quality};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read dimensions: {0}")]
    Imaging(#[from] BackendError),
}

/// Which quality → factor mapping to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMode {
    #[default]
    Stepped,
    Interpolated,
}

/// Current and estimated size of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EstimateResult {
    /// Exact size on disk.
    pub current_size: u64,
    /// Approximate size after conversion.
    pub estimated_size: u64,
}

/// Quality bucket factor. Bucket lower bounds are inclusive.
pub fn webp_factor(quality: u32) -> f64 {
    match quality {
        95.. => 0.45,
        85..=94 => 0.13,
        60..=84 => 0.065,
        40..=59 => 0.053,
        _ => 0.04,
    }
}

/// Piecewise-linear factor between calibration points.
///
/// The 80–94 segment is anchored at 90, so it goes negative below ~86; callers
/// clamp the result at zero.
pub fn interpolated_webp_factor(quality: u32) -> f64 {
    let q = quality as f64;
    if quality >= 95 {
        0.429
    } else if quality >= 80 {
        0.124 + (q - 90.0) * (0.429 - 0.124) / 10.0
    } else if quality >= 60 {
        0.062 + (q - 70.0) * (0.124 - 0.062) / 20.0
    } else if quality >= 50 {
        0.050 + (q - 50.0) * (0.062 - 0.050) / 20.0
    } else {
        0.050
    }
}

impl EstimateMode {
    pub fn factor(self, quality: u32) -> f64 {
        match self {
            EstimateMode::Stepped => webp_factor(quality),
            EstimateMode::Interpolated => interpolated_webp_factor(quality).max(0.0),
        }
    }
}

/// Estimate the WebP size of an image in bytes.
///
/// Pure: the same inputs always give the same estimate.
pub fn estimate_size(
    current_size: u64,
    original: (u32, u32),
    max_dimension: u32,
    quality: u32,
    mode: EstimateMode,
) -> u64 {
    let resized = fit_longer_side_capped(original, max_dimension);
    let ratio = pixel_ratio(original, resized);
    let estimated = current_size as f64 * ratio * mode.factor(quality);
    // NaN (degenerate 0×0 input) saturates to 0
    estimated.floor() as u64
}

/// Estimate a file on disk: size from the file system, dimensions from the backend.
pub fn estimate_file(
    backend: &impl ImageBackend,
    path: &Path,
    max_dimension: MaxDimension,
    quality: Quality,
    mode: EstimateMode,
) -> Result<EstimateResult, EstimateError> {
    let current_size = std::fs::metadata(path)?.len();
    let info = backend.identify(path)?;
    let estimated_size = estimate_size(
        current_size,
        info.dimensions.as_tuple(),
        max_dimension.value(),
        quality.value(),
        mode,
    );
    Ok(EstimateResult {
        current_size,
        estimated_size,
    })
}
