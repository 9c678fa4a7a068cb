//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take settings, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, ImageInfo};
use super::calculations::{fit_longer_side, preview_dimensions};
use super::params::{ConvertParams, MaxDimension, PreviewParams, Quality};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Longest side a preview is rendered at unless configured otherwise.
pub const DEFAULT_PREVIEW_MAX: u32 = 800;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let info = backend.identify(path)?;
    Ok(info.dimensions.as_tuple())
}

/// Output location for a converted file: `<output_dir>/<stem>.webp`.
///
/// The layout is flat; two sources sharing a stem map to the same output.
pub fn webp_output_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}.webp", stem))
}

/// Plan a conversion without executing it.
///
/// Uses the uncapped sizing rule, so images smaller than `max_dimension`
/// are enlarged.
pub fn plan_conversion(
    source: &Path,
    info: &ImageInfo,
    output_dir: &Path,
    max_dimension: MaxDimension,
    quality: Quality,
) -> ConvertParams {
    let (width, height) = fit_longer_side(info.dimensions.as_tuple(), max_dimension.value());
    ConvertParams {
        source: source.to_path_buf(),
        output: webp_output_path(source, output_dir),
        width,
        height,
        quality,
    }
}

/// Convert one image to WebP inside `output_dir`.
///
/// Returns the written path.
pub fn convert_image(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    max_dimension: MaxDimension,
    quality: Quality,
) -> Result<PathBuf> {
    let info = backend.identify(source)?;
    if info.color_mode.needs_rgb_conversion() {
        log::debug!(
            "{}: {:?} input will be normalized to RGB",
            source.display(),
            info.color_mode
        );
    }
    let params = plan_conversion(source, &info, output_dir, max_dimension, quality);
    backend.convert(&params)?;
    Ok(params.output)
}

/// Render a downscaled PNG preview of `source` to `output`.
///
/// Images whose longer side is within `max_preview` keep their size.
/// Returns the preview dimensions.
pub fn create_preview(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    max_preview: u32,
) -> Result<(u32, u32)> {
    let original = get_dimensions(backend, source)?;
    let (width, height) = preview_dimensions(original, max_preview);
    backend.preview(&PreviewParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
    })?;
    Ok((width, height))
}
