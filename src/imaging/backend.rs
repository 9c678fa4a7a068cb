//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, convert, and preview.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate for decoding/resizing and libwebp (via the `webp` crate) for lossy
//! encoding.

use super::params::{ConvertParams, PreviewParams};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `max(width, height)`.
    pub fn longer_side(self) -> u32 {
        self.width.max(self.height)
    }
}

/// Color representation reported by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// 8-bit RGB, the only layout the WebP encoder is fed.
    Rgb,
    Rgba,
    Luma,
    LumaAlpha,
    /// Anything else (16-bit, float, palette-backed layouts).
    Other,
}

impl ColorMode {
    /// Whether the image must be normalized to RGB before encoding.
    ///
    /// Alpha channels are dropped by the normalization.
    pub fn needs_rgb_conversion(self) -> bool {
        self != ColorMode::Rgb
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub color_mode: ColorMode,
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the rest of the
/// codebase is backend-agnostic. `Send + Sync` lets a backend be handed to
/// the batch worker thread behind an `Arc`.
pub trait ImageBackend: Send + Sync {
    /// Read dimensions and color mode without a full decode.
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Decode, normalize to RGB, resize to the exact target and encode WebP.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;

    /// Decode, resize to the exact target and write a PNG preview.
    fn preview(&self, params: &PreviewParams) -> Result<(), BackendError>;
}
