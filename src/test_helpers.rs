//! Shared test utilities for the webify test suite.
//!
//! Writes small synthetic images to disk so backend and pipeline tests run
//! against real files without checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("photo.jpg");
//! create_test_jpeg(&path, 400, 300);
//! ```

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Fixture images
// =========================================================================

/// Write an RGB gradient JPEG. The format does not depend on the extension.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Write an RGBA PNG with a half-transparent checkerboard.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if (x / 8 + y / 8) % 2 == 0 { 255 } else { 128 };
        Rgba([200, (x % 256) as u8, (y % 256) as u8, alpha])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Write a file that carries an image extension but no image data.
pub fn create_corrupt_image(path: &Path) {
    std::fs::write(path, b"this is not an image").unwrap();
}
