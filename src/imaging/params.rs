//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) module (which plans conversions) and
//! the [`backend`](super::backend) (which touches pixels), so a mock backend
//! can stand in for the real one in tests.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy WebP quality (1–100, default 80). Clamped on construction.
//! - [`MaxDimension`]: Target longer side (100–4000, default 1920; suggestions step by 100).
//! - [`ConvertParams`]: Source, output path, target dimensions and quality for one WebP conversion.
//! - [`PreviewParams`]: Source, output path and dimensions for a preview render.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Longer-side target for conversions, in pixels.
///
/// Clamped to `MIN..=MAX`. Values are not snapped to [`MaxDimension::STEP`]:
/// the default (1920) is itself off-step. Suggested values are always on-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxDimension(pub u32);

impl MaxDimension {
    pub const MIN: u32 = 100;
    pub const MAX: u32 = 4000;
    pub const STEP: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for MaxDimension {
    fn default() -> Self {
        Self(1920)
    }
}

/// Parameters for a single image → WebP conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Parameters for rendering a preview image.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}
