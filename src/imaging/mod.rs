//! Image processing: identify, resize, WebP encode, preview.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image` decoder headers (dimensions + color type) |
//! | **Convert → WebP** | RGB normalization + Lanczos3 + libwebp |
//! | **Preview** | Lanczos3 + PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ColorMode, Dimensions, ImageBackend, ImageInfo};
pub use operations::{
    DEFAULT_PREVIEW_MAX, convert_image, create_preview, get_dimensions, webp_output_path,
};
pub use params::{ConvertParams, MaxDimension, PreviewParams, Quality};
pub use rust_backend::{RustBackend, is_supported_input, supported_input_extensions};
