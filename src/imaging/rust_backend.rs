//! Production image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_decoder` (header only, no pixel decode) |
//! | Decode (JPEG, PNG, WebP) | `image` crate decoders |
//! | RGB normalization | `DynamicImage::to_rgb8` (alpha dropped) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → WebP | `webp::Encoder::encode_advanced` (libwebp, method 6) |
//! | Preview | `DynamicImage::save` as PNG |

use super::backend::{BackendError, ColorMode, Dimensions, ImageBackend, ImageInfo};
use super::params::{ConvertParams, PreviewParams};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

/// Input extensions offered when expanding directories, with the format that
/// must be compiled in for them to decode.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
];

/// libwebp's slowest, best-compressing method.
const WEBP_METHOD_OPTIMIZE: i32 = 6;

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions accepted as conversion inputs.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` carries one of [`supported_input_extensions`] (any case).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Backend using the `image` crate ecosystem plus libwebp.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn color_mode(color: ColorType) -> ColorMode {
    match color {
        ColorType::Rgb8 => ColorMode::Rgb,
        ColorType::Rgba8 => ColorMode::Rgba,
        ColorType::L8 => ColorMode::Luma,
        ColorType::La8 => ColorMode::LumaAlpha,
        _ => ColorMode::Other,
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Normalize any layout to 8-bit RGB, the only layout the encoder is fed.
fn to_rgb(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Encode as lossy WebP and write to `path`.
fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encoder = webp::Encoder::from_image(img).map_err(|e| {
        BackendError::ProcessingFailed(format!("WebP encoder rejected image: {}", e))
    })?;
    let mut config = webp::WebPConfig::new().map_err(|_| {
        BackendError::ProcessingFailed("Failed to initialize WebP config".into())
    })?;
    config.quality = quality as f32;
    config.method = WEBP_METHOD_OPTIMIZE;
    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {:?}", e)))?;
    std::fs::write(path, &*encoded)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let decoder = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_decoder()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        let (width, height) = decoder.dimensions();
        Ok(ImageInfo {
            dimensions: Dimensions { width, height },
            color_mode: color_mode(decoder.color_type()),
        })
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = to_rgb(load_image(&params.source)?);
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_webp(&resized, &params.output, params.quality.value())
    }

    fn preview(&self, params: &PreviewParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let (w, h) = (img.width(), img.height());
        let img = if (w, h) == (params.width, params.height) {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::Lanczos3)
        };
        img.save_with_format(&params.output, ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{create_corrupt_image, create_test_jpeg, create_test_png_rgba};

    #[test]
    fn supported_extensions_match_picker_filter() {
        let exts = super::supported_input_extensions();
        assert_eq!(exts, &["jpg", "jpeg", "png"]);
    }

    #[test]
    fn supported_input_is_case_insensitive() {
        assert!(is_supported_input(Path::new("a/photo.JPG")));
        assert!(is_supported_input(Path::new("a/photo.Png")));
        assert!(!is_supported_input(Path::new("a/photo.gif")));
        assert!(!is_supported_input(Path::new("a/photo")));
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let info = RustBackend::new().identify(&path).unwrap();
        assert_eq!(info.dimensions, Dimensions { width: 200, height: 150 });
        assert_eq!(info.color_mode, ColorMode::Rgb);
    }

    #[test]
    fn identify_reports_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        create_test_png_rgba(&path, 40, 30);

        let info = RustBackend::new().identify(&path).unwrap();
        assert_eq!(info.color_mode, ColorMode::Rgba);
        assert!(info.color_mode.needs_rgb_conversion());
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn identify_garbage_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        create_corrupt_image(&path);

        let result = RustBackend::new().identify(&path);
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn convert_jpeg_to_webp() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("source.webp");
        RustBackend::new()
            .convert(&ConvertParams {
                source,
                output: output.clone(),
                width: 200,
                height: 150,
                quality: Quality::new(80),
            })
            .unwrap();

        let (w, h) = image::image_dimensions(&output).unwrap();
        assert_eq!((w, h), (200, 150));
    }

    #[test]
    fn convert_rgba_png_drops_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("logo.png");
        create_test_png_rgba(&source, 64, 64);

        let output = tmp.path().join("logo.webp");
        RustBackend::new()
            .convert(&ConvertParams {
                source,
                output: output.clone(),
                width: 32,
                height: 32,
                quality: Quality::new(90),
            })
            .unwrap();

        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn convert_can_upscale() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("small.jpg");
        create_test_jpeg(&source, 50, 40);

        let output = tmp.path().join("small.webp");
        RustBackend::new()
            .convert(&ConvertParams {
                source,
                output: output.clone(),
                width: 100,
                height: 80,
                quality: Quality::default(),
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (100, 80));
    }

    #[test]
    fn convert_garbage_source_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.png");
        std::fs::write(&source, b"nope").unwrap();

        let result = RustBackend::new().convert(&ConvertParams {
            source,
            output: tmp.path().join("broken.webp"),
            width: 10,
            height: 10,
            quality: Quality::default(),
        });
        assert!(result.is_err());
        assert!(!tmp.path().join("broken.webp").exists());
    }

    #[test]
    fn preview_writes_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 1600, 1200);

        let output = tmp.path().join("preview.png");
        RustBackend::new()
            .preview(&PreviewParams {
                source,
                output: output.clone(),
                width: 800,
                height: 600,
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (800, 600));
    }
}
