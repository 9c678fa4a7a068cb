//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Three sizing rules coexist, each with its own clamping:
//!
//! | Function | Used by | Upscales? |
//! |---|---|---|
//! | [`fit_longer_side`] | batch conversion | yes |
//! | [`fit_longer_side_capped`] | size estimation | no |
//! | [`preview_dimensions`] | preview rendering | no |

/// Scale `original` so its longer side equals `max_dimension`.
///
/// The shorter side is scaled proportionally and truncated. A landscape image
/// (`w > h`) pins the width; square and portrait images pin the height.
/// Images smaller than `max_dimension` are enlarged.
///
/// # Examples
/// ```
/// # use webify::imaging::calculations::fit_longer_side;
/// assert_eq!(fit_longer_side((4000, 3000), 1920), (1920, 1440));
/// assert_eq!(fit_longer_side((800, 600), 1600), (1600, 1200));
/// ```
pub fn fit_longer_side(original: (u32, u32), max_dimension: u32) -> (u32, u32) {
    let (w, h) = original;
    if w > h {
        (max_dimension, scale_floor(h, max_dimension, w))
    } else {
        (scale_floor(w, max_dimension, h), max_dimension)
    }
}

/// Like [`fit_longer_side`], but the longer side never grows past the original.
///
/// `new_longer = min(max_dimension, original_longer)`, so the result never
/// exceeds the original on either axis.
pub fn fit_longer_side_capped(original: (u32, u32), max_dimension: u32) -> (u32, u32) {
    let (w, h) = original;
    if w > h {
        let new_w = max_dimension.min(w);
        (new_w, scale_floor(h, new_w, w))
    } else {
        let new_h = max_dimension.min(h);
        (scale_floor(w, new_h, h), new_h)
    }
}

/// Dimensions for a preview render.
///
/// Returns `original` untouched unless its longer side exceeds `max_preview`,
/// in which case the longer side is brought down to `max_preview`.
pub fn preview_dimensions(original: (u32, u32), max_preview: u32) -> (u32, u32) {
    let (w, h) = original;
    if w.max(h) > max_preview {
        fit_longer_side(original, max_preview)
    } else {
        original
    }
}

/// Ratio of resized pixel count to original pixel count.
pub fn pixel_ratio(original: (u32, u32), resized: (u32, u32)) -> f64 {
    let original_pixels = original.0 as f64 * original.1 as f64;
    let new_pixels = resized.0 as f64 * resized.1 as f64;
    new_pixels / original_pixels
}

/// Round a longest side up to the next `step` and clamp it into `min..=max`.
///
/// Used to suggest a max-dimension setting that fits the largest selected
/// image without enlarging it.
pub fn round_up_to_step(longest_side: u32, step: u32, min: u32, max: u32) -> u32 {
    let rounded = longest_side.div_ceil(step).saturating_mul(step);
    rounded.clamp(min, max)
}

/// `floor(value * numerator / denominator)` without intermediate overflow.
fn scale_floor(value: u32, numerator: u32, denominator: u32) -> u32 {
    (value as u64 * numerator as u64 / denominator as u64) as u32
}
