//! # Webify
//!
//! Batch-convert JPEG and PNG images to lossy WebP, with a size estimate up
//! front and a downscaled preview on demand.
//!
//! # Architecture: Session → Runner → Pipeline
//!
//! ```text
//! inputs   paths/dirs  →  Session          (ordered files, selection, settings)
//! runner   Session     →  BatchJob         (immutable snapshot, one worker thread)
//! convert  BatchJob    →  <out>/<stem>.webp + BatchSummary
//! ```
//!
//! The shell owns the [`session::Session`]. Starting a batch snapshots it into
//! a [`convert::BatchJob`] and hands that to the [`worker::BatchRunner`], which
//! converts the files one at a time on a background thread and reports back
//! only through [`convert::ConvertEvent`] messages.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Backend trait, `image` + libwebp backend, resize calculators, preview |
//! | [`estimate`] | Output size estimate from file size, dimensions and quality |
//! | [`convert`] | Sequential batch pipeline with per-file failure recovery |
//! | [`worker`] | Idle/Running runner that executes one batch at a time |
//! | [`session`] | File list, selection, output folder, live settings |
//! | [`inputs`] | Expands command-line files and directories into a file list |
//! | [`config`] | `webify.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Two Sizing Rules
//!
//! Conversion always pins the longer side to the configured maximum, so small
//! images are enlarged. The estimator caps the longer side at the original
//! size instead, so it never predicts growth from upscaling. Both live in
//! [`imaging::calculations`] and are tested against each other.
//!
//! ## Flat Output
//!
//! Every output is `<output_dir>/<stem>.webp`. Sources sharing a stem
//! overwrite each other in selection order; each is still reported as
//! converted.

pub mod config;
pub mod convert;
pub mod estimate;
pub mod imaging;
pub mod inputs;
pub mod output;
pub mod session;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
