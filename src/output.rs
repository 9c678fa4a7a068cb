//! CLI output formatting for every command.
//!
//! # File-First Display
//!
//! Each source image is shown by its positional index and file name; sizes
//! and conversion outcomes follow as indented context lines. Paths only
//! appear where the user needs them to find a written file.
//!
//! # Output Format
//!
//! ## Estimate
//!
//! ```text
//! 001 IMG_0001.jpg
//!     Current Size: 1.9 MB
//!     Estimated WebP Size: 29.3 KB
//! 002 broken.png
//!     Current Size: Error reading file
//!     Estimated WebP Size: Cannot estimate
//! ```
//!
//! ## Convert
//!
//! ```text
//! Converting: IMG_0001.jpg
//! [1/2] IMG_0001.jpg → IMG_0001.webp
//! Converting: broken.png
//! [2/2] broken.png failed: Processing failed: ...
//!
//! Conversion completed with errors.
//!
//! Converted: 1/2
//!
//! Failed files:
//! broken.png: Processing failed: ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::convert::{BatchSummary, ConversionResult, ConvertEvent, MAX_LISTED_FAILURES, display_name};
use crate::imaging::MaxDimension;
use crate::session::FileInfo;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable size: bytes below 1 KiB, then one decimal in KB or MB.
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

// ============================================================================
// File info / estimate
// ============================================================================

/// The two info lines for one file.
pub fn format_file_info(info: &FileInfo) -> Vec<String> {
    let (current, estimated) = match info {
        FileInfo::NoSelection => ("No file selected".to_string(), "No file selected".to_string()),
        FileInfo::Estimated(e) => (
            format_file_size(e.current_size),
            format_file_size(e.estimated_size),
        ),
        FileInfo::Unreadable => (
            "Error reading file".to_string(),
            "Cannot estimate".to_string(),
        ),
    };
    vec![
        format!("Current Size: {}", current),
        format!("Estimated WebP Size: {}", estimated),
    ]
}

/// Indexed listing of files with their info lines.
pub fn format_estimates(entries: &[(PathBuf, FileInfo)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (path, info)) in entries.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), display_name(path)));
        for line in format_file_info(info) {
            lines.push(format!("{}{}", indent(1), line));
        }
    }
    lines
}

/// Print estimate output to stdout.
pub fn print_estimates(entries: &[(PathBuf, FileInfo)]) {
    for line in format_estimates(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert
// ============================================================================

/// Format a single conversion progress event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::FileStarted { filename, .. } => {
            vec![format!("Converting: {}", filename)]
        }
        ConvertEvent::FileFinished {
            index,
            total,
            result,
        } => {
            let line = match result {
                ConversionResult::Success { source, output } => format!(
                    "[{}/{}] {} → {}",
                    index,
                    total,
                    display_name(source),
                    display_name(output)
                ),
                ConversionResult::Failure { filename, message } => {
                    format!("[{}/{}] {} failed: {}", index, total, filename, message)
                }
            };
            vec![line]
        }
        ConvertEvent::BatchFinished(summary) => {
            let mut lines = vec![String::new()];
            lines.extend(format_summary(summary));
            lines
        }
        ConvertEvent::BatchFailed(message) => {
            vec![String::new(), format!("Conversion failed: {}", message)]
        }
    }
}

/// Completion message for a finished batch.
///
/// Lists at most [`MAX_LISTED_FAILURES`] failures, then a count of the rest.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let failures = summary.failure_lines();
    if failures.is_empty() {
        return vec![format!(
            "Successfully converted {} images to WebP format!",
            summary.converted()
        )];
    }

    let mut lines = vec![
        "Conversion completed with errors.".to_string(),
        String::new(),
        format!("Converted: {}/{}", summary.converted(), summary.attempted()),
        String::new(),
        "Failed files:".to_string(),
    ];
    lines.extend(failures.iter().take(MAX_LISTED_FAILURES).cloned());
    if failures.len() > MAX_LISTED_FAILURES {
        lines.push(format!(
            "... and {} more",
            failures.len() - MAX_LISTED_FAILURES
        ));
    }
    lines
}

/// Print a progress event to stdout.
pub fn print_convert_event(event: &ConvertEvent) {
    for line in format_convert_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Suggest size / preview
// ============================================================================

pub fn format_suggestion(suggested: Option<MaxDimension>) -> Vec<String> {
    match suggested {
        Some(max) => vec![format!("Suggested max dimension: {}px", max.value())],
        None => vec!["No readable images; max dimension unchanged".to_string()],
    }
}

pub fn format_preview(source: &Path, output: &Path, dimensions: (u32, u32)) -> Vec<String> {
    vec![format!(
        "Preview: {} → {} ({}x{})",
        display_name(source),
        output.display(),
        dimensions.0,
        dimensions.1
    )]
}

/// Print any pre-formatted lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
