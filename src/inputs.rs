//! Command-line input expansion.
//!
//! Turns the paths given on the command line into the ordered file list of a
//! session. Files are taken as given, whatever their extension; a file that
//! is not an image fails on its own during conversion. Directories are
//! walked recursively and contribute only supported images
//! ([`supported_input_extensions`](crate::imaging::supported_input_extensions)),
//! sorted by file name within each directory level, and hidden entries are
//! skipped.

use crate::imaging::is_supported_input;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Supported images under `dir`, in walk order.
pub fn collect_images(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_supported_input(e.path()))
        .map(DirEntry::into_path)
        .collect()
}

/// Expand command-line inputs in order: files verbatim, directories walked.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = collect_images(input);
            log::debug!("{}: {} image(s)", input.display(), found.len());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}
