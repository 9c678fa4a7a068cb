//! Interactive session state.
//!
//! A [`Session`] owns everything the shell lets the user edit between batches:
//! the ordered file list, which entries are selected, the output folder and
//! the live [`ConversionSettings`]. Nothing here is global; the shell holds one
//! `Session` and hands immutable snapshots ([`BatchJob`]) to the runner.
//!
//! The file list only grows through [`Session::add_files`] and only shrinks
//! through [`Session::clear`]. Entries are never edited in place, and duplicates
//! are kept.

use crate::convert::{BatchJob, ConversionSettings, SelectionError};
use crate::estimate::{EstimateMode, EstimateResult, estimate_file};
use crate::imaging::calculations::round_up_to_step;
use crate::imaging::{ImageBackend, MaxDimension, Quality};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// What the info panel shows for the focused file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileInfo {
    NoSelection,
    Estimated(EstimateResult),
    /// Size or dimensions could not be read.
    Unreadable,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    files: Vec<PathBuf>,
    selection: BTreeSet<usize>,
    output_dir: Option<PathBuf>,
    settings: ConversionSettings,
}

impl Session {
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Append files in order. A non-empty batch also points the output folder
    /// at the directory of its first file (`.` for bare file names).
    pub fn add_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let start = self.files.len();
        self.files.extend(paths.into_iter().map(Into::into));
        if let Some(first) = self.files.get(start)
            && let Some(parent) = first.parent()
        {
            self.output_dir = Some(if parent.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                parent.to_path_buf()
            });
        }
    }

    /// Drop every file and the selection. Output folder and settings stay.
    pub fn clear(&mut self) {
        self.files.clear();
        self.selection.clear();
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Replace the selection. Indices are kept sorted and de-duplicated;
    /// out-of-range ones are stored but resolve to nothing.
    pub fn select(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selection = indices.into_iter().collect();
    }

    pub fn select_all(&mut self) {
        self.selection = (0..self.files.len()).collect();
    }

    pub fn selection(&self) -> impl Iterator<Item = usize> + '_ {
        self.selection.iter().copied()
    }

    /// Resolve the selection to paths, in index order.
    pub fn selected_files(&self) -> Result<Vec<PathBuf>, SelectionError> {
        if self.selection.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        let files: Vec<PathBuf> = self
            .selection
            .iter()
            .filter_map(|&i| self.files.get(i).cloned())
            .collect();
        if files.is_empty() {
            return Err(SelectionError::NoValidFiles);
        }
        Ok(files)
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = Some(dir.into());
    }

    pub fn settings(&self) -> ConversionSettings {
        self.settings
    }

    pub fn set_quality(&mut self, quality: u32) {
        self.settings.quality = Quality::new(quality);
    }

    pub fn set_max_dimension(&mut self, max_dimension: u32) {
        self.settings.max_dimension = MaxDimension::new(max_dimension);
    }

    /// Snapshot the selection and settings into a job for the runner.
    pub fn prepare_batch(&self) -> Result<BatchJob, SelectionError> {
        let files = self.selected_files()?;
        let output_dir = self
            .output_dir
            .clone()
            .ok_or(SelectionError::NoOutputDir)?;
        Ok(BatchJob {
            files,
            settings: self.settings,
            output_dir,
        })
    }

    /// Size info for the first selected file.
    pub fn file_info(&self, backend: &impl ImageBackend, mode: EstimateMode) -> FileInfo {
        let Some(path) = self.selection.first().and_then(|&i| self.files.get(i)) else {
            return FileInfo::NoSelection;
        };
        file_info(backend, path, self.settings, mode)
    }

    /// Longest side across all readable files, rounded up to [`MaxDimension::STEP`].
    ///
    /// Covers the whole file list, not just the selection. `None` when no file
    /// could be read.
    pub fn suggest_max_dimension(&self, backend: &impl ImageBackend) -> Option<MaxDimension> {
        let longest = self
            .files
            .iter()
            .filter_map(|path| match backend.identify(path) {
                Ok(info) => Some(info.dimensions.longer_side()),
                Err(e) => {
                    log::debug!("skipping {} for size suggestion: {}", path.display(), e);
                    None
                }
            })
            .max()
            .filter(|&longest| longest > 0)?;
        Some(MaxDimension::new(round_up_to_step(
            longest,
            MaxDimension::STEP,
            MaxDimension::MIN,
            MaxDimension::MAX,
        )))
    }

    /// Apply [`Self::suggest_max_dimension`] if it found anything.
    pub fn apply_suggested_max_dimension(&mut self, backend: &impl ImageBackend) -> Option<MaxDimension> {
        let suggested = self.suggest_max_dimension(backend)?;
        self.settings.max_dimension = suggested;
        Some(suggested)
    }
}

/// Estimate one file, folding every failure into [`FileInfo::Unreadable`].
pub fn file_info(
    backend: &impl ImageBackend,
    path: &Path,
    settings: ConversionSettings,
    mode: EstimateMode,
) -> FileInfo {
    match estimate_file(backend, path, settings.max_dimension, settings.quality, mode) {
        Ok(estimate) => FileInfo::Estimated(estimate),
        Err(e) => {
            log::debug!("cannot estimate {}: {}", path.display(), e);
            FileInfo::Unreadable
        }
    }
}
