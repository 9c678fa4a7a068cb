//! Batch conversion pipeline.
//!
//! Converts an ordered list of source images to WebP, one at a time, in
//! selection order. Every file gets exactly one [`ConversionResult`]; a file
//! that cannot be read or encoded is recorded as a failure and the batch moves
//! on. Partial failure is a normal outcome reported through the
//! [`BatchSummary`], not an error.
//!
//! ## Output Structure
//!
//! ```text
//! <output_dir>/
//! ├── IMG_0001.webp     # from ~/Pictures/IMG_0001.jpg
//! ├── logo.webp         # from ~/Desktop/logo.png (alpha dropped)
//! └── photo.webp        # last of several `photo.*` sources wins
//! ```
//!
//! ## Progress
//!
//! When given a channel, the pipeline posts a [`ConvertEvent`] before and
//! after each file. The receiver is whoever renders progress; the pipeline
//! never touches display state itself.

use crate::imaging::{ImageBackend, MaxDimension, Quality, convert_image};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// How many failures a rendered summary lists before collapsing the rest.
pub const MAX_LISTED_FAILURES: usize = 5;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Problems detected before a batch starts. Nothing is created or touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please select at least one image file from the list.")]
    NothingSelected,
    #[error("No valid files selected for conversion.")]
    NoValidFiles,
    #[error("Please select an output folder.")]
    NoOutputDir,
}

/// Quality and size applied uniformly to every file of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSettings {
    pub quality: Quality,
    pub max_dimension: MaxDimension,
}

/// Everything a batch needs, captured when it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub files: Vec<PathBuf>,
    pub settings: ConversionSettings,
    pub output_dir: PathBuf,
}

/// Outcome for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionResult {
    Success { source: PathBuf, output: PathBuf },
    Failure { filename: String, message: String },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }

    /// `"name: message"` for failures, `None` for successes.
    pub fn failure_line(&self) -> Option<String> {
        match self {
            ConversionResult::Failure { filename, message } => {
                Some(format!("{}: {}", filename, message))
            }
            ConversionResult::Success { .. } => None,
        }
    }
}

/// Ordered results of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub results: Vec<ConversionResult>,
}

impl BatchSummary {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn converted(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.converted()
    }

    /// `"name: message"` for every failure, in input order.
    pub fn failure_lines(&self) -> Vec<String> {
        self.results.iter().filter_map(|r| r.failure_line()).collect()
    }
}

/// Progress events posted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertEvent {
    /// A file is about to be converted. `index` is 1-based.
    FileStarted {
        index: usize,
        total: usize,
        filename: String,
    },
    /// A file finished, successfully or not.
    FileFinished {
        index: usize,
        total: usize,
        result: ConversionResult,
    },
    /// The whole batch is done and the runner is idle again.
    BatchFinished(BatchSummary),
    /// The batch was rejected before the first file, e.g. the output folder
    /// could not be created. The runner is idle again.
    BatchFailed(String),
}

/// Display name of a source: its final path component.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Convert every file of `job`, in order, reporting progress on `events`.
///
/// Fails up front only when the job has no files (nothing is created) or the
/// output directory cannot be created; per-file problems become
/// [`ConversionResult::Failure`] entries.
pub fn convert_batch(
    backend: &impl ImageBackend,
    job: &BatchJob,
    events: Option<&Sender<ConvertEvent>>,
) -> Result<BatchSummary, ConvertError> {
    if job.files.is_empty() {
        return Err(SelectionError::NothingSelected.into());
    }
    std::fs::create_dir_all(&job.output_dir)?;

    let total = job.files.len();
    log::info!(
        "Converting {} file(s) to {} (quality {}, max {}px)",
        total,
        job.output_dir.display(),
        job.settings.quality.value(),
        job.settings.max_dimension.value()
    );

    let emit = |event: ConvertEvent| {
        if let Some(tx) = events {
            // A dropped receiver only means nobody is watching
            let _ = tx.send(event);
        }
    };

    let mut summary = BatchSummary::default();
    for (i, source) in job.files.iter().enumerate() {
        let filename = display_name(source);
        emit(ConvertEvent::FileStarted {
            index: i + 1,
            total,
            filename: filename.clone(),
        });

        let result = match convert_image(
            backend,
            source,
            &job.output_dir,
            job.settings.max_dimension,
            job.settings.quality,
        ) {
            Ok(output) => {
                log::debug!("{} -> {}", source.display(), output.display());
                ConversionResult::Success {
                    source: source.clone(),
                    output,
                }
            }
            Err(e) => {
                log::warn!("{}: {}", source.display(), e);
                ConversionResult::Failure {
                    filename,
                    message: e.to_string(),
                }
            }
        };

        emit(ConvertEvent::FileFinished {
            index: i + 1,
            total,
            result: result.clone(),
        });
        summary.results.push(result);
    }

    log::info!(
        "Converted {}/{} file(s)",
        summary.converted(),
        summary.attempted()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn job(files: &[&str], output_dir: &Path) -> BatchJob {
        BatchJob {
            files: files.iter().map(PathBuf::from).collect(),
            settings: ConversionSettings::default(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    // =========================================================================
    // BatchSummary tests
    // =========================================================================

    #[test]
    fn summary_counts() {
        let summary = BatchSummary {
            results: vec![
                ConversionResult::Success {
                    source: "/a.jpg".into(),
                    output: "/out/a.webp".into(),
                },
                ConversionResult::Failure {
                    filename: "b.jpg".into(),
                    message: "boom".into(),
                },
            ],
        };
        assert_eq!(summary.attempted(), 2);
        assert_eq!(summary.converted(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failure_lines(), vec!["b.jpg: boom"]);
    }

    #[test]
    fn display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/photos/IMG_1.JPG")), "IMG_1.JPG");
    }

    // =========================================================================
    // convert_batch with mock backend
    // =========================================================================

    #[test]
    fn converts_all_files_in_order() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![
            ("/in/b.jpg", 4000, 3000),
            ("/in/a.png", 3000, 4000),
        ]);

        let summary =
            convert_batch(&backend, &job(&["/in/b.jpg", "/in/a.png"], tmp.path()), None)
                .unwrap();

        assert_eq!(summary.converted(), 2);
        let converts: Vec<_> = backend
            .get_operations()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Convert {
                    source,
                    width,
                    height,
                    ..
                } => Some((source, width, height)),
                _ => None,
            })
            .collect();
        assert_eq!(
            converts,
            vec![
                ("/in/b.jpg".to_string(), 1920, 1440),
                ("/in/a.png".to_string(), 1440, 1920),
            ]
        );
    }

    #[test]
    fn applies_settings_uniformly() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![
            ("/in/1.jpg", 1000, 500),
            ("/in/2.jpg", 200, 100),
        ]);
        let mut job = job(&["/in/1.jpg", "/in/2.jpg"], tmp.path());
        job.settings = ConversionSettings {
            quality: Quality::new(55),
            max_dimension: MaxDimension::new(600),
        };

        convert_batch(&backend, &job, None).unwrap();

        let ops = backend.get_operations();
        let converts: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, RecordedOp::Convert { .. }))
            .collect();
        assert_eq!(converts.len(), 2);
        for op in converts {
            assert!(matches!(
                op,
                RecordedOp::Convert {
                    quality: 55,
                    width: 600,
                    height: 300,
                    ..
                }
            ));
        }
    }

    #[test]
    fn failures_do_not_abort_batch() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![("/in/good1.jpg", 10, 10), ("/in/good2.jpg", 10, 10)]);

        let summary = convert_batch(
            &backend,
            &job(&["/in/good1.jpg", "/in/corrupt.jpg", "/in/good2.jpg"], tmp.path()),
            None,
        )
        .unwrap();

        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.converted(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(summary.results[0].is_success());
        assert!(matches!(
            &summary.results[1],
            ConversionResult::Failure { filename, .. } if filename == "corrupt.jpg"
        ));
        assert!(summary.results[2].is_success());
    }

    #[test]
    fn encode_failure_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![("/in/a.jpg", 10, 10)]);
        backend.fail_encode_for("/in/a.jpg");

        let summary = convert_batch(&backend, &job(&["/in/a.jpg"], tmp.path()), None).unwrap();
        assert_eq!(
            summary.failure_lines(),
            vec!["a.jpg: Processing failed: encoding error 3"]
        );
    }

    #[test]
    fn n_files_with_k_failures() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut files = Vec::new();
        for i in 0..10 {
            let path = format!("/in/{i:02}.jpg");
            // Every third file is unreadable: 00, 03, 06, 09
            if i % 3 != 0 {
                backend.add_image(&path, 100, 100, crate::imaging::ColorMode::Rgb);
            }
            files.push(PathBuf::from(path));
        }
        let job = BatchJob {
            files,
            settings: ConversionSettings::default(),
            output_dir: tmp.path().to_path_buf(),
        };

        let summary = convert_batch(&backend, &job, None).unwrap();
        assert_eq!(summary.attempted(), 10);
        assert_eq!(summary.converted(), 6);
        assert_eq!(summary.failed(), 4);
        assert_eq!(summary.failure_lines().len(), 4);
    }

    #[test]
    fn empty_job_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let output_dir = tmp.path().join("never-created");
        let backend = MockBackend::new();

        let result = convert_batch(&backend, &job(&[], &output_dir), None);

        assert!(matches!(
            result,
            Err(ConvertError::Selection(SelectionError::NothingSelected))
        ));
        assert!(!output_dir.exists());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn creates_nested_output_dir() {
        let tmp = TempDir::new().unwrap();
        let output_dir = tmp.path().join("a/b/c");
        let backend = MockBackend::with_images(vec![("/in/x.jpg", 10, 10)]);

        convert_batch(&backend, &job(&["/in/x.jpg"], &output_dir), None).unwrap();
        assert!(output_dir.is_dir());
    }

    #[test]
    fn same_stem_sources_share_output_and_both_succeed() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![
            ("/one/photo.jpg", 10, 10),
            ("/two/photo.jpg", 10, 10),
        ]);

        let summary = convert_batch(
            &backend,
            &job(&["/one/photo.jpg", "/two/photo.jpg"], tmp.path()),
            None,
        )
        .unwrap();

        assert_eq!(summary.converted(), 2);
        let outputs: Vec<_> = summary
            .results
            .iter()
            .map(|r| match r {
                ConversionResult::Success { output, .. } => output.clone(),
                ConversionResult::Failure { .. } => panic!("unexpected failure"),
            })
            .collect();
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], tmp.path().join("photo.webp"));
    }

    #[test]
    fn duplicate_selection_converts_twice() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![("/in/a.jpg", 10, 10)]);

        let summary =
            convert_batch(&backend, &job(&["/in/a.jpg", "/in/a.jpg"], tmp.path()), None).unwrap();
        assert_eq!(summary.attempted(), 2);
        assert_eq!(summary.converted(), 2);
    }

    #[test]
    fn events_follow_file_order() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![("/in/a.jpg", 10, 10)]);
        let (tx, rx) = mpsc::channel();

        convert_batch(
            &backend,
            &job(&["/in/a.jpg", "/in/missing.jpg"], tmp.path()),
            Some(&tx),
        )
        .unwrap();
        drop(tx);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            ConvertEvent::FileStarted { index: 1, total: 2, filename } if filename == "a.jpg"
        ));
        assert!(matches!(
            &events[1],
            ConvertEvent::FileFinished { index: 1, result, .. } if result.is_success()
        ));
        assert!(matches!(
            &events[2],
            ConvertEvent::FileStarted { index: 2, filename, .. } if filename == "missing.jpg"
        ));
        assert!(matches!(
            &events[3],
            ConvertEvent::FileFinished { index: 2, result, .. } if !result.is_success()
        ));
    }

    #[test]
    fn dropped_receiver_does_not_stop_batch() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::with_images(vec![("/in/a.jpg", 10, 10)]);
        let (tx, rx) = mpsc::channel();
        drop(rx);

        let summary =
            convert_batch(&backend, &job(&["/in/a.jpg"], tmp.path()), Some(&tx)).unwrap();
        assert_eq!(summary.converted(), 1);
    }
}
