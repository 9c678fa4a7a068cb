//! Single-worker batch runner.
//!
//! The runner is either [`PipelineState::Idle`] or [`PipelineState::Running`].
//! [`BatchRunner::start`] moves it to `Running` and hands the job to one
//! background thread; the thread converts the files, puts the runner back to
//! `Idle`, and only then posts [`ConvertEvent::BatchFinished`], or
//! [`ConvertEvent::BatchFailed`] when the job was rejected up front. A receiver
//! that sees either can therefore start the next batch immediately.
//!
//! The worker shares nothing with the caller except the state flag. All
//! progress travels over the event channel, which the caller drains on its
//! own thread.

use crate::convert::{BatchJob, BatchSummary, ConvertError, ConvertEvent, convert_batch};
use crate::imaging::ImageBackend;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("A conversion is already running")]
    AlreadyRunning,
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Resets the runner to idle when the worker finishes, even on panic.
struct IdleOnDrop(Arc<AtomicBool>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    running: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PipelineState {
        if self.running.load(Ordering::Acquire) {
            PipelineState::Running
        } else {
            PipelineState::Idle
        }
    }

    /// Start `job` on a background thread.
    ///
    /// The join handle yields the same summary that is posted as
    /// `BatchFinished`. A job the pipeline rejects up front (no files, output
    /// folder not creatable) posts `BatchFailed` and the handle yields the error.
    pub fn start<B>(
        &self,
        backend: Arc<B>,
        job: BatchJob,
        events: Sender<ConvertEvent>,
    ) -> Result<JoinHandle<Result<BatchSummary, ConvertError>>, RunnerError>
    where
        B: ImageBackend + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RunnerError::AlreadyRunning);
        }

        let guard = IdleOnDrop(Arc::clone(&self.running));
        let spawned = thread::Builder::new()
            .name("webify-batch".into())
            .spawn(move || {
                let outcome = {
                    let _guard = guard;
                    convert_batch(backend.as_ref(), &job, Some(&events))
                };
                let event = match &outcome {
                    Ok(summary) => ConvertEvent::BatchFinished(summary.clone()),
                    Err(e) => {
                        log::warn!("Batch not started: {}", e);
                        ConvertEvent::BatchFailed(e.to_string())
                    }
                };
                let _ = events.send(event);
                outcome
            });

        // On spawn failure the closure, and with it the guard, is dropped here
        spawned.map_err(RunnerError::Spawn)
    }
}
