//! Background execution of document operations.
//!
//! The interactive host submits a command object describing the requested
//! operation; the runner executes it on a background task and posts
//! progress and a single terminal event back through a channel, keeping
//! presentation state decoupled from execution.
//!
//! A session runs at most one operation at a time. The session state
//! machine is explicit: `Idle -> Running -> (Succeeded | Failed)`, and a
//! new submission re-arms a session resting in any non-`Running` state.
//! Cancellation is not supported; a started operation runs to completion
//! or failure.

pub mod progress;

pub use progress::ProgressSink;

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::{ForgeError, Result};
use crate::ops::{self, OperationRequest};

/// Lifecycle state of an operation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No operation has been submitted yet, or the session was reset.
    #[default]
    Idle,
    /// An operation is executing; further submissions are rejected.
    Running,
    /// The last operation finished with a success message.
    Succeeded,
    /// The last operation finished with an error.
    Failed,
}

/// Event posted by a running operation.
#[derive(Debug)]
pub enum OperationEvent {
    /// Progress tick in `[0, 100]`, monotonically non-decreasing.
    Progress(u8),
    /// Terminal event: completion message or failure. Sent exactly once,
    /// after which no further events arrive.
    Finished(Result<String>),
}

/// Executes one operation at a time for a tool session.
#[derive(Clone, Default)]
pub struct TaskRunner {
    state: Arc<Mutex<SessionState>>,
}

impl TaskRunner {
    /// Create a new idle runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Submit an operation for background execution.
    ///
    /// Validates the request synchronously, so fully-invalid input is
    /// rejected here, before any document is opened. On acceptance the
    /// session transitions to `Running` and events stream through the
    /// returned receiver, ending with exactly one
    /// [`OperationEvent::Finished`].
    ///
    /// # Errors
    ///
    /// - [`ForgeError::OperationInFlight`] if an operation is running
    /// - Any validation error from the request itself
    pub fn submit(
        &self,
        request: OperationRequest,
    ) -> Result<mpsc::UnboundedReceiver<OperationEvent>> {
        request.validate()?;

        {
            let mut state = self.state.lock().unwrap();
            if *state == SessionState::Running {
                return Err(ForgeError::OperationInFlight);
            }
            *state = SessionState::Running;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let sink = ProgressSink::new(move |percent| {
                // The receiver may have been dropped; progress is then
                // simply discarded.
                let _ = progress_tx.send(OperationEvent::Progress(percent));
            });

            let result = ops::execute(request, &sink).await;

            if result.is_ok() {
                sink.finish();
            }

            *state.lock().unwrap() = if result.is_ok() {
                SessionState::Succeeded
            } else {
                SessionState::Failed
            };

            let _ = tx.send(OperationEvent::Finished(result));
        });

        Ok(rx)
    }

    /// Submit an operation and wait for its terminal result, forwarding
    /// progress ticks to `on_progress`.
    ///
    /// Convenience for hosts that drive one operation synchronously.
    pub async fn run<F>(&self, request: OperationRequest, mut on_progress: F) -> Result<String>
    where
        F: FnMut(u8),
    {
        let mut events = self.submit(request)?;

        while let Some(event) = events.recv().await {
            match event {
                OperationEvent::Progress(percent) => on_progress(percent),
                OperationEvent::Finished(result) => return result,
            }
        }

        // The worker task sends Finished before dropping the sender, so
        // this is unreachable in practice.
        Err(ForgeError::other("operation ended without a terminal event"))
    }

    /// Reset a terminal session back to idle.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        if *state != SessionState::Running {
            *state = SessionState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_minimal_pdf(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
        let mut doc = lopdf::Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<lopdf::Object> = Vec::new();
        for _ in 0..pages {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.path().join(name);
        doc.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_successful_run_reports_monotonic_progress_ending_at_100() {
        let dir = TempDir::new().unwrap();
        let input = write_minimal_pdf(&dir, "in.pdf", 4);
        let output = dir.path().join("out.pdf");

        let runner = TaskRunner::new();
        let mut ticks = Vec::new();

        let message = runner
            .run(
                OperationRequest::ExtractPages {
                    input,
                    output: output.clone(),
                    pages: "1-2".into(),
                },
                |p| ticks.push(p),
            )
            .await
            .unwrap();

        assert!(message.contains("2"));
        assert!(output.exists());
        assert_eq!(*ticks.last().unwrap(), 100);
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(runner.state(), SessionState::Succeeded);
    }

    #[tokio::test]
    async fn test_failure_posts_single_terminal_event() {
        let dir = TempDir::new().unwrap();
        let runner = TaskRunner::new();

        let result = runner
            .run(
                OperationRequest::ExtractPages {
                    input: dir.path().join("missing.pdf"),
                    output: dir.path().join("out.pdf"),
                    pages: "1".into(),
                },
                |_| {},
            )
            .await;

        assert!(matches!(result, Err(ForgeError::FileNotFound { .. })));
        assert_eq!(runner.state(), SessionState::Failed);
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_running() {
        let dir = TempDir::new().unwrap();
        let runner = TaskRunner::new();

        // Extract with an empty expression is rejected synchronously.
        let result = runner.submit(OperationRequest::ExtractPages {
            input: dir.path().join("in.pdf"),
            output: dir.path().join("out.pdf"),
            pages: "  ".into(),
        });

        assert!(result.is_err());
        assert_eq!(runner.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_second_submission_while_running_is_rejected() {
        let runner = TaskRunner::new();
        {
            let mut state = runner.state.lock().unwrap();
            *state = SessionState::Running;
        }

        let dir = TempDir::new().unwrap();
        let result = runner.submit(OperationRequest::ExtractPages {
            input: dir.path().join("in.pdf"),
            output: dir.path().join("out.pdf"),
            pages: "1".into(),
        });

        assert!(matches!(result, Err(ForgeError::OperationInFlight)));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let runner = TaskRunner::new();
        {
            let mut state = runner.state.lock().unwrap();
            *state = SessionState::Failed;
        }
        runner.reset();
        assert_eq!(runner.state(), SessionState::Idle);
    }
}
