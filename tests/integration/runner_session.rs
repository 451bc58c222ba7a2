//! Task runner event stream and session state machine.

use pdfforge::ops::OperationRequest;
use pdfforge::runner::{OperationEvent, SessionState, TaskRunner};
use pdfforge::ForgeError;
use tempfile::TempDir;

use crate::common::write_pdf;

#[tokio::test]
async fn events_are_progress_then_single_terminal() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 6);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    let mut events = runner
        .submit(OperationRequest::ExtractPages {
            input,
            output,
            pages: "1-4".into(),
        })
        .unwrap();

    let mut progress = Vec::new();
    let mut terminal = None;

    while let Some(event) = events.recv().await {
        match event {
            OperationEvent::Progress(p) => {
                assert!(terminal.is_none(), "progress after terminal event");
                progress.push(p);
            }
            OperationEvent::Finished(result) => {
                assert!(terminal.is_none(), "second terminal event");
                terminal = Some(result);
            }
        }
    }

    let message = terminal.expect("no terminal event").unwrap();
    assert!(message.contains("4 pages"));

    // Contract: monotonically non-decreasing, ending at 100.
    assert_eq!(*progress.last().unwrap(), 100);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|&p| p <= 100));
}

#[tokio::test]
async fn session_transitions_idle_running_terminal() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 2);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    assert_eq!(runner.state(), SessionState::Idle);

    let message = runner
        .run(
            OperationRequest::ExtractPages {
                input,
                output,
                pages: "1".into(),
            },
            |_| {},
        )
        .await
        .unwrap();
    assert!(!message.is_empty());
    assert_eq!(runner.state(), SessionState::Succeeded);

    runner.reset();
    assert_eq!(runner.state(), SessionState::Idle);
}

#[tokio::test]
async fn terminal_session_accepts_next_submission() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 2);

    let runner = TaskRunner::new();

    // First operation fails (empty selection).
    let result = runner
        .run(
            OperationRequest::ExtractPages {
                input: input.clone(),
                output: dir.path().join("a.pdf"),
                pages: "9".into(),
            },
            |_| {},
        )
        .await;
    assert!(result.is_err());
    assert_eq!(runner.state(), SessionState::Failed);

    // The session re-arms without an explicit reset.
    let output = dir.path().join("b.pdf");
    runner
        .run(
            OperationRequest::ExtractPages {
                input,
                output: output.clone(),
                pages: "1".into(),
            },
            |_| {},
        )
        .await
        .unwrap();
    assert!(output.exists());
    assert_eq!(runner.state(), SessionState::Succeeded);
}

#[tokio::test]
async fn invalid_requests_never_start() {
    let runner = TaskRunner::new();

    let result = runner.submit(OperationRequest::Merge {
        inputs: vec![std::path::PathBuf::from("only-one.pdf")],
        output: std::path::PathBuf::from("out.pdf"),
    });

    assert!(matches!(result, Err(ForgeError::NotEnoughInputs { .. })));
    assert_eq!(runner.state(), SessionState::Idle);
}
