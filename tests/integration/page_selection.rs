//! End-to-end behavior of page-range expressions through the extract
//! operation: forgiving resolution, silent drops, and the empty-selection
//! rejection at the operation boundary.

use pdfforge::ops::OperationRequest;
use pdfforge::runner::TaskRunner;
use pdfforge::{ForgeError, pages};
use tempfile::TempDir;

use crate::common::{page_count, write_pdf};

#[tokio::test]
async fn extract_keeps_exactly_the_resolved_pages() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 10);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    runner
        .run(
            OperationRequest::ExtractPages {
                input,
                output: output.clone(),
                pages: "1-3,5,7-10".into(),
            },
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(page_count(&output), 8);
}

#[tokio::test]
async fn malformed_tokens_are_dropped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 5);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    let message = runner
        .run(
            OperationRequest::ExtractPages {
                input,
                output: output.clone(),
                pages: "abc,3,1-2-3".into(),
            },
            |_| {},
        )
        .await
        .unwrap();

    // Only "3" survives resolution.
    assert!(message.contains("1 pages"));
    assert_eq!(page_count(&output), 1);
}

#[tokio::test]
async fn fully_invalid_expression_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 5);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    let result = runner
        .run(
            OperationRequest::ExtractPages {
                input,
                output: output.clone(),
                pages: "0,-1,99".into(),
            },
            |_| {},
        )
        .await;

    assert!(matches!(result, Err(ForgeError::EmptySelection { .. })));
    assert!(!output.exists());
}

#[test]
fn resolution_agrees_with_extraction_semantics() {
    // The operation consumes exactly what the resolver produces; spot
    // check the documented scenarios at the library boundary.
    assert_eq!(pages::resolve("1-3,5,7-10", 10), vec![0, 1, 2, 4, 6, 7, 8, 9]);
    assert_eq!(pages::resolve("5-3", 10), Vec::<usize>::new());
    assert_eq!(pages::resolve("1,1,2", 10), vec![0, 1]);
    assert_eq!(pages::resolve("  2 , 4 ", 5), vec![1, 3]);
}
