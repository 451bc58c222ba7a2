//! Split and merge flows, including a split-then-merge round trip.

use pdfforge::config::SplitMode;
use pdfforge::ops::OperationRequest;
use pdfforge::runner::TaskRunner;
use tempfile::TempDir;

use crate::common::{page_count, page_heights, write_pdf};

#[tokio::test]
async fn split_each_page_then_merge_restores_page_count() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "book.pdf", 4);
    let parts_dir = dir.path().join("parts");

    let runner = TaskRunner::new();
    let message = runner
        .run(
            OperationRequest::Split {
                input,
                output_dir: parts_dir.clone(),
                mode: SplitMode::EachPage,
            },
            |_| {},
        )
        .await
        .unwrap();
    assert!(message.contains("4 files"));

    let parts: Vec<_> = (1..=4)
        .map(|i| parts_dir.join(format!("book_page{i}.pdf")))
        .collect();
    for part in &parts {
        assert_eq!(page_count(part), 1);
    }

    let merged = dir.path().join("merged.pdf");
    runner
        .run(
            OperationRequest::Merge {
                inputs: parts,
                output: merged.clone(),
            },
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(page_count(&merged), 4);
    // Round trip preserves page order.
    assert_eq!(page_heights(&merged), vec![700.0, 701.0, 702.0, 703.0]);
}

#[tokio::test]
async fn split_chunks_partitions_the_document() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "doc.pdf", 5);
    let parts_dir = dir.path().join("parts");

    let runner = TaskRunner::new();
    runner
        .run(
            OperationRequest::Split {
                input,
                output_dir: parts_dir.clone(),
                mode: SplitMode::Chunks(2),
            },
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(page_count(&parts_dir.join("doc_part1.pdf")), 2);
    assert_eq!(page_count(&parts_dir.join("doc_part2.pdf")), 2);
    assert_eq!(page_count(&parts_dir.join("doc_part3.pdf")), 1);
}

#[tokio::test]
async fn merge_reports_files_and_pages() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", 2);
    let b = write_pdf(&dir, "b.pdf", 3);
    let output = dir.path().join("merged.pdf");

    let runner = TaskRunner::new();
    let message = runner
        .run(
            OperationRequest::Merge {
                inputs: vec![a, b],
                output: output.clone(),
            },
            |_| {},
        )
        .await
        .unwrap();

    assert!(message.contains("2 files"));
    assert!(message.contains("5 pages"));
    assert_eq!(page_count(&output), 5);
}
