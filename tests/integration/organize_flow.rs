//! Delete, reorder and rotate flows through the task runner.

use pdfforge::config::Rotation;
use pdfforge::ops::OperationRequest;
use pdfforge::runner::TaskRunner;
use pdfforge::ForgeError;
use tempfile::TempDir;

use crate::common::{page_count, page_heights, write_pdf};

#[tokio::test]
async fn delete_removes_selected_pages() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 5);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    runner
        .run(
            OperationRequest::DeletePages {
                input,
                output: output.clone(),
                pages: "1,3".into(),
            },
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(page_count(&output), 3);
    // Pages 2, 4, 5 remain (heights 701, 703, 704).
    assert_eq!(page_heights(&output), vec![701.0, 703.0, 704.0]);
}

#[tokio::test]
async fn delete_all_pages_is_refused() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 2);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    let result = runner
        .run(
            OperationRequest::DeletePages {
                input,
                output,
                pages: "1-2".into(),
            },
            |_| {},
        )
        .await;

    assert!(matches!(result, Err(ForgeError::InvalidSelection { .. })));
}

#[tokio::test]
async fn reorder_applies_user_permutation() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 4);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    runner
        .run(
            OperationRequest::ReorderPages {
                input,
                output: output.clone(),
                order: "4,2,1,3".into(),
            },
            |_| {},
        )
        .await
        .unwrap();

    assert_eq!(page_heights(&output), vec![703.0, 701.0, 700.0, 702.0]);
}

#[tokio::test]
async fn rotate_subset_leaves_other_pages_untouched() {
    let dir = TempDir::new().unwrap();
    let input = write_pdf(&dir, "in.pdf", 3);
    let output = dir.path().join("out.pdf");

    let runner = TaskRunner::new();
    runner
        .run(
            OperationRequest::Rotate {
                input,
                output: output.clone(),
                rotation: Rotation::Clockwise90,
                pages: "2".into(),
            },
            |_| {},
        )
        .await
        .unwrap();

    let doc = lopdf::Document::load(&output).unwrap();
    let rotations: Vec<i64> = doc
        .get_pages()
        .into_values()
        .map(|page_id| match doc.get_object(page_id) {
            Ok(lopdf::Object::Dictionary(dict)) => {
                dict.get(b"Rotate").and_then(|r| r.as_i64()).unwrap_or(0)
            }
            _ => panic!("page is not a dictionary"),
        })
        .collect();

    assert_eq!(rotations, vec![0, 90, 0]);
}
