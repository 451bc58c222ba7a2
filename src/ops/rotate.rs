//! Rotate pages.
//!
//! The rotation delta is added to each page's current `/Rotate` value
//! modulo 360. An empty page expression rotates the whole document.

use std::path::Path;

use crate::config::Rotation;
use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::pagetree;
use crate::pages;
use crate::runner::ProgressSink;

/// Rotate the pages matched by `expression` by the given delta.
pub async fn run(
    input: &Path,
    output: &Path,
    rotation: Rotation,
    expression: &str,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;
    let total_pages = loaded.page_count;

    let selected = pages::resolve(expression, total_pages);
    if selected.is_empty() {
        return Err(ForgeError::empty_selection(expression, total_pages));
    }

    let page_ids = pagetree::ordered_page_ids(&doc);
    let degrees = rotation.as_degrees();

    for (i, &idx) in selected.iter().enumerate() {
        pagetree::rotate_page(&mut doc, page_ids[idx], degrees)?;
        progress.set_fraction(0, 90, i, selected.len());
    }

    PdfWriter::new().save(&doc, output).await?;

    Ok(format!(
        "Rotated {} pages by {degrees} degrees, saved to {}",
        selected.len(),
        output.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::pagetree::{create_multi_page_pdf, ordered_page_ids};
    use lopdf::Object;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_pdf(dir: &TempDir, pages: usize) -> PathBuf {
        let path = dir.path().join("in.pdf");
        create_multi_page_pdf(pages).save(&path).unwrap();
        path
    }

    fn rotation_of(doc: &lopdf::Document, idx: usize) -> i64 {
        let ids = ordered_page_ids(doc);
        match doc.get_object(ids[idx]) {
            Ok(Object::Dictionary(dict)) => {
                dict.get(b"Rotate").and_then(|r| r.as_i64()).unwrap_or(0)
            }
            _ => panic!("page is not a dictionary"),
        }
    }

    #[tokio::test]
    async fn test_rotate_all_pages() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 3);
        let output = dir.path().join("out.pdf");

        let message = run(
            &input,
            &output,
            Rotation::Clockwise90,
            "",
            &ProgressSink::discard(),
        )
        .await
        .unwrap();

        assert!(message.contains("3 pages"));
        assert!(message.contains("90"));

        let doc = lopdf::Document::load(&output).unwrap();
        for idx in 0..3 {
            assert_eq!(rotation_of(&doc, idx), 90);
        }
    }

    #[tokio::test]
    async fn test_rotate_subset() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 4);
        let output = dir.path().join("out.pdf");

        run(
            &input,
            &output,
            Rotation::Rotate180,
            "2-3",
            &ProgressSink::discard(),
        )
        .await
        .unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        assert_eq!(rotation_of(&doc, 0), 0);
        assert_eq!(rotation_of(&doc, 1), 180);
        assert_eq!(rotation_of(&doc, 2), 180);
        assert_eq!(rotation_of(&doc, 3), 0);
    }

    #[tokio::test]
    async fn test_rotate_empty_selection_rejected() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 2);
        let output = dir.path().join("out.pdf");

        let result = run(
            &input,
            &output,
            Rotation::Clockwise90,
            "50-60",
            &ProgressSink::discard(),
        )
        .await;

        assert!(matches!(result, Err(ForgeError::EmptySelection { .. })));
    }
}
