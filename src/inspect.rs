//! Document inspection.
//!
//! Produces the quick facts a host shows before running an operation:
//! page count, PDF version, file size, object count, and the first page's
//! dimensions. Serializable for machine-readable output.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::PdfReader;
use crate::utils::format_file_size;

/// Basic facts about a PDF document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Path to the inspected file.
    pub path: PathBuf,

    /// Number of pages in the PDF.
    pub page_count: usize,

    /// PDF version string (e.g. "1.7").
    pub version: String,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Number of objects in the PDF.
    pub object_count: usize,

    /// First page dimensions (width, height) in points, if available.
    pub page_dimensions: Option<(f32, f32)>,
}

impl DocumentInfo {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self).context("failed to render document info")?;
        Ok(json)
    }

    /// Human-readable summary lines for terminal display.
    pub fn summary_lines(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("File".to_string(), self.path.display().to_string()),
            ("Pages".to_string(), self.page_count.to_string()),
            ("Version".to_string(), self.version.clone()),
            ("Size".to_string(), format_file_size(self.file_size)),
            ("Objects".to_string(), self.object_count.to_string()),
        ];

        if let Some((w, h)) = self.page_dimensions {
            lines.push(("Page size".to_string(), format!("{w:.1} x {h:.1} pts")));
        }

        lines
    }
}

/// Inspect a PDF file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded as a PDF.
pub async fn inspect(path: &Path) -> Result<DocumentInfo> {
    let loaded = PdfReader::new().load(path).await?;
    let doc = &loaded.document;

    // First page dimensions, when the page tree is well-formed.
    let page_dimensions = doc
        .get_pages()
        .into_values()
        .next()
        .and_then(|page_id| crate::ops::pagetree::page_mediabox(doc, page_id))
        .map(|[x0, y0, x1, y1]| (x1 - x0, y1 - y0));

    Ok(DocumentInfo {
        path: loaded.path,
        page_count: loaded.page_count,
        version: doc.version.clone(),
        file_size: loaded.file_size,
        object_count: doc.objects.len(),
        page_dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_inspect_reports_document_facts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.pdf");

        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }
            .into(),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(&path).unwrap();

        let info = inspect(&path).await.unwrap();

        assert_eq!(info.page_count, 1);
        assert_eq!(info.version, "1.5");
        assert!(info.file_size > 0);
        assert_eq!(info.page_dimensions, Some((612.0, 792.0)));
    }

    #[tokio::test]
    async fn test_info_serializes_to_json() {
        let info = DocumentInfo {
            path: PathBuf::from("doc.pdf"),
            page_count: 3,
            version: "1.4".into(),
            file_size: 2048,
            object_count: 12,
            page_dimensions: Some((612.0, 792.0)),
        };

        let json = info.to_json().unwrap();
        assert!(json.contains("\"pageCount\": 3"));
        assert!(json.contains("doc.pdf"));

        let parsed: DocumentInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.page_count, 3);
    }

    #[test]
    fn test_summary_lines() {
        let info = DocumentInfo {
            path: PathBuf::from("doc.pdf"),
            page_count: 3,
            version: "1.4".into(),
            file_size: 2048,
            object_count: 12,
            page_dimensions: None,
        };

        let lines = info.summary_lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], ("Pages".to_string(), "3".to_string()));
    }
}
