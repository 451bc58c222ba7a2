//! PDF loading.
//!
//! Wraps lopdf's synchronous loader in blocking tasks so operations can
//! load documents from async code without stalling the runtime, and maps
//! load failures onto the crate's error taxonomy (missing file, encrypted
//! document, corrupt structure).
//!
//! # Examples
//!
//! ```no_run
//! use pdfforge::io::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf")).await?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{ForgeError, Result};

/// A loaded PDF document with basic metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader with configurable verification.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents without pages after loading.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that skips verification.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or is not a regular file
    /// - The file is not a valid PDF
    /// - The PDF is encrypted
    /// - Verification is on and the PDF has no pages
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();

        if !path_buf.exists() {
            return Err(ForgeError::file_not_found(path_buf));
        }
        if !path_buf.is_file() {
            return Err(ForgeError::NotAFile { path: path_buf });
        }

        let verify = self.verify;
        let load_path = path_buf.clone();

        let doc = tokio::task::spawn_blocking(move || Document::load(&load_path))
            .await
            .map_err(|e| ForgeError::other(format!("Load task failed: {e}")))?
            .map_err(|e| {
                let err_msg = e.to_string();
                if err_msg.contains("encrypt") || err_msg.contains("password") {
                    ForgeError::encrypted_pdf(path_buf.clone())
                } else {
                    ForgeError::failed_to_load_pdf(path_buf.clone(), err_msg)
                }
            })?;

        if verify && doc.get_pages().is_empty() {
            return Err(ForgeError::corrupted_pdf(path_buf, "PDF has no pages"));
        }

        let page_count = doc.get_pages().len();
        let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);

        Ok(LoadedPdf {
            document: doc,
            path: path_buf,
            page_count,
            file_size,
        })
    }

    /// Load several PDFs, bounding the number loaded concurrently.
    ///
    /// Results come back in input order; each entry is independently a
    /// success or a failure so callers can decide whether one bad file
    /// aborts the batch.
    pub async fn load_many(
        &self,
        paths: &[PathBuf],
        max_concurrent: usize,
    ) -> Vec<Result<LoadedPdf>> {
        use futures::stream::{self, StreamExt};

        let max_concurrent = max_concurrent.max(1);

        let owned_paths: Vec<PathBuf> = paths.to_vec();
        let tasks = owned_paths.into_iter().enumerate().map(|(idx, path)| {
            let reader = self.clone();
            async move { (idx, reader.load(&path).await) }
        });

        let mut indexed: Vec<(usize, Result<LoadedPdf>)> = stream::iter(tasks)
            .buffer_unordered(max_concurrent)
            .collect()
            .await;

        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, result)| result).collect()
    }

    /// Return only the page count of a document.
    ///
    /// Used by callers that need the count for page-range resolution
    /// before deciding whether to run an operation at all.
    pub async fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.load(path).await?.page_count)
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
