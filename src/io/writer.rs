//! PDF saving.
//!
//! Provides atomic writes (write to a temp file, then rename) so a failed
//! operation never leaves a truncated output in place, plus basic write
//! statistics for the completion message.

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{ForgeError, Result};

/// Statistics about a completed write.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as a human-readable string.
    pub fn format_file_size(&self) -> String {
        crate::utils::format_file_size(self.file_size)
    }
}

/// PDF writer with atomic-write behavior.
pub struct PdfWriter {
    /// Write to a temp file and rename into place.
    atomic: bool,

    /// Buffer size for the underlying writer, in bytes.
    buffer_size: usize,
}

impl PdfWriter {
    /// Create a new writer with atomic writes enabled.
    pub fn new() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }

    /// Create a writer without atomic writes (faster, less safe).
    pub fn non_atomic() -> Self {
        Self {
            atomic: false,
            buffer_size: 8192,
        }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be created or written.
    pub async fn save(&self, doc: &Document, path: &Path) -> Result<()> {
        let _stats = self.save_with_stats(doc, path).await?;
        Ok(())
    }

    /// Save a PDF and return statistics about the written file.
    pub async fn save_with_stats(&self, doc: &Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let atomic = self.atomic;
        let buffer_size = self.buffer_size;

        // lopdf serialization is synchronous; run it off the async runtime.
        let mut doc_clone = doc.clone();

        let stats = task::spawn_blocking(move || {
            let write_path = if atomic {
                path_buf.with_extension("tmp")
            } else {
                path_buf.clone()
            };

            let file = std::fs::File::create(&write_path).map_err(|e| {
                ForgeError::FailedToCreateOutput {
                    path: write_path.clone(),
                    source: e,
                }
            })?;

            let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);

            doc_clone
                .save_to(&mut writer)
                .map_err(|e| ForgeError::FailedToWrite {
                    path: write_path.clone(),
                    source: std::io::Error::other(e),
                })?;

            writer.flush().map_err(|e| ForgeError::FailedToWrite {
                path: write_path.clone(),
                source: e,
            })?;

            if atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| ForgeError::FailedToWrite {
                    path: path_buf.clone(),
                    source: e,
                })?;
            }

            let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);

            Ok::<_, ForgeError>(WriteStatistics {
                file_size,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| ForgeError::other(format!("Write task failed: {e}")))??;

        Ok(stats)
    }

    /// Pre-flight check that the output location is writable.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory does not exist or is
    /// read-only.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            if !parent.exists() {
                return Err(ForgeError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }

            let metadata =
                tokio::fs::metadata(parent)
                    .await
                    .map_err(|e| ForgeError::FailedToCreateOutput {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;

            if metadata.permissions().readonly() {
                return Err(ForgeError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
