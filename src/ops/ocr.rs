//! OCR: build a searchable PDF from a scanned document.
//!
//! Recognition is delegated to the external `tesseract` tool, page by
//! page: each page is rendered to an image with `pdftoppm`, recognized
//! into a single-page searchable PDF, and the pages are reassembled in
//! order. A page that fails to render or recognize is copied from the
//! source unmodified instead of failing the whole document.

use std::path::{Path, PathBuf};

use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::{merge, pagetree};
use crate::runner::ProgressSink;
use crate::utils::run_tool;

const TESSERACT_HINT: &str =
    "install tesseract (e.g. 'apt install tesseract-ocr' or 'brew install tesseract')";
const POPPLER_HINT: &str = "install poppler-utils (e.g. 'apt install poppler-utils')";

/// Render DPI for recognition input; higher than screen DPI improves
/// accuracy on small print.
const RENDER_DPI: &str = "300";

/// Recognize `input` into a searchable PDF at `output`.
///
/// `language` is passed through to tesseract (e.g. `eng`, `deu`,
/// `chi_sim+eng`).
pub async fn run(
    input: &Path,
    output: &Path,
    language: &str,
    progress: &ProgressSink,
) -> Result<String> {
    // Both collaborators must exist before any per-page work starts; a
    // missing tool is a hard failure, not a per-page one.
    crate::utils::check_tool("tesseract", &["--version"], TESSERACT_HINT).await?;
    crate::utils::check_tool("pdftoppm", &["-v"], POPPLER_HINT).await?;

    let loaded = PdfReader::new().load(input).await?;
    let source = loaded.document;
    let total_pages = loaded.page_count;

    progress.set(5);

    let workspace = tempfile::TempDir::new()?;

    let mut page_docs = Vec::with_capacity(total_pages);
    let mut recognized = 0usize;
    let mut copied = 0usize;

    for page_index in 0..total_pages {
        match recognize_page(input, workspace.path(), page_index, language).await {
            Ok(doc) => {
                page_docs.push(doc);
                recognized += 1;
            }
            Err(err) => {
                log::warn!(
                    "OCR failed on page {}, copying original: {err}",
                    page_index + 1
                );
                page_docs.push(pagetree::select_pages(&source, &[page_index])?);
                copied += 1;
            }
        }

        progress.set_fraction(5, 90, page_index, total_pages);
    }

    let assembled = merge::merge_documents(page_docs)?;
    PdfWriter::new().save(&assembled, output).await?;

    Ok(format!(
        "OCR complete: {recognized} pages recognized, {copied} pages copied unmodified, \
         saved to {}",
        output.display()
    ))
}

/// Render one page to an image and recognize it into a single-page PDF.
async fn recognize_page(
    input: &Path,
    workspace: &Path,
    page_index: usize,
    language: &str,
) -> Result<lopdf::Document> {
    // Each page gets its own directory so the renderer's output file is
    // unambiguous regardless of its numbering scheme.
    let page_dir = workspace.join(format!("page{page_index}"));
    std::fs::create_dir_all(&page_dir)?;

    let page_number = (page_index + 1).to_string();
    let input_str = input.to_string_lossy().into_owned();
    let prefix = page_dir.join("render");
    let prefix_str = prefix.to_string_lossy().into_owned();

    run_tool(
        "pdftoppm",
        &[
            "-png",
            "-r",
            RENDER_DPI,
            "-f",
            &page_number,
            "-l",
            &page_number,
            &input_str,
            &prefix_str,
        ],
        POPPLER_HINT,
    )
    .await?;

    let rendered = single_file_in(&page_dir)?;

    let out_base = page_dir.join("ocr");
    let rendered_str = rendered.to_string_lossy().into_owned();
    let out_base_str = out_base.to_string_lossy().into_owned();

    run_tool(
        "tesseract",
        &[&rendered_str, &out_base_str, "-l", language, "pdf"],
        TESSERACT_HINT,
    )
    .await?;

    let produced = out_base.with_extension("pdf");
    let doc = lopdf::Document::load(&produced)
        .map_err(|e| ForgeError::operation_failed(format!("bad OCR page output: {e}")))?;

    Ok(doc)
}

/// The single image the renderer wrote into a per-page directory.
fn single_file_in(dir: &Path) -> Result<PathBuf> {
    let mut images: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
        .collect();

    images.sort();
    images
        .into_iter()
        .next()
        .ok_or_else(|| ForgeError::operation_failed("renderer produced no page image"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_single_file_in() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("render-1.png"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let found = single_file_in(dir.path()).unwrap();
        assert!(found.ends_with("render-1.png"));
    }

    #[test]
    fn test_single_file_in_empty() {
        let dir = TempDir::new().unwrap();
        assert!(single_file_in(dir.path()).is_err());
    }
}
