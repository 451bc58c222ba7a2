//! Split a document into several files.
//!
//! Three modes, matching the interactive tool:
//! - one file per page (`<stem>_pageN.pdf`)
//! - a single file holding the pages of a range expression
//!   (`<stem>_extracted.pdf`)
//! - one file per run of N consecutive pages (`<stem>_partK.pdf`)
//!
//! Split is a multi-output operation: it takes an output directory and
//! reports the number of generated files in its completion message.

use std::path::{Path, PathBuf};

use crate::config::SplitMode;
use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::pagetree;
use crate::pages;
use crate::runner::ProgressSink;

/// Split `input` into `output_dir` according to `mode`.
pub async fn run(
    input: &Path,
    output_dir: &Path,
    mode: &SplitMode,
    progress: &ProgressSink,
) -> Result<String> {
    mode.validate()?;

    let loaded = PdfReader::new().load(input).await?;
    let total_pages = loaded.page_count;
    let doc = loaded.document;

    let base_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir).map_err(|e| ForgeError::FailedToCreateOutput {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
    }

    let writer = PdfWriter::new();
    let mut outputs: Vec<PathBuf> = Vec::new();

    match mode {
        SplitMode::EachPage => {
            for i in 0..total_pages {
                let path = output_dir.join(format!("{base_name}_page{}.pdf", i + 1));
                let single = pagetree::select_pages(&doc, &[i])?;
                writer.save(&single, &path).await?;
                outputs.push(path);

                progress.set_fraction(0, 95, i, total_pages);
            }
        }

        SplitMode::Range(expression) => {
            let selected = pages::resolve(expression, total_pages);
            if selected.is_empty() {
                return Err(ForgeError::empty_selection(expression, total_pages));
            }

            progress.set(20);

            let path = output_dir.join(format!("{base_name}_extracted.pdf"));
            let extracted = pagetree::select_pages(&doc, &selected)?;
            progress.set(80);

            writer.save(&extracted, &path).await?;
            outputs.push(path);
        }

        SplitMode::Chunks(n) => {
            let n = *n;
            let mut file_count = 0;

            let mut start = 0;
            while start < total_pages {
                let end = (start + n).min(total_pages);
                let indices: Vec<usize> = (start..end).collect();

                file_count += 1;
                let path = output_dir.join(format!("{base_name}_part{file_count}.pdf"));

                let part = pagetree::select_pages(&doc, &indices)?;
                writer.save(&part, &path).await?;
                outputs.push(path);

                progress.set_fraction(0, 95, end - 1, total_pages);
                start = end;
            }
        }
    }

    Ok(format!(
        "Split complete: {} files written to {}",
        outputs.len(),
        output_dir.display()
    ))
}
