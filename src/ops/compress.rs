//! Re-save a document with stream compression and object cleanup.

use std::path::Path;

use crate::config::CompressionLevel;
use crate::error::Result;
use crate::io::{PdfReader, PdfWriter};
use crate::runner::ProgressSink;
use crate::utils::format_file_size;

/// Compress `input` into `output` at the requested level.
///
/// Low re-saves as-is (lopdf already drops dead space on write), medium
/// deflates content streams, high additionally prunes unreferenced
/// objects.
pub async fn run(
    input: &Path,
    output: &Path,
    level: CompressionLevel,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;
    let input_size = loaded.file_size;

    progress.set(30);

    match level {
        CompressionLevel::Low => {}
        CompressionLevel::Medium => {
            doc.compress();
        }
        CompressionLevel::High => {
            doc.compress();
            doc.prune_objects();
            doc.renumber_objects();
        }
    }

    progress.set(80);

    let stats = PdfWriter::new().save_with_stats(&doc, output).await?;

    Ok(format!(
        "Compressed {} -> {}, saved to {}",
        format_file_size(input_size),
        format_file_size(stats.file_size),
        output.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::pagetree::create_multi_page_pdf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_compress_levels_produce_loadable_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.pdf");
        create_multi_page_pdf(4).save(&input).unwrap();

        for (level, name) in [
            (CompressionLevel::Low, "low.pdf"),
            (CompressionLevel::Medium, "medium.pdf"),
            (CompressionLevel::High, "high.pdf"),
        ] {
            let output = dir.path().join(name);
            let message = run(&input, &output, level, &ProgressSink::discard())
                .await
                .unwrap();

            assert!(message.contains("Compressed"));
            let doc = lopdf::Document::load(&output).unwrap();
            assert_eq!(doc.get_pages().len(), 4);
        }
    }
}
