//! Merge several PDF documents into one.
//!
//! Documents are combined by renumbering each additional document's
//! objects past the accumulated maximum id, moving its objects across,
//! and appending its page references to the base document's page tree.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};

use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::pagetree;
use crate::runner::ProgressSink;

/// Merge the given documents in order into a single document.
///
/// The first document is the base; the others are appended. Also used by
/// the OCR pipeline to reassemble per-page results.
///
/// # Errors
///
/// Returns an error if no documents are given or the page tree of any
/// document is malformed.
pub(crate) fn merge_documents(mut docs: Vec<Document>) -> Result<Document> {
    if docs.is_empty() {
        return Err(ForgeError::NotEnoughInputs {
            required: 1,
            provided: 0,
        });
    }

    let mut merged = docs.remove(0);
    let mut max_id = merged.max_id;

    for mut doc in docs {
        // Renumber to avoid object id collisions with what's merged so far.
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let doc_pages: Vec<ObjectId> = pagetree::ordered_page_ids(&doc);
        merged.objects.extend(doc.objects);

        append_pages_to_tree(&mut merged, &doc_pages)?;
    }

    merged.renumber_objects();
    Ok(merged)
}

/// Append page references to the merged document's root page tree.
fn append_pages_to_tree(merged: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = pagetree::root_pages_id(merged)?;

    // Appended pages become direct children of the root pages node.
    for &page_id in page_ids {
        if let Ok(Object::Dictionary(dict)) = merged.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let pages_obj = merged.get_object_mut(pages_id).map_err(|e| {
        ForgeError::operation_failed(format!("Failed to get pages object: {e}"))
    })?;

    if let Object::Dictionary(dict) = pages_obj {
        let kids = dict
            .get_mut(b"Kids")
            .map_err(|_| ForgeError::operation_failed("Pages dictionary missing Kids array"))?;

        if let Object::Array(kids_array) = kids {
            for &page_id in page_ids {
                kids_array.push(Object::Reference(page_id));
            }
        } else {
            return Err(ForgeError::operation_failed("Kids is not an array"));
        }

        let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
        dict.set(
            "Count",
            Object::Integer(current_count + page_ids.len() as i64),
        );
    } else {
        return Err(ForgeError::operation_failed(
            "Pages object is not a dictionary",
        ));
    }

    Ok(())
}

/// Merge the input files into `output`.
///
/// Requires at least two inputs; merging a file with itself is allowed.
pub async fn run(inputs: &[PathBuf], output: &Path, progress: &ProgressSink) -> Result<String> {
    if inputs.len() < 2 {
        return Err(ForgeError::NotEnoughInputs {
            required: 2,
            provided: inputs.len(),
        });
    }

    let reader = PdfReader::new();
    let total_files = inputs.len();

    let mut docs = Vec::with_capacity(total_files);
    for (i, result) in reader
        .load_many(inputs, 4)
        .await
        .into_iter()
        .enumerate()
    {
        docs.push(result?.document);
        progress.set_fraction(0, 60, i, total_files);
    }

    let merged = merge_documents(docs)?;
    progress.set(90);

    let total_pages = merged.get_pages().len();
    let stats = PdfWriter::new().save_with_stats(&merged, output).await?;

    Ok(format!(
        "Merged {total_files} files into {total_pages} pages: {} ({})",
        output.display(),
        stats.format_file_size()
    ))
}
