//! Page organization: delete, extract, reorder, crop.
//!
//! These operations share one structure: load, resolve the user's page
//! expression against the real page count, reject an empty selection, then
//! rebuild the page tree (or page boxes) and save.

use lopdf::Object;
use std::path::Path;

use crate::config::Margins;
use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::pagetree;
use crate::pages;
use crate::runner::ProgressSink;

/// Delete the pages matched by `expression` from the document.
///
/// Deleting every page is refused; the result must keep at least one.
pub async fn delete(
    input: &Path,
    output: &Path,
    expression: &str,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let total_pages = loaded.page_count;

    let to_delete = pages::resolve(expression, total_pages);
    if to_delete.is_empty() {
        return Err(ForgeError::empty_selection(expression, total_pages));
    }
    if to_delete.len() >= total_pages {
        return Err(ForgeError::invalid_selection(
            "cannot delete every page of the document",
        ));
    }

    progress.set(30);

    // Keep the complement, in original order.
    let kept: Vec<usize> = (0..total_pages)
        .filter(|idx| !to_delete.contains(idx))
        .collect();

    let result = pagetree::select_pages(&loaded.document, &kept)?;
    progress.set(80);

    PdfWriter::new().save(&result, output).await?;

    Ok(format!(
        "Deleted {} pages, saved to {}",
        to_delete.len(),
        output.display()
    ))
}

/// Extract the pages matched by `expression` into a new document.
pub async fn extract(
    input: &Path,
    output: &Path,
    expression: &str,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let total_pages = loaded.page_count;

    let selected = pages::resolve(expression, total_pages);
    if selected.is_empty() {
        return Err(ForgeError::empty_selection(expression, total_pages));
    }

    progress.set(20);

    let result = pagetree::select_pages(&loaded.document, &selected)?;
    progress.set(90);

    PdfWriter::new().save(&result, output).await?;

    Ok(format!(
        "Extracted {} pages, saved to {}",
        selected.len(),
        output.display()
    ))
}

/// Rearrange pages into the order given by `order`.
///
/// The order expression is resolved in order-preserving mode: sequence and
/// duplicates of valid entries are kept as given, invalid entries drop out
/// silently. An empty order reverses the document.
pub async fn reorder(
    input: &Path,
    output: &Path,
    order: &str,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let total_pages = loaded.page_count;

    let new_order: Vec<usize> = if order.trim().is_empty() {
        (0..total_pages).rev().collect()
    } else {
        pages::resolve_ordered(order, total_pages)
    };

    if new_order.is_empty() {
        return Err(ForgeError::empty_selection(order, total_pages));
    }

    progress.set(20);

    let result = pagetree::select_pages(&loaded.document, &new_order)?;
    progress.set(90);

    PdfWriter::new().save(&result, output).await?;

    Ok(format!("Reordered pages, saved to {}", output.display()))
}

/// Inset every page's visible area by the given margins.
///
/// The crop box is derived from each page's MediaBox; a margin set that
/// would invert the box on some page fails the operation.
pub async fn crop(
    input: &Path,
    output: &Path,
    margins: Margins,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;
    let total_pages = loaded.page_count;

    let page_ids = pagetree::ordered_page_ids(&doc);

    for (i, &page_id) in page_ids.iter().enumerate() {
        let mediabox = pagetree::page_mediabox(&doc, page_id).ok_or_else(|| {
            ForgeError::operation_failed(format!("page {} has no MediaBox", i + 1))
        })?;

        // PDF coordinates grow upward: the top margin lowers y1 and the
        // bottom margin raises y0.
        let cropped = [
            mediabox[0] + margins.left,
            mediabox[1] + margins.bottom,
            mediabox[2] - margins.right,
            mediabox[3] - margins.top,
        ];

        if cropped[0] >= cropped[2] || cropped[1] >= cropped[3] {
            return Err(ForgeError::invalid_config(format!(
                "margins exceed the size of page {}",
                i + 1
            )));
        }

        let page_obj = doc
            .get_object_mut(page_id)
            .map_err(|e| ForgeError::operation_failed(format!("Failed to get page: {e}")))?;

        if let Object::Dictionary(dict) = page_obj {
            let rect: Vec<Object> = cropped.iter().map(|&v| Object::Real(v)).collect();
            dict.set("CropBox", Object::Array(rect));
        }

        progress.set_fraction(0, 90, i, total_pages);
    }

    PdfWriter::new().save(&doc, output).await?;

    Ok(format!("Cropped {total_pages} pages, saved to {}", output.display()))
}
