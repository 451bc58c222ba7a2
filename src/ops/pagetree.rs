//! Shared page-tree manipulation helpers.
//!
//! Every organizing operation (extract, delete, reorder, split) reduces to
//! the same move: build a new document whose root page tree references a
//! chosen sequence of the source's page objects. These helpers implement
//! that move once, directly on the lopdf object graph.

use lopdf::{Document, Object, ObjectId};

use crate::error::{ForgeError, Result};

/// Page object ids in document page order (index 0 = first page).
pub fn ordered_page_ids(doc: &Document) -> Vec<ObjectId> {
    // get_pages is keyed by 1-based page number; BTreeMap iteration gives
    // document order.
    doc.get_pages().into_values().collect()
}

/// Build a document containing the source's pages at `indices`, in the
/// given order. Duplicate indices duplicate the page reference.
///
/// # Errors
///
/// Returns an error if an index is out of bounds (callers resolve
/// expressions against the real page count first, so this indicates a
/// logic error rather than user input) or the page tree is malformed.
pub fn select_pages(source: &Document, indices: &[usize]) -> Result<Document> {
    let mut doc = source.clone();
    let all_pages = ordered_page_ids(&doc);

    let mut selected = Vec::with_capacity(indices.len());
    for &idx in indices {
        let id = *all_pages.get(idx).ok_or_else(|| {
            ForgeError::invalid_selection(format!("page index {idx} out of bounds"))
        })?;
        selected.push(id);
    }

    let pages_id = root_pages_id(&mut doc)?;

    // Selected pages may come from arbitrary depths of the original tree;
    // they all become direct children of the root pages node.
    for &page_id in &selected {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let pages_obj = doc.get_object_mut(pages_id).map_err(|e| {
        ForgeError::operation_failed(format!("Failed to get pages object: {e}"))
    })?;

    if let Object::Dictionary(dict) = pages_obj {
        let kids: Vec<Object> = selected.iter().map(|&id| Object::Reference(id)).collect();
        dict.set("Kids", Object::Array(kids));
        dict.set("Count", Object::Integer(selected.len() as i64));
    } else {
        return Err(ForgeError::operation_failed(
            "Pages object is not a dictionary",
        ));
    }

    doc.prune_objects();
    doc.renumber_objects();

    Ok(doc)
}

/// Object id of the catalog's root pages node.
pub fn root_pages_id(doc: &mut Document) -> Result<ObjectId> {
    let catalog = doc
        .catalog_mut()
        .map_err(|e| ForgeError::operation_failed(format!("Failed to get catalog: {e}")))?;

    catalog
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| ForgeError::operation_failed(format!("Failed to get pages reference: {e}")))
}

/// Apply a rotation delta to one page, additive modulo 360 on top of the
/// page's current `/Rotate` value.
pub fn rotate_page(doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
    let page_obj = doc
        .get_object_mut(page_id)
        .map_err(|e| ForgeError::operation_failed(format!("Failed to get page: {e}")))?;

    if let Object::Dictionary(dict) = page_obj {
        let current_rotation = dict.get(b"Rotate").and_then(|r| r.as_i64()).unwrap_or(0);
        let new_rotation = (current_rotation + degrees) % 360;
        dict.set("Rotate", Object::Integer(new_rotation));
    } else {
        return Err(ForgeError::operation_failed(
            "Page object is not a dictionary",
        ));
    }

    Ok(())
}

/// Resolve a page's MediaBox, following Parent inheritance.
///
/// Returns `[x0, y0, x1, y1]` or None if no ancestor declares one.
pub fn page_mediabox(doc: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let mut current = page_id;

    // Inheritance chains are shallow in practice; bound the walk so a
    // cyclic Parent reference cannot loop forever.
    for _ in 0..16 {
        let Ok(Object::Dictionary(dict)) = doc.get_object(current) else {
            return None;
        };

        if let Ok(obj) = dict.get(b"MediaBox") {
            let arr = match obj {
                Object::Array(a) => a.clone(),
                Object::Reference(r) => match doc.get_object(*r) {
                    Ok(Object::Array(a)) => a.clone(),
                    _ => return None,
                },
                _ => return None,
            };

            let vals: Vec<f32> = arr.iter().filter_map(|o| o.as_float().ok()).collect();
            if vals.len() >= 4 {
                return Some([vals[0], vals[1], vals[2], vals[3]]);
            }
            return None;
        }

        match dict.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => return None,
        }
    }

    None
}

/// Build a small in-memory test document.
///
/// Page heights encode original positions (700, 701, ...) so reordering
/// tests can identify pages after the tree is rewritten.
#[cfg(test)]
pub(crate) fn create_multi_page_pdf(pages: usize) -> Document {
    use lopdf::dictionary;

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), (700 + i as i64).into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}
