//! Shared helpers for integration tests.
//!
//! Tests generate their own fixture documents with lopdf so no binary
//! files are checked in and no external tools are required.

use lopdf::{Document, Object, dictionary};
use std::path::PathBuf;
use tempfile::TempDir;

/// Build an in-memory document with the given number of pages.
///
/// Each page's MediaBox height encodes its original position (700 + i),
/// so tests can verify page identity after reordering or splitting.
pub fn build_pdf(pages: usize) -> Document {
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

/// Write a generated document into the temp dir and return its path.
pub fn write_pdf(dir: &TempDir, name: &str, pages: usize) -> PathBuf {
    let path = dir.path().join(name);
    build_pdf(pages).save(&path).unwrap();
    path
}

/// Load a written PDF and return its page count.
pub fn page_count(path: &std::path::Path) -> usize {
    Document::load(path).unwrap().get_pages().len()
}

/// Heights of the pages in document order; identifies source pages.
pub fn page_heights(path: &std::path::Path) -> Vec<f32> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let Ok(Object::Dictionary(dict)) = doc.get_object(page_id) else {
                panic!("page is not a dictionary");
            };
            match dict.get(b"MediaBox") {
                Ok(Object::Array(arr)) => arr[3].as_float().unwrap(),
                _ => panic!("page has no MediaBox"),
            }
        })
        .collect()
}
