//! Stamp text onto pages: watermarks and page numbers.
//!
//! Stamping appends a new content stream to each page rather than editing
//! the existing ones, and registers the needed Font/ExtGState resources on
//! the page's resource dictionary (inline or indirect).

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

use crate::config::{PageNumberOptions, StampPosition, WatermarkOptions};
use crate::error::{ForgeError, Result};
use crate::io::{PdfReader, PdfWriter};
use crate::ops::pagetree;
use crate::runner::ProgressSink;

const FONT_KEY: &str = "FgF1";
const GS_KEY: &str = "FgGS1";

/// Stamp a diagonal text watermark across every page.
pub async fn watermark(
    input: &Path,
    output: &Path,
    options: &WatermarkOptions,
    progress: &ProgressSink,
) -> Result<String> {
    options.validate()?;

    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;
    let total_pages = loaded.page_count;

    let font_id = add_helvetica(&mut doc);
    let gs_id = doc.add_object(Object::Dictionary(dictionary! {
        "Type" => "ExtGState",
        "ca" => Object::Real(options.opacity),
        "CA" => Object::Real(options.opacity),
    }));

    let page_ids = pagetree::ordered_page_ids(&doc);

    for (i, &page_id) in page_ids.iter().enumerate() {
        let [x0, y0, x1, y1] =
            pagetree::page_mediabox(&doc, page_id).unwrap_or([0.0, 0.0, 612.0, 792.0]);
        let center_x = (x0 + x1) / 2.0;
        let center_y = (y0 + y1) / 2.0;

        let radians = options.angle.to_radians();
        let (sin, cos) = radians.sin_cos();

        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![GS_KEY.into()]),
            Operation::new("g", vec![Object::Real(0.5)]),
        ];

        // Three stamps cover tall pages: center, above, below.
        for offset in [0.0_f32, -200.0, 200.0] {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![FONT_KEY.into(), 60.into()]),
                Operation::new(
                    "Tm",
                    vec![
                        Object::Real(cos),
                        Object::Real(sin),
                        Object::Real(-sin),
                        Object::Real(cos),
                        Object::Real(center_x),
                        Object::Real(center_y + offset),
                    ],
                ),
                Operation::new("Tj", vec![Object::string_literal(options.text.as_str())]),
                Operation::new("ET", vec![]),
            ]);
        }

        operations.push(Operation::new("Q", vec![]));

        attach_resources(&mut doc, page_id, font_id, Some(gs_id))?;
        append_content(&mut doc, page_id, operations)?;

        progress.set_fraction(0, 90, i, total_pages);
    }

    PdfWriter::new().save(&doc, output).await?;

    Ok(format!("Watermark added, saved to {}", output.display()))
}

/// Stamp a page number label onto every page.
pub async fn page_numbers(
    input: &Path,
    output: &Path,
    options: &PageNumberOptions,
    progress: &ProgressSink,
) -> Result<String> {
    let loaded = PdfReader::new().load(input).await?;
    let mut doc = loaded.document;
    let total_pages = loaded.page_count;

    let font_id = add_helvetica(&mut doc);
    let page_ids = pagetree::ordered_page_ids(&doc);

    let margin = 30.0_f32;
    let fontsize = 12.0_f32;

    for (i, &page_id) in page_ids.iter().enumerate() {
        let [x0, y0, x1, y1] =
            pagetree::page_mediabox(&doc, page_id).unwrap_or([0.0, 0.0, 612.0, 792.0]);
        let width = x1 - x0;

        let x = match options.position {
            StampPosition::BottomCenter | StampPosition::TopCenter => x0 + width / 2.0,
            StampPosition::BottomRight | StampPosition::TopRight => x1 - margin,
        };
        // PDF y grows upward; "top" positions sit below the upper edge.
        let y = match options.position {
            StampPosition::BottomCenter | StampPosition::BottomRight => y0 + margin,
            StampPosition::TopCenter | StampPosition::TopRight => y1 - margin - fontsize,
        };

        let label = options.label(options.start + i, total_pages);

        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new("g", vec![Object::Real(0.0)]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_KEY.into(), Object::Real(fontsize)]),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(label.as_str())]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];

        attach_resources(&mut doc, page_id, font_id, None)?;
        append_content(&mut doc, page_id, operations)?;

        progress.set_fraction(0, 90, i, total_pages);
    }

    PdfWriter::new().save(&doc, output).await?;

    Ok(format!("Page numbers added, saved to {}", output.display()))
}

/// Register the built-in Helvetica font object.
fn add_helvetica(doc: &mut Document) -> ObjectId {
    doc.add_object(Object::Dictionary(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    }))
}

/// Ensure a page's resource dictionary references the stamp font (and
/// graphics state, when given) under this module's keys.
///
/// Handles inline and indirect resource dictionaries; an indirect one is
/// updated in place so pages sharing it agree on the new entries.
fn attach_resources(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    gs_id: Option<ObjectId>,
) -> Result<()> {
    // Phase 1: locate and snapshot the current resources.
    enum Location {
        Inline,
        Indirect(ObjectId),
        Missing,
    }

    let (location, mut resources) = {
        let page_dict = page_dictionary(doc, page_id)?;
        match page_dict.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => (Location::Inline, dict.clone()),
            Ok(Object::Reference(r)) => {
                let r = *r;
                match doc.get_object(r) {
                    Ok(Object::Dictionary(dict)) => (Location::Indirect(r), dict.clone()),
                    _ => (Location::Indirect(r), Dictionary::new()),
                }
            }
            _ => (Location::Missing, Dictionary::new()),
        }
    };

    // Phase 2: merge our entries into the snapshot.
    insert_resource_entry(doc, &mut resources, "Font", FONT_KEY, font_id);
    if let Some(gs_id) = gs_id {
        insert_resource_entry(doc, &mut resources, "ExtGState", GS_KEY, gs_id);
    }

    // Phase 3: write the snapshot back where it came from.
    match location {
        Location::Indirect(r) => {
            let obj = doc
                .get_object_mut(r)
                .map_err(|e| ForgeError::operation_failed(format!("bad resources ref: {e}")))?;
            *obj = Object::Dictionary(resources);
        }
        Location::Inline | Location::Missing => {
            let page_dict = page_dictionary_mut(doc, page_id)?;
            page_dict.set("Resources", Object::Dictionary(resources));
        }
    }

    Ok(())
}

/// Insert `key => Reference(target)` into the `category` sub-dictionary of
/// a resources dictionary, preserving existing entries. An indirect
/// sub-dictionary is flattened inline with its entries copied over.
fn insert_resource_entry(
    doc: &Document,
    resources: &mut Dictionary,
    category: &str,
    key: &str,
    target: ObjectId,
) {
    let mut sub = match resources.get(category.as_bytes()) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(r)) => match doc.get_object(*r) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };

    sub.set(key, Object::Reference(target));
    resources.set(category, Object::Dictionary(sub));
}

/// Append a content stream holding `operations` to a page.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<()> {
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| ForgeError::operation_failed(format!("failed to encode content: {e}")))?;

    let stream_id = doc.add_object(Object::Stream(Stream::new(Dictionary::new(), encoded)));

    let page_dict = page_dictionary_mut(doc, page_id)?;

    let new_contents = match page_dict.get(b"Contents") {
        Ok(Object::Reference(existing)) => Object::Array(vec![
            Object::Reference(*existing),
            Object::Reference(stream_id),
        ]),
        Ok(Object::Array(array)) => {
            let mut array = array.clone();
            array.push(Object::Reference(stream_id));
            Object::Array(array)
        }
        _ => Object::Reference(stream_id),
    };

    page_dict.set("Contents", new_contents);
    Ok(())
}

fn page_dictionary(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    match doc.get_object(page_id) {
        Ok(Object::Dictionary(dict)) => Ok(dict),
        _ => Err(ForgeError::operation_failed("Page object is not a dictionary")),
    }
}

fn page_dictionary_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    match doc.get_object_mut(page_id) {
        Ok(Object::Dictionary(dict)) => Ok(dict),
        _ => Err(ForgeError::operation_failed("Page object is not a dictionary")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::pagetree::{create_multi_page_pdf, ordered_page_ids};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_pdf(dir: &TempDir, pages: usize) -> PathBuf {
        let path = dir.path().join("in.pdf");
        create_multi_page_pdf(pages).save(&path).unwrap();
        path
    }

    fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> &'a Dictionary {
        let Ok(Object::Dictionary(page)) = doc.get_object(page_id) else {
            panic!("page is not a dictionary");
        };
        match page.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict,
            Ok(Object::Reference(r)) => match doc.get_object(*r) {
                Ok(Object::Dictionary(dict)) => dict,
                _ => panic!("bad resources reference"),
            },
            _ => panic!("page has no resources"),
        }
    }

    #[tokio::test]
    async fn test_watermark_stamps_every_page() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 3);
        let output = dir.path().join("out.pdf");

        let options = WatermarkOptions {
            text: "CONFIDENTIAL".into(),
            ..Default::default()
        };

        let message = watermark(&input, &output, &options, &ProgressSink::discard())
            .await
            .unwrap();
        assert!(message.contains("Watermark added"));

        let doc = lopdf::Document::load(&output).unwrap();
        for &page_id in &ordered_page_ids(&doc) {
            // Every page gained a content stream and the stamp resources.
            let Ok(Object::Dictionary(page)) = doc.get_object(page_id) else {
                panic!("page is not a dictionary");
            };
            assert!(page.get(b"Contents").is_ok());

            let resources = page_resources(&doc, page_id);
            let Ok(Object::Dictionary(fonts)) = resources.get(b"Font") else {
                panic!("no Font resources");
            };
            assert!(fonts.get(FONT_KEY.as_bytes()).is_ok());

            let Ok(Object::Dictionary(gs)) = resources.get(b"ExtGState") else {
                panic!("no ExtGState resources");
            };
            assert!(gs.get(GS_KEY.as_bytes()).is_ok());
        }
    }

    #[tokio::test]
    async fn test_watermark_rejects_empty_text() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 1);
        let output = dir.path().join("out.pdf");

        let options = WatermarkOptions {
            text: "  ".into(),
            ..Default::default()
        };

        let result = watermark(&input, &output, &options, &ProgressSink::discard()).await;
        assert!(matches!(result, Err(ForgeError::InvalidConfig { .. })));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_page_numbers_label_contents() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 2);
        let output = dir.path().join("out.pdf");

        let options = PageNumberOptions {
            format: "Page {page} of {total}".into(),
            ..Default::default()
        };

        page_numbers(&input, &output, &options, &ProgressSink::discard())
            .await
            .unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        let ids = ordered_page_ids(&doc);

        let content = doc.get_page_content(ids[0]).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("Page 1 of 2"));

        let content = doc.get_page_content(ids[1]).unwrap();
        let text = String::from_utf8_lossy(&content);
        assert!(text.contains("Page 2 of 2"));
    }

    #[tokio::test]
    async fn test_page_numbers_custom_start() {
        let dir = TempDir::new().unwrap();
        let input = write_pdf(&dir, 1);
        let output = dir.path().join("out.pdf");

        let options = PageNumberOptions {
            start: 5,
            ..Default::default()
        };

        page_numbers(&input, &output, &options, &ProgressSink::discard())
            .await
            .unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        let ids = ordered_page_ids(&doc);
        let content = doc.get_page_content(ids[0]).unwrap();
        assert!(String::from_utf8_lossy(&content).contains('5'));
    }
}
