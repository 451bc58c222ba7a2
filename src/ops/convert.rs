//! Format conversion: raster export, image import, office documents.
//!
//! Conversions are delegated to collaborators: `pdftoppm` renders pages to
//! images, LibreOffice (`soffice`) handles office formats in both
//! directions, and `printpdf` assembles image-only PDFs. This module is
//! argument shaping, file accounting, and progress reporting.

use std::path::{Path, PathBuf};

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};

use crate::config::{OfficeTarget, RasterFormat};
use crate::error::{ForgeError, Result};
use crate::runner::ProgressSink;
use crate::utils::run_tool;

const POPPLER_HINT: &str = "install poppler-utils (e.g. 'apt install poppler-utils')";
const SOFFICE_HINT: &str = "install LibreOffice and make sure 'soffice' is on PATH";

/// A4 page size in millimeters.
const PAGE_W_MM: f32 = 210.0;
const PAGE_H_MM: f32 = 297.0;

/// Render every page of `input` as an image file in `output_dir`.
///
/// Files are named `<stem>-<page>.<ext>` by the renderer. The message
/// reports how many files were produced.
pub async fn pdf_to_images(
    input: &Path,
    output_dir: &Path,
    dpi: u32,
    format: RasterFormat,
    progress: &ProgressSink,
) -> Result<String> {
    if dpi == 0 {
        return Err(ForgeError::invalid_config("dpi must be positive"));
    }
    if !input.exists() {
        return Err(ForgeError::file_not_found(input.to_path_buf()));
    }

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir).map_err(|e| ForgeError::FailedToCreateOutput {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page")
        .to_string();
    let prefix = output_dir.join(&stem);

    progress.set(10);

    let dpi_str = dpi.to_string();
    let input_str = input.to_string_lossy().into_owned();
    let prefix_str = prefix.to_string_lossy().into_owned();

    run_tool(
        "pdftoppm",
        &[
            format.pdftoppm_flag(),
            "-r",
            &dpi_str,
            &input_str,
            &prefix_str,
        ],
        POPPLER_HINT,
    )
    .await?;

    progress.set(90);

    let generated = count_generated(output_dir, &stem, format.extension())?;
    if generated == 0 {
        return Err(ForgeError::operation_failed(
            "renderer produced no image files",
        ));
    }

    Ok(format!(
        "Exported {generated} images to {}",
        output_dir.display()
    ))
}

/// Count renderer outputs named `<stem>-*.<ext>`.
fn count_generated(dir: &Path, stem: &str, ext: &str) -> Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(&format!("{stem}-")) && name.ends_with(&format!(".{ext}")) {
            count += 1;
        }
    }
    Ok(count)
}

/// Assemble image files into a PDF, one page per image.
///
/// Images are centered on A4 pages and scaled to fit while preserving
/// aspect ratio.
pub async fn images_to_pdf(
    inputs: &[PathBuf],
    output: &Path,
    progress: &ProgressSink,
) -> Result<String> {
    if inputs.is_empty() {
        return Err(ForgeError::NotEnoughInputs {
            required: 1,
            provided: 0,
        });
    }

    let inputs = inputs.to_vec();
    let output_path = output.to_path_buf();
    let total = inputs.len();

    // Image decoding and PDF assembly are CPU-bound.
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new("Images");
        let mut pages: Vec<PdfPage> = Vec::with_capacity(total);

        for path in &inputs {
            if !path.exists() {
                return Err(ForgeError::file_not_found(path.clone()));
            }

            let image_bytes = std::fs::read(path)?;
            let dynamic_image = image::load_from_memory(&image_bytes).map_err(|err| {
                ForgeError::operation_failed(format!(
                    "failed to decode image {}: {err}",
                    path.display()
                ))
            })?;

            let img_width = dynamic_image.width() as usize;
            let img_height = dynamic_image.height() as usize;

            let rgb_image = dynamic_image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // Scale to fit inside the page margins, never upscale.
            let margin_mm: f32 = 15.0;
            let usable_w_pt = Mm(PAGE_W_MM - 2.0 * margin_mm).into_pt().0;
            let usable_h_pt = Mm(PAGE_H_MM - 2.0 * margin_mm).into_pt().0;

            let dpi: f32 = 150.0;
            let img_w_pt = img_width as f32 / dpi * 72.0;
            let img_h_pt = img_height as f32 / dpi * 72.0;

            let scale = (usable_w_pt / img_w_pt)
                .min(usable_h_pt / img_h_pt)
                .min(1.0);

            let margin_pt = Mm(margin_mm).into_pt().0;
            let x_offset = margin_pt + (usable_w_pt - img_w_pt * scale) / 2.0;
            let y_offset = margin_pt + (usable_h_pt - img_h_pt * scale) / 2.0;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(x_offset)),
                    translate_y: Some(Pt(y_offset)),
                    scale_x: Some(scale),
                    scale_y: Some(scale),
                    dpi: Some(dpi),
                    rotate: None,
                },
            }];

            pages.push(PdfPage::new(Mm(PAGE_W_MM), Mm(PAGE_H_MM), ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(doc.save(&PdfSaveOptions::default(), &mut warnings))
    })
    .await
    .map_err(|e| ForgeError::other(format!("Image task failed: {e}")))??;

    progress.set(90);

    tokio::fs::write(&output_path, &bytes)
        .await
        .map_err(|e| ForgeError::FailedToWrite {
            path: output_path.clone(),
            source: e,
        })?;

    Ok(format!(
        "Converted {total} images into {}",
        output_path.display()
    ))
}

/// Convert a PDF to an office document via LibreOffice.
pub async fn pdf_to_office(
    input: &Path,
    output: &Path,
    target: OfficeTarget,
    progress: &ProgressSink,
) -> Result<String> {
    convert_with_soffice(input, output, target.soffice_filter(), target.extension(), progress)
        .await?;
    Ok(format!("Converted to {}, saved to {}", target.extension(), output.display()))
}

/// Convert an office document to PDF via LibreOffice.
pub async fn office_to_pdf(input: &Path, output: &Path, progress: &ProgressSink) -> Result<String> {
    convert_with_soffice(input, output, "pdf", "pdf", progress).await?;
    Ok(format!("Converted to PDF, saved to {}", output.display()))
}

/// Shared `soffice --headless --convert-to` invocation.
///
/// LibreOffice always names its output `<stem>.<ext>` inside `--outdir`,
/// so the result is renamed onto the requested output path afterwards.
async fn convert_with_soffice(
    input: &Path,
    output: &Path,
    filter: &str,
    extension: &str,
    progress: &ProgressSink,
) -> Result<()> {
    if !input.exists() {
        return Err(ForgeError::file_not_found(input.to_path_buf()));
    }

    let out_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    if !out_dir.exists() {
        std::fs::create_dir_all(&out_dir).map_err(|e| ForgeError::FailedToCreateOutput {
            path: out_dir.clone(),
            source: e,
        })?;
    }

    progress.set(10);

    let input_str = input.to_string_lossy().into_owned();
    let out_dir_str = out_dir.to_string_lossy().into_owned();

    run_tool(
        "soffice",
        &[
            "--headless",
            "--convert-to",
            filter,
            "--outdir",
            &out_dir_str,
            &input_str,
        ],
        SOFFICE_HINT,
    )
    .await?;

    progress.set(85);

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let produced = out_dir.join(format!("{stem}.{extension}"));

    if produced != output {
        if !produced.exists() {
            return Err(ForgeError::operation_failed(format!(
                "converter did not produce {}",
                produced.display()
            )));
        }
        std::fs::rename(&produced, output).map_err(|e| ForgeError::FailedToWrite {
            path: output.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}
