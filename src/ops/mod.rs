//! Document operations and their command objects.
//!
//! A host builds an [`OperationRequest`] describing what to do and submits
//! it to the task runner; [`execute`] dispatches to the operation modules.
//! Every operation follows the same call shape: input path(s), output
//! path, typed options, a progress sink, and a human-readable completion
//! message on success.

pub mod compress;
pub mod convert;
pub mod merge;
pub mod ocr;
pub mod organize;
pub(crate) mod pagetree;
pub mod rotate;
pub mod security;
pub mod split;
pub mod stamp;

use std::path::PathBuf;

use crate::config::{
    CompressionLevel, Credentials, Margins, OfficeTarget, PageNumberOptions, RasterFormat,
    Rotation, SplitMode, WatermarkOptions,
};
use crate::error::{ForgeError, Result};
use crate::runner::ProgressSink;

/// A fully-described document operation, ready to execute.
///
/// Requests are plain data: building one performs no IO, and a request
/// can be validated cheaply before a worker picks it up.
#[derive(Debug, Clone)]
pub enum OperationRequest {
    /// Merge `inputs` (in order) into one document.
    Merge {
        /// Input files, at least two.
        inputs: Vec<PathBuf>,
        /// Merged output file.
        output: PathBuf,
    },
    /// Split one document into several files.
    Split {
        /// Input file.
        input: PathBuf,
        /// Directory receiving the generated files.
        output_dir: PathBuf,
        /// How the document is carved up.
        mode: SplitMode,
    },
    /// Delete the pages matched by `pages`.
    DeletePages {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Page-range expression of pages to remove.
        pages: String,
    },
    /// Extract the pages matched by `pages` into a new document.
    ExtractPages {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Page-range expression of pages to keep.
        pages: String,
    },
    /// Rearrange pages; an empty order reverses the document.
    ReorderPages {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Order expression, resolved order-preserving.
        order: String,
    },
    /// Inset the visible area of every page.
    Crop {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Margin insets in points.
        margins: Margins,
    },
    /// Rotate pages by a fixed delta.
    Rotate {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Rotation delta.
        rotation: Rotation,
        /// Page subset; empty selects all pages.
        pages: String,
    },
    /// Re-save with compression.
    Compress {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Aggressiveness.
        level: CompressionLevel,
    },
    /// Stamp a text watermark on every page.
    Watermark {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Watermark text and appearance.
        options: WatermarkOptions,
    },
    /// Stamp page numbers on every page.
    PageNumbers {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Placement and label format.
        options: PageNumberOptions,
    },
    /// Encrypt with AES-256.
    Encrypt {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// User and owner passwords.
        credentials: Credentials,
    },
    /// Remove encryption.
    Decrypt {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Password to authenticate with.
        password: String,
    },
    /// Remove the document information dictionary.
    StripMetadata {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
    },
    /// Render every page to an image file.
    PdfToImages {
        /// Input file.
        input: PathBuf,
        /// Directory receiving the images.
        output_dir: PathBuf,
        /// Render resolution.
        dpi: u32,
        /// Image codec.
        format: RasterFormat,
    },
    /// Assemble images into a PDF, one page each.
    ImagesToPdf {
        /// Image files, in page order.
        inputs: Vec<PathBuf>,
        /// Output file.
        output: PathBuf,
    },
    /// Convert a PDF to an office document.
    PdfToOffice {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Target format.
        target: OfficeTarget,
    },
    /// Convert an office document to PDF.
    OfficeToPdf {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
    },
    /// Recognize a scanned document into a searchable PDF.
    Ocr {
        /// Input file.
        input: PathBuf,
        /// Output file.
        output: PathBuf,
        /// Tesseract language string (e.g. `eng`, `chi_sim+eng`).
        language: String,
    },
}

impl OperationRequest {
    /// Short operation name for logs and display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Merge { .. } => "merge",
            Self::Split { .. } => "split",
            Self::DeletePages { .. } => "delete-pages",
            Self::ExtractPages { .. } => "extract-pages",
            Self::ReorderPages { .. } => "reorder-pages",
            Self::Crop { .. } => "crop",
            Self::Rotate { .. } => "rotate",
            Self::Compress { .. } => "compress",
            Self::Watermark { .. } => "watermark",
            Self::PageNumbers { .. } => "page-numbers",
            Self::Encrypt { .. } => "encrypt",
            Self::Decrypt { .. } => "decrypt",
            Self::StripMetadata { .. } => "strip-metadata",
            Self::PdfToImages { .. } => "pdf-to-images",
            Self::ImagesToPdf { .. } => "images-to-pdf",
            Self::PdfToOffice { .. } => "pdf-to-office",
            Self::OfficeToPdf { .. } => "office-to-pdf",
            Self::Ocr { .. } => "ocr",
        }
    }

    /// Cheap, synchronous validation of the request itself.
    ///
    /// Rejects fully-invalid input (missing required expressions, bad
    /// option ranges, too few inputs) before any document is opened.
    /// Checks that need the document, such as resolving a page expression
    /// against the real page count, happen inside the operation after
    /// loading and before any mutation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Merge { inputs, .. } => {
                if inputs.len() < 2 {
                    return Err(ForgeError::NotEnoughInputs {
                        required: 2,
                        provided: inputs.len(),
                    });
                }
            }
            Self::Split { mode, .. } => mode.validate()?,
            Self::DeletePages { pages, .. } => require_expression(pages, "delete")?,
            Self::ExtractPages { pages, .. } => require_expression(pages, "extract")?,
            Self::Watermark { options, .. } => options.validate()?,
            Self::Encrypt { credentials, .. } => credentials.validate()?,
            Self::PdfToImages { dpi, .. } => {
                if *dpi == 0 {
                    return Err(ForgeError::invalid_config("dpi must be positive"));
                }
            }
            Self::ImagesToPdf { inputs, .. } => {
                if inputs.is_empty() {
                    return Err(ForgeError::NotEnoughInputs {
                        required: 1,
                        provided: 0,
                    });
                }
            }
            Self::Ocr { language, .. } => {
                if language.trim().is_empty() {
                    return Err(ForgeError::invalid_config("OCR language cannot be empty"));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// The page expression is mandatory for delete/extract.
fn require_expression(pages: &str, operation: &str) -> Result<()> {
    if pages.trim().is_empty() {
        return Err(ForgeError::invalid_selection(format!(
            "a page range is required for {operation}"
        )));
    }
    Ok(())
}

/// Execute a request, reporting progress through `sink`.
///
/// Returns the operation's completion message. The final 100% tick is the
/// task runner's responsibility, so callers invoking this directly should
/// call `sink.finish()` themselves on success.
pub async fn execute(request: OperationRequest, sink: &ProgressSink) -> Result<String> {
    log::info!("executing {}", request.name());

    match request {
        OperationRequest::Merge { inputs, output } => merge::run(&inputs, &output, sink).await,
        OperationRequest::Split {
            input,
            output_dir,
            mode,
        } => split::run(&input, &output_dir, &mode, sink).await,
        OperationRequest::DeletePages {
            input,
            output,
            pages,
        } => organize::delete(&input, &output, &pages, sink).await,
        OperationRequest::ExtractPages {
            input,
            output,
            pages,
        } => organize::extract(&input, &output, &pages, sink).await,
        OperationRequest::ReorderPages {
            input,
            output,
            order,
        } => organize::reorder(&input, &output, &order, sink).await,
        OperationRequest::Crop {
            input,
            output,
            margins,
        } => organize::crop(&input, &output, margins, sink).await,
        OperationRequest::Rotate {
            input,
            output,
            rotation,
            pages,
        } => rotate::run(&input, &output, rotation, &pages, sink).await,
        OperationRequest::Compress {
            input,
            output,
            level,
        } => compress::run(&input, &output, level, sink).await,
        OperationRequest::Watermark {
            input,
            output,
            options,
        } => stamp::watermark(&input, &output, &options, sink).await,
        OperationRequest::PageNumbers {
            input,
            output,
            options,
        } => stamp::page_numbers(&input, &output, &options, sink).await,
        OperationRequest::Encrypt {
            input,
            output,
            credentials,
        } => security::encrypt(&input, &output, &credentials, sink).await,
        OperationRequest::Decrypt {
            input,
            output,
            password,
        } => security::decrypt(&input, &output, &password, sink).await,
        OperationRequest::StripMetadata { input, output } => {
            security::strip_metadata(&input, &output, sink).await
        }
        OperationRequest::PdfToImages {
            input,
            output_dir,
            dpi,
            format,
        } => convert::pdf_to_images(&input, &output_dir, dpi, format, sink).await,
        OperationRequest::ImagesToPdf { inputs, output } => {
            convert::images_to_pdf(&inputs, &output, sink).await
        }
        OperationRequest::PdfToOffice {
            input,
            output,
            target,
        } => convert::pdf_to_office(&input, &output, target, sink).await,
        OperationRequest::OfficeToPdf { input, output } => {
            convert::office_to_pdf(&input, &output, sink).await
        }
        OperationRequest::Ocr {
            input,
            output,
            language,
        } => ocr::run(&input, &output, &language, sink).await,
    }
}
