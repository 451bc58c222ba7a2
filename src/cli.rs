//! CLI argument parsing for pdfforge.
//!
//! This module defines the command-line interface structure using `clap`.
//! One subcommand maps to one document operation; parsed arguments are
//! converted into an [`OperationRequest`] command object which the task
//! runner executes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{
    CompressionLevel, Credentials, Margins, OfficeTarget, PageNumberOptions, RasterFormat,
    Rotation, SplitMode, StampPosition, WatermarkOptions,
};
use crate::error::{ForgeError, Result};
use crate::ops::OperationRequest;
use crate::utils;

/// PDF toolbox: merge, split, organize, stamp, compress, convert and OCR.
#[derive(Parser, Debug)]
#[command(name = "pdfforge")]
#[command(version)]
#[command(about = "PDF toolbox: merge, split, organize, stamp, compress, convert and OCR")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// The operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output - show detailed information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite existing output files without asking
    #[arg(short, long, global = true)]
    pub force: bool,
}

/// One subcommand per document operation.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge two or more PDFs into a single document
    Merge {
        /// Input PDF files or glob patterns, in merge order
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Split a PDF into several files
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Directory receiving the generated files
        #[arg(short, long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Extract only the pages in this range into one file
        ///
        /// Example: --pages "1-3,5". Without --pages or --every, every
        /// page becomes its own file.
        #[arg(long, value_name = "RANGE", conflicts_with = "every")]
        pages: Option<String>,

        /// Produce one file per N consecutive pages
        #[arg(long, value_name = "N")]
        every: Option<usize>,
    },

    /// Delete pages from a PDF
    Delete {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Pages to delete, e.g. "2,5-7"
        #[arg(long, value_name = "RANGE")]
        pages: String,
    },

    /// Extract pages into a new PDF
    Extract {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Pages to keep, e.g. "1-3,5"
        #[arg(long, value_name = "RANGE")]
        pages: String,
    },

    /// Rearrange the pages of a PDF
    Reorder {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// New page order, e.g. "3,1,2". Omit to reverse the document.
        #[arg(long, value_name = "ORDER", default_value = "")]
        order: String,
    },

    /// Crop page margins
    Crop {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Uniform margin inset in points
        #[arg(long, value_name = "PT", default_value_t = 20.0)]
        margin: f32,
    },

    /// Rotate pages by 90, 180 or 270 degrees
    Rotate {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Rotation angle in degrees
        #[arg(long, value_name = "DEG")]
        angle: u16,

        /// Pages to rotate, e.g. "1-3". Omit to rotate all pages.
        #[arg(long, value_name = "RANGE", default_value = "")]
        pages: String,
    },

    /// Re-save a PDF with compression
    Compress {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Compression level
        #[arg(short, long, value_name = "LEVEL", default_value = "medium")]
        #[arg(value_parser = ["low", "medium", "high", "0", "1", "2"])]
        level: String,
    },

    /// Stamp a text watermark across every page
    Watermark {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Watermark text
        #[arg(long, value_name = "TEXT")]
        text: String,

        /// Fill opacity between 0.0 and 1.0
        #[arg(long, value_name = "ALPHA", default_value_t = 0.3)]
        opacity: f32,

        /// Text angle in degrees
        #[arg(long, value_name = "DEG", default_value_t = 45.0)]
        angle: f32,
    },

    /// Stamp page numbers onto every page
    PageNumbers {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Placement of the number
        #[arg(long, value_name = "POS", default_value = "bottom-center")]
        #[arg(value_parser = ["bottom-center", "bottom-right", "top-center", "top-right"])]
        position: String,

        /// Number assigned to the first page
        #[arg(long, value_name = "N", default_value_t = 1)]
        start: usize,

        /// Label template; {page} and {total} are substituted
        #[arg(long, value_name = "FMT", default_value = "{page}")]
        format: String,
    },

    /// Encrypt a PDF with AES-256
    Encrypt {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// User password (required to open the document)
        #[arg(long, value_name = "PW")]
        password: String,

        /// Owner password (defaults to the user password)
        #[arg(long, value_name = "PW")]
        owner_password: Option<String>,
    },

    /// Remove encryption from a PDF
    Decrypt {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Password to authenticate with
        #[arg(long, value_name = "PW")]
        password: String,
    },

    /// Remove the document information dictionary
    StripMetadata {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Render every page as an image
    ToImages {
        /// Input PDF file
        input: PathBuf,

        /// Directory receiving the images
        #[arg(short, long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Render resolution in DPI
        #[arg(long, value_name = "DPI", default_value_t = 150)]
        dpi: u32,

        /// Image format
        #[arg(long, value_name = "FMT", default_value = "png")]
        #[arg(value_parser = ["png", "jpg", "jpeg"])]
        format: String,
    },

    /// Assemble images into a PDF, one page per image
    FromImages {
        /// Image files or directories to scan for images
        #[arg(required = true, value_name = "PATH")]
        inputs: Vec<PathBuf>,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Convert a PDF to an office document
    ToOffice {
        /// Input PDF file
        input: PathBuf,

        /// Output file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Target format
        #[arg(long, value_name = "FMT")]
        #[arg(value_parser = ["docx", "xlsx", "pptx", "word", "excel", "powerpoint"])]
        target: String,
    },

    /// Convert an office document to PDF
    FromOffice {
        /// Input office document
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Show basic information about a PDF
    Info {
        /// Input PDF file
        input: PathBuf,

        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Recognize a scanned PDF into a searchable PDF
    Ocr {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Recognition language(s), e.g. "eng" or "chi_sim+eng"
        #[arg(long, value_name = "LANG", default_value = "eng")]
        language: String,
    },
}

impl Cli {
    /// Convert parsed arguments into an operation request.
    ///
    /// Expands glob patterns for merge inputs and directory arguments for
    /// image assembly, and parses string-typed options into their enums.
    pub fn to_request(&self) -> Result<OperationRequest> {
        let request = match &self.command {
            Command::Merge { inputs, output } => OperationRequest::Merge {
                inputs: utils::collect_paths_for_patterns(inputs)?,
                output: output.clone(),
            },

            Command::Split {
                input,
                output_dir,
                pages,
                every,
            } => {
                let mode = match (pages, every) {
                    (Some(expression), None) => SplitMode::Range(expression.clone()),
                    (None, Some(n)) => SplitMode::Chunks(*n),
                    (None, None) => SplitMode::EachPage,
                    (Some(_), Some(_)) => {
                        // clap's conflicts_with already prevents this.
                        return Err(ForgeError::invalid_config(
                            "--pages and --every are mutually exclusive",
                        ));
                    }
                };
                OperationRequest::Split {
                    input: input.clone(),
                    output_dir: output_dir.clone(),
                    mode,
                }
            }

            Command::Delete {
                input,
                output,
                pages,
            } => OperationRequest::DeletePages {
                input: input.clone(),
                output: output.clone(),
                pages: pages.clone(),
            },

            Command::Extract {
                input,
                output,
                pages,
            } => OperationRequest::ExtractPages {
                input: input.clone(),
                output: output.clone(),
                pages: pages.clone(),
            },

            Command::Reorder {
                input,
                output,
                order,
            } => OperationRequest::ReorderPages {
                input: input.clone(),
                output: output.clone(),
                order: order.clone(),
            },

            Command::Crop {
                input,
                output,
                margin,
            } => OperationRequest::Crop {
                input: input.clone(),
                output: output.clone(),
                margins: Margins::uniform(*margin),
            },

            Command::Rotate {
                input,
                output,
                angle,
                pages,
            } => OperationRequest::Rotate {
                input: input.clone(),
                output: output.clone(),
                rotation: Rotation::from_degrees(*angle)?,
                pages: pages.clone(),
            },

            Command::Compress {
                input,
                output,
                level,
            } => OperationRequest::Compress {
                input: input.clone(),
                output: output.clone(),
                level: CompressionLevel::from_str(level)?,
            },

            Command::Watermark {
                input,
                output,
                text,
                opacity,
                angle,
            } => OperationRequest::Watermark {
                input: input.clone(),
                output: output.clone(),
                options: WatermarkOptions {
                    text: text.clone(),
                    opacity: *opacity,
                    angle: *angle,
                },
            },

            Command::PageNumbers {
                input,
                output,
                position,
                start,
                format,
            } => OperationRequest::PageNumbers {
                input: input.clone(),
                output: output.clone(),
                options: PageNumberOptions {
                    position: StampPosition::from_str(position)?,
                    start: *start,
                    format: format.clone(),
                },
            },

            Command::Encrypt {
                input,
                output,
                password,
                owner_password,
            } => OperationRequest::Encrypt {
                input: input.clone(),
                output: output.clone(),
                credentials: Credentials {
                    password: password.clone(),
                    owner_password: owner_password.clone(),
                },
            },

            Command::Decrypt {
                input,
                output,
                password,
            } => OperationRequest::Decrypt {
                input: input.clone(),
                output: output.clone(),
                password: password.clone(),
            },

            Command::StripMetadata { input, output } => OperationRequest::StripMetadata {
                input: input.clone(),
                output: output.clone(),
            },

            Command::ToImages {
                input,
                output_dir,
                dpi,
                format,
            } => OperationRequest::PdfToImages {
                input: input.clone(),
                output_dir: output_dir.clone(),
                dpi: *dpi,
                format: RasterFormat::from_str(format)?,
            },

            Command::FromImages { inputs, output } => OperationRequest::ImagesToPdf {
                inputs: expand_image_inputs(inputs)?,
                output: output.clone(),
            },

            Command::ToOffice {
                input,
                output,
                target,
            } => OperationRequest::PdfToOffice {
                input: input.clone(),
                output: output.clone(),
                target: OfficeTarget::from_str(target)?,
            },

            Command::FromOffice { input, output } => OperationRequest::OfficeToPdf {
                input: input.clone(),
                output: output.clone(),
            },

            Command::Ocr {
                input,
                output,
                language,
            } => OperationRequest::Ocr {
                input: input.clone(),
                output: output.clone(),
                language: language.clone(),
            },

            // Inspection is synchronous and host-handled; it never reaches
            // the task runner.
            Command::Info { .. } => {
                return Err(ForgeError::invalid_config(
                    "info is not a background operation",
                ));
            }
        };

        Ok(request)
    }

    /// The single output file of this command, if it has one.
    ///
    /// Multi-output commands (split, to-images) return None; overwrite
    /// protection there is per generated file and left to the operation.
    pub fn single_output(&self) -> Option<&PathBuf> {
        match &self.command {
            Command::Merge { output, .. }
            | Command::Delete { output, .. }
            | Command::Extract { output, .. }
            | Command::Reorder { output, .. }
            | Command::Crop { output, .. }
            | Command::Rotate { output, .. }
            | Command::Compress { output, .. }
            | Command::Watermark { output, .. }
            | Command::PageNumbers { output, .. }
            | Command::Encrypt { output, .. }
            | Command::Decrypt { output, .. }
            | Command::StripMetadata { output, .. }
            | Command::FromImages { output, .. }
            | Command::ToOffice { output, .. }
            | Command::FromOffice { output, .. }
            | Command::Ocr { output, .. } => Some(output),
            Command::Split { .. } | Command::ToImages { .. } | Command::Info { .. } => None,
        }
    }
}

/// Expand from-images inputs: directories are scanned recursively for
/// image files, plain files pass through.
fn expand_image_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();

    for input in inputs {
        if input.is_dir() {
            expanded.extend(utils::collect_image_files(input)?);
        } else {
            expanded.push(input.clone());
        }
    }

    Ok(expanded)
}
