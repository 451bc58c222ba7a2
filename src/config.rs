//! Option types for pdfforge operations.
//!
//! This module defines the typed options every operation request carries.
//! CLI arguments are parsed into these types up front so that invalid
//! combinations are rejected before any document is opened:
//! - Enumerated settings with `FromStr` implementations
//! - Range checks (opacity, rotation angles, chunk sizes)
//! - Defaults matching the interactive tool's behavior

use std::path::Path;
use std::str::FromStr;

use crate::error::ForgeError;

/// Compression aggressiveness for re-saved documents.
///
/// Mirrors the three-step setting of the interactive tool: `0`/`low`,
/// `1`/`medium`, `2`/`high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Light cleanup only - preserves exact stream contents.
    Low,
    /// Balanced compression - good trade-off between size and time.
    #[default]
    Medium,
    /// Maximum compression - stream deflate plus unused-object pruning.
    High,
}

impl FromStr for CompressionLevel {
    type Err = ForgeError;

    /// Parse a compression level from `low`/`medium`/`high` or `0`/`1`/`2`.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "0" | "low" => Ok(Self::Low),
            "1" | "medium" => Ok(Self::Medium),
            "2" | "high" => Ok(Self::High),
            _ => Err(ForgeError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: low, medium, high (or 0-2)"
                ),
            }),
        }
    }
}

/// Page rotation delta in degrees, applied additively modulo 360.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Clockwise270,
}

impl Rotation {
    /// Parse rotation from degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the degrees value is not 90, 180, or 270.
    pub fn from_degrees(degrees: u16) -> crate::Result<Self> {
        match degrees {
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(ForgeError::invalid_config(format!(
                "Invalid rotation: {degrees}. Must be 90, 180, or 270"
            ))),
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> i64 {
        match self {
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }
}

/// How a document is carved up by the split operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// One output file per page.
    EachPage,
    /// A single output containing the pages matched by a range expression.
    Range(String),
    /// One output file per run of `n` consecutive pages.
    Chunks(usize),
}

impl SplitMode {
    /// Validate mode-specific constraints.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero chunk size.
    pub fn validate(&self) -> crate::Result<()> {
        if let Self::Chunks(0) = self {
            return Err(ForgeError::invalid_config(
                "Chunk size must be at least 1 page",
            ));
        }
        Ok(())
    }
}

/// Corner/edge anchor for stamped page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StampPosition {
    /// Bottom edge, horizontally centered.
    #[default]
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
    /// Top edge, horizontally centered.
    TopCenter,
    /// Top-right corner.
    TopRight,
}

impl FromStr for StampPosition {
    type Err = ForgeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "bottom-center" | "bc" => Ok(Self::BottomCenter),
            "bottom-right" | "br" => Ok(Self::BottomRight),
            "top-center" | "tc" => Ok(Self::TopCenter),
            "top-right" | "tr" => Ok(Self::TopRight),
            _ => Err(ForgeError::InvalidConfig {
                message: format!(
                    "Invalid position: {s}. Must be one of: \
                     bottom-center, bottom-right, top-center, top-right"
                ),
            }),
        }
    }
}

/// Options for the text watermark operation.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    /// Watermark text, stamped across each page.
    pub text: String,
    /// Fill opacity in `[0.0, 1.0]`.
    pub opacity: f32,
    /// Counter-clockwise text angle in degrees.
    pub angle: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            opacity: 0.3,
            angle: 45.0,
        }
    }
}

impl WatermarkOptions {
    /// Validate the watermark settings.
    ///
    /// # Errors
    ///
    /// Returns an error for empty text or an out-of-range opacity.
    pub fn validate(&self) -> crate::Result<()> {
        if self.text.trim().is_empty() {
            return Err(ForgeError::invalid_config("Watermark text cannot be empty"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ForgeError::invalid_config(format!(
                "Opacity must be between 0.0 and 1.0, got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

/// Options for stamping page numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNumberOptions {
    /// Where on the page the number is placed.
    pub position: StampPosition,
    /// Number assigned to the first page.
    pub start: usize,
    /// Label template; `{page}` and `{total}` are substituted.
    pub format: String,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            position: StampPosition::BottomCenter,
            start: 1,
            format: "{page}".to_string(),
        }
    }
}

impl PageNumberOptions {
    /// Render the label for one page.
    pub fn label(&self, page: usize, total: usize) -> String {
        self.format
            .replace("{page}", &page.to_string())
            .replace("{total}", &total.to_string())
    }
}

/// Raster codec for page image export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// Lossless PNG output.
    #[default]
    Png,
    /// JPEG output, smaller files.
    Jpeg,
}

impl RasterFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Format flag understood by `pdftoppm`.
    pub fn pdftoppm_flag(&self) -> &'static str {
        match self {
            Self::Png => "-png",
            Self::Jpeg => "-jpeg",
        }
    }
}

impl FromStr for RasterFormat {
    type Err = ForgeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(ForgeError::InvalidConfig {
                message: format!("Invalid image format: {s}. Must be png or jpeg"),
            }),
        }
    }
}

/// Office document target for PDF conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficeTarget {
    /// Word document.
    Docx,
    /// Excel workbook.
    Xlsx,
    /// PowerPoint presentation.
    Pptx,
}

impl OfficeTarget {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Pptx => "pptx",
        }
    }

    /// Conversion filter name passed to `soffice --convert-to`.
    pub fn soffice_filter(&self) -> &'static str {
        match self {
            Self::Docx => "docx:MS Word 2007 XML",
            Self::Xlsx => "xlsx:Calc MS Excel 2007 XML",
            Self::Pptx => "pptx:Impress MS PowerPoint 2007 XML",
        }
    }
}

impl FromStr for OfficeTarget {
    type Err = ForgeError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "docx" | "word" => Ok(Self::Docx),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "pptx" | "ppt" | "powerpoint" => Ok(Self::Pptx),
            _ => Err(ForgeError::InvalidConfig {
                message: format!("Invalid office target: {s}. Must be docx, xlsx, or pptx"),
            }),
        }
    }
}

/// Credentials for encryption and decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User password (required to open the document).
    pub password: String,
    /// Owner password (required to edit); defaults to the user password.
    pub owner_password: Option<String>,
}

impl Credentials {
    /// Effective owner password.
    pub fn owner(&self) -> &str {
        self.owner_password.as_deref().unwrap_or(&self.password)
    }

    /// Validate the credentials for encryption use.
    ///
    /// # Errors
    ///
    /// Returns an error if the user password is empty.
    pub fn validate(&self) -> crate::Result<()> {
        if self.password.is_empty() {
            return Err(ForgeError::invalid_config("Password cannot be empty"));
        }
        Ok(())
    }
}

/// Page margin insets, in PDF points, used by the crop operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Left inset.
    pub left: f32,
    /// Top inset.
    pub top: f32,
    /// Right inset.
    pub right: f32,
    /// Bottom inset.
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 20.0,
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
        }
    }
}

impl Margins {
    /// Uniform margins on all four sides.
    pub fn uniform(inset: f32) -> Self {
        Self {
            left: inset,
            top: inset,
            right: inset,
            bottom: inset,
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Ensure an output path is acceptable for the chosen overwrite mode.
///
/// Prompting is the host's job; at this layer `Prompt` behaves like
/// `NoClobber` so a script never destroys data silently.
pub fn check_overwrite(path: &Path, mode: OverwriteMode) -> crate::Result<()> {
    if path.exists() && mode != OverwriteMode::Force {
        return Err(ForgeError::output_exists(path.to_path_buf()));
    }
    Ok(())
}
