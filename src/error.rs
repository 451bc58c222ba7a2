//! Error types for pdfforge.
//!
//! This module defines all error types that can occur during PDF operations.
//! Errors are designed to be informative and actionable, providing clear
//! context about what went wrong and how to fix it.
//!
//! # Error Categories
//!
//! - **I/O Errors**: File not found, permission denied, etc.
//! - **PDF Errors**: Invalid PDF structure, corrupted or encrypted files
//! - **Selection Errors**: Page-range expressions that resolve to nothing
//! - **Tool Errors**: Missing or failing external collaborators
//! - **Session Errors**: Invalid operation sequencing

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Result type alias for pdfforge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Main error type for pdfforge operations.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Failed to load a PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is corrupted or has invalid structure.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// PDF file is encrypted and cannot be processed directly.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: decrypt it first with 'pdfforge decrypt --password <pw>'",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// A page-range expression resolved to an empty selection.
    #[error(
        "Invalid page range '{expression}' for a {total_pages}-page document: \
         no pages selected"
    )]
    EmptySelection {
        /// The expression as the user entered it.
        expression: String,
        /// Total pages in the document.
        total_pages: usize,
    },

    /// The requested selection is not allowed for this operation.
    #[error("Invalid selection: {reason}")]
    InvalidSelection {
        /// Why the selection was rejected.
        reason: String,
    },

    /// Fewer input files than the operation requires.
    #[error("Not enough input files: {required} required, {provided} provided")]
    NotEnoughInputs {
        /// Minimum number of inputs for the operation.
        required: usize,
        /// Number of inputs actually provided.
        provided: usize,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create the output file or directory.
    #[error("Failed to create output: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An external tool required by this operation is not installed.
    #[error("Required tool '{tool}' was not found on PATH\n  Hint: {hint}")]
    ToolMissing {
        /// Name of the missing executable.
        tool: String,
        /// Installation hint for the user.
        hint: String,
    },

    /// An external tool ran but reported failure.
    #[error("Tool '{tool}' failed ({status})\n  {stderr}")]
    ToolFailed {
        /// Name of the executable.
        tool: String,
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A document operation failed mid-flight.
    #[error("Operation failed: {reason}")]
    OperationFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration or option combination.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// An operation was submitted while another is still running.
    #[error("An operation is already in progress for this session")]
    OperationInFlight,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for ForgeError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for ForgeError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl ForgeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an EmptySelection error.
    pub fn empty_selection(expression: impl Into<String>, total_pages: usize) -> Self {
        Self::EmptySelection {
            expression: expression.into(),
            total_pages,
        }
    }

    /// Create an InvalidSelection error.
    pub fn invalid_selection(reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an OperationFailed error.
    pub fn operation_failed(reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a ToolMissing error.
    pub fn tool_missing(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ToolMissing {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is a fast, synchronous input rejection.
    ///
    /// Such errors are reported before any document is opened or mutated.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection { .. }
                | Self::InvalidSelection { .. }
                | Self::NotEnoughInputs { .. }
                | Self::InvalidConfig { .. }
                | Self::OperationInFlight
        )
    }

    /// Get the exit code for this error.
    ///
    /// Returns the appropriate process exit code based on error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::EmptySelection { .. } => 1,
            Self::InvalidSelection { .. } => 1,
            Self::NotEnoughInputs { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::ToolMissing { .. } => 7,
            Self::ToolFailed { .. } => 6,
            Self::OperationFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::OperationInFlight => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
