//! pdfforge - PDF toolbox.
//!
//! This library exposes the building blocks behind the `pdfforge` CLI:
//!
//! - Page-range resolution shared by every page-selecting operation
//! - Typed operation requests (command objects) and their implementations:
//!   merge, split, delete/extract/reorder/crop, rotate, compress,
//!   watermark and page numbers, encrypt/decrypt, format conversion, OCR
//! - A task runner executing one operation per session in the background,
//!   posting progress ticks (0-100) and a single terminal event
//! - PDF IO helpers with atomic writes
//!
//! Page manipulation is delegated to `lopdf`; rendering, office
//! conversion, encryption and recognition are delegated to external
//! collaborators (`pdftoppm`, `soffice`, `qpdf`, `tesseract`).
//!
//! # Examples
//!
//! ```no_run
//! use pdfforge::ops::OperationRequest;
//! use pdfforge::runner::TaskRunner;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = TaskRunner::new();
//! let message = runner
//!     .run(
//!         OperationRequest::ExtractPages {
//!             input: PathBuf::from("report.pdf"),
//!             output: PathBuf::from("summary.pdf"),
//!             pages: "1-3,7".into(),
//!         },
//!         |percent| println!("{percent}%"),
//!     )
//!     .await?;
//! println!("{message}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod error;
pub mod inspect;
pub mod io;
pub mod ops;
pub mod output;
pub mod pages;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use error::{ForgeError, Result};
pub use ops::OperationRequest;
pub use runner::{OperationEvent, SessionState, TaskRunner};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
