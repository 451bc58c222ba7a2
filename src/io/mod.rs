//! Document IO: loading and saving PDFs through lopdf.

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteStatistics};
