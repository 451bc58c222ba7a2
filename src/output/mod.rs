//! User-facing output: status messages and progress display.

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::ProgressBar;
