//! Message formatting and display.
//!
//! This module provides formatted output for different message types
//! with support for quiet and verbose modes.
//!
//! # Examples
//!
//! ```
//! use pdfforge::output::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Processing document...");
//! formatter.success("Operation completed");
//! ```

use std::io::{self, Write};

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

/// Output formatter with configurable verbosity.
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Detect if colored output should be used.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Whether non-error output is shown at all.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message. Always displayed.
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message. Always displayed.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug message. Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Print an indented key/value detail line. Verbose mode only.
    pub fn detail(&self, key: &str, value: &str) {
        if self.verbose && !self.quiet {
            println!("  {key}: {value}");
        }
    }

    /// Print a blank line (respects quiet mode).
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print a message with level-appropriate formatting.
    fn print_message(&self, level: MessageLevel, message: &str) {
        let (prefix, color_code) = match level {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"), // Green
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"), // Yellow
            MessageLevel::Error => ("✗ ", "\x1b[31m"),   // Red
            MessageLevel::Debug => ("→ ", "\x1b[36m"),   // Cyan
        };

        let reset = "\x1b[0m";

        let line = if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}{reset}")
        } else {
            format!("{prefix}{message}")
        };

        if level == MessageLevel::Error || level == MessageLevel::Warning {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }

        io::stdout().flush().ok();
    }
}
