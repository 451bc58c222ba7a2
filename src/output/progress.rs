//! Terminal progress bar.
//!
//! Renders the 0-100 progress ticks posted by the task runner as a
//! classic bar. Redraws are rate-limited so rapid ticks don't flood the
//! terminal, and output is disabled entirely when stdout is not a TTY.

use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Percent-driven progress bar for long-running operations.
pub struct ProgressBar {
    /// Current progress in percent.
    current: u8,
    /// Optional message shown before the bar.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Last redraw time (for rate limiting).
    last_update: Instant,
    /// Minimum time between redraws.
    update_interval: Duration,
    /// Whether the bar renders at all.
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar; enabled only on a terminal.
    pub fn new() -> Self {
        Self {
            current: 0,
            message: None,
            start_time: Instant::now(),
            last_update: Instant::now() - Duration::from_secs(1),
            update_interval: Duration::from_millis(100),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut bar = Self::new();
        bar.enabled = false;
        bar
    }

    /// Check if stdout is a terminal.
    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Set the message displayed with the bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Update the bar to an absolute percentage.
    pub fn update(&mut self, percent: u8) {
        self.current = percent.min(100);

        // Rate limit redraws, but never skip the terminal tick.
        if self.last_update.elapsed() < self.update_interval && self.current < 100 {
            return;
        }

        self.last_update = Instant::now();
        self.render();
    }

    /// Complete the bar and move to the next line.
    pub fn finish(&mut self) {
        if self.enabled {
            self.current = 100;
            self.render();
            println!();
        }
    }

    /// Clear the bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    /// Render the bar.
    fn render(&self) {
        if !self.enabled {
            return;
        }

        let width = 40usize;
        let filled = width * self.current as usize / 100;
        let empty = width - filled;

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let elapsed = format_duration(self.start_time.elapsed());

        let mut parts = vec![bar, format!("{}%", self.current), elapsed];
        if let Some(ref msg) = self.message {
            parts.insert(0, msg.clone());
        }

        print!("\r{}", parts.join(" "));
        io::stdout().flush().ok();
    }

    /// Current percentage.
    pub fn percent(&self) -> u8 {
        self.current
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
