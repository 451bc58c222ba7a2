//! Progress reporting for long-running operations.
//!
//! Operations report coarse percentage checkpoints as they work. The sink
//! enforces the host-facing contract so individual operations don't have
//! to: values are clamped to `[0, 100]` and never decrease, and the final
//! `100` is emitted exactly once on success by the task runner.

use std::sync::atomic::{AtomicU8, Ordering};

/// Callback type invoked with each forwarded percentage.
type ProgressFn = Box<dyn Fn(u8) + Send + Sync>;

/// A monotonic, clamped progress sink.
///
/// Safe to share across threads; operations only ever ratchet the value
/// upward. Ticks are not guaranteed to be evenly spaced.
pub struct ProgressSink {
    last: AtomicU8,
    notify: ProgressFn,
}

impl ProgressSink {
    /// Create a sink forwarding ticks to the given callback.
    pub fn new(notify: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            last: AtomicU8::new(0),
            notify: Box::new(notify),
        }
    }

    /// Create a sink that drops all ticks. Useful in tests and for
    /// callers that don't care about progress.
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    /// Report an absolute percentage.
    ///
    /// Values above 100 are clamped; values at or below the last reported
    /// percentage are dropped so observers see a non-decreasing stream.
    pub fn set(&self, percent: u8) {
        let percent = percent.min(100);

        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            if percent <= current {
                return;
            }
            match self.last.compare_exchange_weak(
                current,
                percent,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        (self.notify)(percent);
    }

    /// Report progress through an item loop as a slice of the total bar.
    ///
    /// After finishing item `index` (zero-based) of `count`, the reported
    /// value is `base + (index + 1) / count * span`. Mirrors the
    /// checkpoint style of per-page loops (e.g. 20..90).
    pub fn set_fraction(&self, base: u8, span: u8, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        let slice = (span as usize * (index + 1)) / count;
        self.set(base.saturating_add(slice as u8));
    }

    /// Emit the terminal 100% tick.
    pub fn finish(&self) {
        self.set(100);
    }

    /// The last percentage forwarded, 0 if none yet.
    pub fn last(&self) -> u8 {
        self.last.load(Ordering::Relaxed)
    }
}
