//! Inline progress reporting for ingestion.

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// A single-line `[n/total] name` counter written to stderr.
///
/// Redraws in place when stderr is a terminal; stays silent otherwise so
/// piped output is not polluted. Updates are rate limited, except for the
/// final item which always renders.
pub struct IngestProgress {
    total: usize,
    enabled: bool,
    last_draw: Option<Instant>,
    min_interval: Duration,
}

impl IngestProgress {
    /// Create a progress counter over `total` items.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            enabled: io::stderr().is_terminal(),
            last_draw: None,
            min_interval: Duration::from_millis(50),
        }
    }

    /// Create a counter that never draws.
    pub fn disabled() -> Self {
        let mut progress = Self::new(0);
        progress.enabled = false;
        progress
    }

    /// Record completion of item `index` (0-based) labelled `name`.
    pub fn tick(&mut self, index: usize, name: &str) {
        if !self.enabled {
            return;
        }

        let done = index + 1;
        let is_last = done == self.total;
        let due = self
            .last_draw
            .is_none_or(|at| at.elapsed() >= self.min_interval);
        if !due && !is_last {
            return;
        }
        self.last_draw = Some(Instant::now());

        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r\x1b[2K[{done}/{}] {name}", self.total);
        let _ = stderr.flush();
    }

    /// Clear the progress line.
    pub fn finish(&mut self) {
        if !self.enabled {
            return;
        }
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}
