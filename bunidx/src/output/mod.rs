//! Output formatting and display for bunidx.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Ingestion progress and summaries
//! - Error and warning display
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use bunidx::output::OutputFormatter;
//! use bunidx::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Reading input files...");
//! formatter.success("Index written");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::IngestProgress;

use crate::config::Config;
use crate::ingest::IngestStatistics;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Display an ingestion summary to the user.
pub fn display_ingest_statistics(formatter: &OutputFormatter, stats: &IngestStatistics) {
    if stats.duplicates > 0 {
        formatter.warning(&format!(
            "Skipped {} duplicate file(s)",
            stats.duplicates
        ));
    }
    if stats.rejected > 0 {
        formatter.warning(&format!(
            "Skipped {} non-PDF file(s)",
            stats.rejected
        ));
    }
    if stats.failures > 0 {
        formatter.warning(&format!(
            "Failed to read {} file(s)",
            stats.failures
        ));
    }

    formatter.info(&format!(
        "Ingested {} document(s), {} page(s) total",
        stats.accepted, stats.total_pages
    ));
}
