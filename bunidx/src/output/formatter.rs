//! Message formatting with quiet/verbose awareness.

use std::io::{self, Write};

use crate::config::Config;

/// Severity of a formatted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message, suppressed in quiet mode.
    Info,
    /// Success message, suppressed in quiet mode.
    Success,
    /// Warning, printed to stderr even in quiet mode.
    Warning,
    /// Error, printed to stderr even in quiet mode.
    Error,
}

/// User-facing message formatter.
///
/// Routes messages to stdout or stderr according to their level and the
/// configured quiet/verbose modes. Warnings and errors always reach
/// stderr; everything else is suppressed when quiet.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
}

impl OutputFormatter {
    /// Create a formatter from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet: config.quiet,
            verbose: config.verbose,
        }
    }

    /// Create a formatter that suppresses all non-error output.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            verbose: false,
        }
    }

    /// Check if informational output should be printed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Print an informational message.
    pub fn info(&self, message: &str) {
        self.print(MessageLevel::Info, message);
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        self.print(MessageLevel::Success, message);
    }

    /// Print a warning to stderr.
    pub fn warning(&self, message: &str) {
        self.print(MessageLevel::Warning, message);
    }

    /// Print an error to stderr.
    pub fn error(&self, message: &str) {
        self.print(MessageLevel::Error, message);
    }

    /// Print a section heading.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("=== {title} ===");
        }
    }

    /// Print an indented key/value detail line.
    pub fn detail(&self, key: &str, value: &str) {
        if self.should_print() {
            println!("  {key}: {value}");
        }
    }

    /// Print an empty line.
    pub fn blank_line(&self) {
        if self.should_print() {
            println!();
        }
    }

    fn print(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Info => {
                if self.should_print() {
                    println!("{message}");
                }
            }
            MessageLevel::Success => {
                if self.should_print() {
                    println!("✓ {message}");
                }
            }
            MessageLevel::Warning => {
                let mut stderr = io::stderr();
                let _ = writeln!(stderr, "warning: {message}");
            }
            MessageLevel::Error => {
                let mut stderr = io::stderr();
                let _ = writeln!(stderr, "error: {message}");
            }
        }
    }
}
