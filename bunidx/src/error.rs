//! Error types for bunidx.
//!
//! This module defines all error types that can occur while building and
//! submitting a bundle index. Errors are designed to be informative and
//! actionable, providing clear context about what went wrong and how to
//! fix it.
//!
//! # Error Categories
//!
//! - **Rejected input**: wrong file type, duplicate filename
//! - **Per-file failures**: unreadable or unparseable PDFs
//! - **Model errors**: unknown entry keys, invalid reorderings
//! - **Submission errors**: transport failures, backend-reported errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bunidx operations.
pub type Result<T> = std::result::Result<T, BunIdxError>;

/// Main error type for bunidx operations.
#[derive(Debug, Error)]
pub enum BunIdxError {
    /// Input file was not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {path}\n  Reason: {source}")]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Input file is not a PDF.
    #[error("Not a PDF file: {name}\n  Only PDF documents can be added to a bundle")]
    NotAPdf {
        /// Original filename of the rejected file.
        name: String,
    },

    /// A file with the same original filename is already in the working set.
    #[error("Duplicate filename: {name}\n  The file is already in the working set and was skipped")]
    DuplicateFilename {
        /// The offending original filename.
        name: String,
    },

    /// Failed to read an input file.
    #[error("Failed to read file: {path}\n  Reason: {source}")]
    FailedToRead {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// PDF metadata (page count) could not be extracted.
    #[error("Failed to parse PDF: {name}\n  Reason: {reason}")]
    FailedToParsePdf {
        /// Original filename of the unparseable file.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// An entry key did not resolve to an entry in the model.
    #[error("No entry found for key: {key}")]
    UnknownEntry {
        /// Display form of the key that failed to resolve.
        key: String,
    },

    /// A reordering was not a permutation of the current entries.
    #[error("Reorder rejected: {details}")]
    ReorderMismatch {
        /// Details about the mismatch.
        details: String,
    },

    /// The working set contains no documents.
    #[error("Working set is empty; add files before building an index")]
    EmptyWorkingSet,

    /// Output file already exists and overwrite is not allowed.
    #[error("Output file already exists: {path}\n  \
             Use --force to overwrite or choose a different output path")]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write an output file.
    #[error("Failed to write to output file: {path}\n  Reason: {source}")]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Submission could not be transported to the bundle service.
    #[error("Submission failed: {message}")]
    SubmissionFailed {
        /// Description of the transport failure.
        message: String,
    },

    /// The bundle service replied with an error status.
    #[error("Bundle service reported an error: {message}")]
    Backend {
        /// Server-provided (or generic) error message.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

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

impl From<reqwest::Error> for BunIdxError {
    fn from(err: reqwest::Error) -> Self {
        Self::SubmissionFailed {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for BunIdxError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl BunIdxError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAPdf error.
    pub fn not_a_pdf(name: impl Into<String>) -> Self {
        Self::NotAPdf { name: name.into() }
    }

    /// Create a DuplicateFilename error.
    pub fn duplicate_filename(name: impl Into<String>) -> Self {
        Self::DuplicateFilename { name: name.into() }
    }

    /// Create a FailedToParsePdf error.
    pub fn failed_to_parse_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToParsePdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownEntry error.
    pub fn unknown_entry(key: impl Into<String>) -> Self {
        Self::UnknownEntry { key: key.into() }
    }

    /// Create a ReorderMismatch error.
    pub fn reorder_mismatch(details: impl Into<String>) -> Self {
        Self::ReorderMismatch {
            details: details.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a SubmissionFailed error.
    pub fn submission_failed(message: impl Into<String>) -> Self {
        Self::SubmissionFailed {
            message: message.into(),
        }
    }

    /// Create a Backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (batch processing can continue).
    ///
    /// Returns true for per-file errors that leave the working set editable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotAPdf { .. }
                | Self::DuplicateFilename { .. }
                | Self::FailedToRead { .. }
                | Self::FailedToParsePdf { .. }
                | Self::SubmissionFailed { .. }
                | Self::Backend { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyWorkingSet | Self::FailedToWrite { .. } | Self::Cancelled
        )
    }

    /// Get the exit code for this error.
    ///
    /// Returns the appropriate process exit code based on error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::FailedToRead { .. } => 2,
            Self::NotAPdf { .. } => 3,
            Self::FailedToParsePdf { .. } => 3,
            Self::DuplicateFilename { .. } => 1,
            Self::UnknownEntry { .. } => 1,
            Self::ReorderMismatch { .. } => 1,
            Self::EmptyWorkingSet => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::SubmissionFailed { .. } => 6,
            Self::Backend { .. } => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
