//! File ingestion into the working set.
//!
//! Ingestion takes raw PDF files and turns them into document entries:
//! type check, duplicate check, read, page count, title/date inference,
//! sanitized-name registration. Files in a batch are processed strictly
//! sequentially; one file's read-parse-register sequence completes
//! (including error reporting and the progress update) before the next
//! begins, which keeps duplicate notices and the progress indicator
//! deterministic.
//!
//! # Examples
//!
//! ```no_run
//! use bunidx::ingest::Ingestor;
//! use bunidx::model::EntryModel;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut model = EntryModel::new();
//! let ingestor = Ingestor::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (_results, stats) = ingestor
//!     .ingest_all(&mut model, &paths, |_idx, _result| {})
//!     .await;
//! println!("Added {} document(s)", stats.accepted);
//! # Ok(())
//! # }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::dates::{DateResolver, NaturalDateResolver, extract_date};
use crate::error::{BunIdxError, Result};
use crate::model::{DocumentEntry, EntryModel, StoredFile};
use crate::naming::{prettify_title, sanitize_filename, strip_pdf_extension};

/// A successfully ingested document.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    /// Original filename of the ingested file.
    pub original_name: String,

    /// Sanitized filename it was registered under.
    pub sanitized_name: String,

    /// Number of pages in the document.
    pub page_count: usize,
}

/// Result of ingesting a single file.
pub type IngestResult = Result<IngestedDocument>;

/// Statistics for a batch ingestion.
#[derive(Debug, Clone, Default)]
pub struct IngestStatistics {
    /// Number of documents added to the working set.
    pub accepted: usize,

    /// Number of files skipped as duplicates.
    pub duplicates: usize,

    /// Number of files rejected for not being PDFs.
    pub rejected: usize,

    /// Number of per-file processing failures (unreadable/unparseable).
    pub failures: usize,

    /// Total pages across accepted documents.
    pub total_pages: usize,
}

impl IngestStatistics {
    /// Aggregate statistics from per-file results.
    fn from_results(results: &[IngestResult]) -> Self {
        let mut stats = Self::default();
        for result in results {
            match result {
                Ok(ingested) => {
                    stats.accepted += 1;
                    stats.total_pages += ingested.page_count;
                }
                Err(BunIdxError::DuplicateFilename { .. }) => stats.duplicates += 1,
                Err(BunIdxError::NotAPdf { .. }) => stats.rejected += 1,
                Err(_) => stats.failures += 1,
            }
        }
        stats
    }
}

/// Ingests files into an [`EntryModel`].
///
/// The natural-language date fallback is injected so callers (and tests)
/// can swap it out; [`Ingestor::new`] wires in the default resolver.
pub struct Ingestor<'a> {
    resolver: &'a dyn DateResolver,
}

impl Ingestor<'static> {
    /// Create an ingestor with the default natural-language date resolver.
    pub fn new() -> Self {
        Self {
            resolver: &NaturalDateResolver,
        }
    }
}

impl Default for Ingestor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Ingestor<'a> {
    /// Create an ingestor with a custom date resolver.
    pub fn with_resolver(resolver: &'a dyn DateResolver) -> Self {
        Self { resolver }
    }

    /// Ingest a single file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not a PDF, is a duplicate of an
    /// already-ingested filename, cannot be read, or cannot be parsed.
    /// All of these are recoverable; the batch continues past them.
    pub async fn ingest_path(&self, model: &mut EntryModel, path: &Path) -> IngestResult {
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| BunIdxError::file_not_found(path.to_path_buf()))?;

        let bytes = tokio::fs::read(path).await.map_err(|err| read_error(path, err))?;
        let modified = tokio::fs::metadata(path)
            .await
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());

        self.ingest_bytes(model, &original_name, bytes, modified)
    }

    /// Ingest an in-memory file payload.
    ///
    /// This is the core of the pipeline: type check, duplicate check,
    /// page count, title/date inference, sanitized-name registration.
    pub fn ingest_bytes(
        &self,
        model: &mut EntryModel,
        original_name: &str,
        bytes: Vec<u8>,
        modified: SystemTime,
    ) -> IngestResult {
        if !original_name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(BunIdxError::not_a_pdf(original_name));
        }

        if model.contains(original_name) {
            return Err(BunIdxError::duplicate_filename(original_name));
        }

        let document = lopdf::Document::load_mem(&bytes)
            .map_err(|err| BunIdxError::failed_to_parse_pdf(original_name, err.to_string()))?;
        let page_count = document.get_pages().len();

        let stem = strip_pdf_extension(original_name);
        let extracted = extract_date(original_name, &prettify_title(stem), self.resolver);

        let sanitized_name = unique_sanitized_name(model, sanitize_filename(original_name));

        let entry = DocumentEntry {
            original_name: original_name.to_string(),
            sanitized_name: sanitized_name.clone(),
            title: extracted.title,
            date: extracted.date,
            page_count,
        };
        model.append_document(entry, StoredFile { bytes, modified })?;

        Ok(IngestedDocument {
            original_name: original_name.to_string(),
            sanitized_name,
            page_count,
        })
    }

    /// Ingest a batch of files sequentially, with a progress callback.
    ///
    /// The callback is invoked once per file, after that file's entire
    /// ingestion (success or failure) has completed. The index argument
    /// increases monotonically.
    pub async fn ingest_all<F>(
        &self,
        model: &mut EntryModel,
        paths: &[PathBuf],
        mut on_progress: F,
    ) -> (Vec<IngestResult>, IngestStatistics)
    where
        F: FnMut(usize, &IngestResult),
    {
        let mut results = Vec::with_capacity(paths.len());

        for (index, path) in paths.iter().enumerate() {
            let result = self.ingest_path(model, path).await;
            on_progress(index, &result);
            results.push(result);
        }

        let stats = IngestStatistics::from_results(&results);
        (results, stats)
    }
}

/// Resolve a sanitized-name collision against already-registered names.
///
/// Distinct originals can sanitize identically (`"a b.pdf"` and
/// `"a_b.pdf"`); the transmitted file set must not contain two files with
/// the same name, so later arrivals get a numeric suffix before the
/// extension.
fn unique_sanitized_name(model: &EntryModel, sanitized: String) -> String {
    if !model.sanitized_name_taken(&sanitized) {
        return sanitized;
    }

    let (stem, ext) = match sanitized.rfind('.') {
        Some(dot) => (&sanitized[..dot], &sanitized[dot..]),
        None => (sanitized.as_str(), ""),
    };

    let mut counter = 2;
    loop {
        let candidate = format!("{stem}-{counter}{ext}");
        if !model.sanitized_name_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn read_error(path: &Path, err: io::Error) -> BunIdxError {
    match err.kind() {
        io::ErrorKind::NotFound => BunIdxError::file_not_found(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => BunIdxError::FileNotAccessible {
            path: path.to_path_buf(),
            source: err,
        },
        _ => BunIdxError::FailedToRead {
            path: path.to_path_buf(),
            source: err,
        },
    }
}
