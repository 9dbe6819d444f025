//! bunidx - Build and submit document bundle indexes.
//!
//! This library prepares a set of PDF files for bundling: it reads and
//! validates each file, derives a sanitized filename, a display title, and
//! a document date, arranges the documents (with optional section breaks)
//! into a working set, and renders the canonical index the backend bundler
//! consumes. It supports:
//!
//! - Filename sanitization and title prettification
//! - Date extraction from filenames, with a natural-language fallback
//! - Duplicate detection
//! - Reordering, sorting, and section breaks
//! - Canonical index serialization
//! - Multipart submission to the bundle service
//!
//! # Examples
//!
//! ## Building an index
//!
//! ```no_run
//! use bunidx::index::serialize_index;
//! use bunidx::ingest::Ingestor;
//! use bunidx::model::EntryModel;
//! use std::path::PathBuf;
//!
//! # async fn example() -> bunidx::Result<()> {
//! let mut model = EntryModel::new();
//! let ingestor = Ingestor::new();
//!
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = ingestor.ingest_all(&mut model, &paths, |_, _| {}).await;
//! println!("Ingested {} document(s)", stats.accepted);
//! for result in results {
//!     if let Err(err) = result {
//!         eprintln!("skipped: {err}");
//!     }
//! }
//!
//! model.insert_section_break_at(0, "Correspondence");
//! let index = serialize_index(&model);
//! tokio::fs::write("index.csv", index).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Submitting to the bundle service
//!
//! ```no_run
//! use bunidx::config::BundleOptions;
//! use bunidx::model::EntryModel;
//! use bunidx::submit::{BundleClient, assemble};
//!
//! # async fn example(model: EntryModel) -> bunidx::Result<()> {
//! let payload = assemble(&model);
//! let client = BundleClient::new("http://localhost:7001");
//! let options = BundleOptions {
//!     bundle_title: Some("Trial Bundle".to_string()),
//!     ..Default::default()
//! };
//! let artifacts = client.create_bundle(payload, &options).await?;
//! println!("{}", artifacts.message);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dates;
pub mod error;
pub mod index;
pub mod ingest;
pub mod model;
pub mod naming;
pub mod output;
pub mod submit;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{BunIdxError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
