//! Submission of the working set to the bundle service.
//!
//! Splits into a pure assembly step and a transport step. [`assemble`]
//! snapshots the entry model into a [`SubmissionPayload`] (file bytes under
//! their sanitized names plus the serialized index); [`BundleClient`] posts
//! that payload as a multipart request and interprets the JSON reply.
//!
//! The wire contract with the service:
//! - `POST {base}/create_bundle` with repeated `files` parts, a
//!   `csv_index` part named `index.csv`, and the bundle identity form
//!   fields
//! - a JSON body with a `status` discriminator (`success` / `error`)
//! - `GET {base}/download/bundle?path=...` and `/download/zip?path=...`
//!   for the produced artifacts

use std::path::Path;
use std::time::SystemTime;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::BundleOptions;
use crate::error::{BunIdxError, Result};
use crate::index::{INDEX_FILENAME, serialize_index};
use crate::model::{Entry, EntryModel};

/// One file in a submission, keyed by its sanitized name.
#[derive(Debug, Clone)]
pub struct PayloadFile {
    /// Sanitized filename the backend will see.
    pub filename: String,
    /// Raw PDF bytes.
    pub bytes: Vec<u8>,
    /// Last-modified time of the source file.
    pub modified: SystemTime,
}

/// A fully assembled submission: the file set plus the index that
/// describes it.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    /// Files in bundle order, renamed to their sanitized names.
    pub files: Vec<PayloadFile>,
    /// The canonical index payload.
    pub index: String,
}

impl SubmissionPayload {
    /// Total size of the file set in bytes (excluding the index).
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes.len()).sum()
    }
}

/// Snapshot the entry model into a submission payload.
///
/// Document entries contribute their stored bytes under their sanitized
/// name; section entries contribute index rows only. A document whose
/// stored bytes or sanitized name cannot be resolved is silently excluded
/// from the file set (its index row still stands), so a submission is
/// always well-formed even if the registries have drifted.
pub fn assemble(model: &EntryModel) -> SubmissionPayload {
    let index = serialize_index(model);

    let mut files = Vec::with_capacity(model.document_count());
    for entry in model.entries() {
        let Entry::Document(doc) = entry else {
            continue;
        };
        if let (Some(stored), Some(sanitized)) = (
            model.file(&doc.original_name),
            model.sanitized_name(&doc.original_name),
        ) {
            files.push(PayloadFile {
                filename: sanitized.to_string(),
                bytes: stored.bytes.clone(),
                modified: stored.modified,
            });
        }
    }

    SubmissionPayload { files, index }
}

/// Reply from the bundle service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BundleResponse {
    /// The bundle was produced.
    Success {
        /// Human-readable status message.
        message: String,
        /// Server-side path of the produced bundle PDF.
        bundle_path: String,
        /// Server-side path of the zip archive, when one was produced.
        #[serde(default)]
        zip_path: Option<String>,
    },
    /// The service rejected or failed the request.
    Error {
        /// Server-provided failure reason.
        message: String,
    },
}

/// Server-side paths of a successfully produced bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifacts {
    /// Status message from the service.
    pub message: String,
    /// Path of the bundle PDF, usable with [`BundleClient::download_bundle`].
    pub bundle_path: String,
    /// Path of the zip archive, usable with [`BundleClient::download_zip`].
    pub zip_path: Option<String>,
}

/// HTTP client for the bundle service.
pub struct BundleClient {
    base_url: String,
    client: reqwest::Client,
}

impl BundleClient {
    /// Create a client for the service at `base_url`.
    ///
    /// A trailing slash on the base URL is tolerated and stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Submit a payload and return the produced artifact paths.
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::SubmissionFailed`] when the request cannot
    /// be sent or the reply is not the expected JSON shape, and
    /// [`BunIdxError::Backend`] when the service reports a failure of its
    /// own.
    pub async fn create_bundle(
        &self,
        payload: SubmissionPayload,
        options: &BundleOptions,
    ) -> Result<BundleArtifacts> {
        let mut form = Form::new();
        for file in payload.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str("application/pdf")?;
            form = form.part("files", part);
        }

        let index_part = Part::text(payload.index)
            .file_name(INDEX_FILENAME)
            .mime_str("text/csv")?;
        form = form.part("csv_index", index_part);

        // The service applies its own defaults for blank identity fields.
        form = form
            .text(
                "bundle_title",
                options.bundle_title.clone().unwrap_or_default(),
            )
            .text("case_name", options.case_name.clone().unwrap_or_default())
            .text("claim_no", options.claim_no.clone().unwrap_or_default())
            .text("confidential_bool", options.confidential.to_string());

        let response = self
            .client
            .post(self.endpoint("create_bundle"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<BundleResponse>(&body)
                .ok()
                .and_then(|reply| match reply {
                    BundleResponse::Error { message } => Some(message),
                    BundleResponse::Success { .. } => None,
                })
                .unwrap_or_else(|| format!("bundle service returned HTTP {status}"));
            return Err(BunIdxError::backend(message));
        }

        match serde_json::from_str::<BundleResponse>(&body) {
            Ok(BundleResponse::Success {
                message,
                bundle_path,
                zip_path,
            }) => Ok(BundleArtifacts {
                message,
                bundle_path,
                zip_path,
            }),
            Ok(BundleResponse::Error { message }) => Err(BunIdxError::backend(message)),
            Err(err) => Err(BunIdxError::submission_failed(format!(
                "unexpected reply from bundle service: {err}"
            ))),
        }
    }

    /// Download the produced bundle PDF to `dest`.
    ///
    /// Returns the number of bytes written.
    pub async fn download_bundle(&self, artifact_path: &str, dest: &Path) -> Result<u64> {
        self.download("download/bundle", artifact_path, dest).await
    }

    /// Download the produced zip archive to `dest`.
    ///
    /// Returns the number of bytes written.
    pub async fn download_zip(&self, artifact_path: &str, dest: &Path) -> Result<u64> {
        self.download("download/zip", artifact_path, dest).await
    }

    async fn download(&self, route: &str, artifact_path: &str, dest: &Path) -> Result<u64> {
        let response = self
            .client
            .get(self.endpoint(route))
            .query(&[("path", artifact_path)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BundleResponse>(&body)
                .ok()
                .and_then(|reply| match reply {
                    BundleResponse::Error { message } => Some(message),
                    BundleResponse::Success { .. } => None,
                })
                .unwrap_or_else(|| format!("download failed with HTTP {status}"));
            return Err(BunIdxError::backend(message));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|source| BunIdxError::FailedToWrite {
                path: dest.to_path_buf(),
                source,
            })?;

        Ok(bytes.len() as u64)
    }
}
