//! Configuration module for bunidx.
//!
//! This module transforms CLI arguments into a validated, normalized
//! configuration that drives index building and submission. It handles:
//! - Validation of argument combinations
//! - Section-break specifications
//! - Bundle identity fields forwarded to the backend

use anyhow::{Context, Result, bail};

use std::{path::PathBuf, str::FromStr};

use crate::model::SortField;

/// A section break requested from the command line.
///
/// Supports a bare title (appended at the end) or a position-prefixed
/// form:
/// - `"Correspondence"` - appended after all current rows
/// - `"3:Correspondence"` - inserted before row 3 (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    /// 1-indexed row to insert before; `None` appends at the end.
    pub position: Option<usize>,

    /// Section title.
    pub title: String,
}

impl SectionSpec {
    /// Parse a section specification string.
    ///
    /// # Errors
    ///
    /// Returns an error if a position prefix is present but zero, or if
    /// the title is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bunidx::config::SectionSpec;
    ///
    /// let spec = SectionSpec::parse("3:Correspondence").unwrap();
    /// assert_eq!(spec.position, Some(3));
    /// assert_eq!(spec.title, "Correspondence");
    ///
    /// let spec = SectionSpec::parse("Re: Pleadings").unwrap();
    /// assert_eq!(spec.position, None);
    /// assert_eq!(spec.title, "Re: Pleadings");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let (position, title) = match s.split_once(':') {
            // Only a numeric prefix is a position; anything else is part
            // of the title ("Re: Pleadings").
            Some((prefix, rest)) if prefix.trim().chars().all(|c| c.is_ascii_digit())
                && !prefix.trim().is_empty() =>
            {
                let position: usize = prefix
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid section position: {prefix}"))?;
                if position == 0 {
                    bail!("Section positions are 1-indexed");
                }
                (Some(position), rest)
            }
            _ => (None, s),
        };

        let title = title.trim();
        if title.is_empty() {
            bail!("Section title cannot be empty");
        }

        Ok(Self {
            position,
            title: title.to_string(),
        })
    }
}

impl FromStr for SectionSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Bundle identity fields forwarded to the backend.
///
/// The backend derives the output bundle filename from these, so they
/// travel with every submission even though the index itself does not
/// contain them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOptions {
    /// Bundle title.
    pub bundle_title: Option<String>,
    /// Case name.
    pub case_name: Option<String>,
    /// Claim number.
    pub claim_no: Option<String>,
    /// Mark the bundle confidential.
    pub confidential: bool,
}

impl BundleOptions {
    /// Check if any identity fields are set.
    pub fn is_empty(&self) -> bool {
        self.bundle_title.is_none()
            && self.case_name.is_none()
            && self.claim_no.is_none()
            && !self.confidential
    }

    /// Create options from optional strings, trimming whitespace.
    pub fn new(
        bundle_title: Option<String>,
        case_name: Option<String>,
        claim_no: Option<String>,
        confidential: bool,
    ) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            bundle_title: to_string_opt(bundle_title),
            case_name: to_string_opt(case_name),
            claim_no: to_string_opt(claim_no),
            confidential,
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for an index-building run.
///
/// This structure contains all settings needed to ingest files, shape the
/// working set, and emit or submit the index, derived and validated from
/// CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths (in initial bundle order).
    pub inputs: Vec<PathBuf>,

    /// Path the index payload is written to.
    pub output: PathBuf,

    /// Section breaks to insert after ingestion.
    pub sections: Vec<SectionSpec>,

    /// Sort documents by this field after ingestion.
    pub sort: Option<SortField>,

    /// Sort descending instead of ascending.
    pub descending: bool,

    /// Base URL of the bundle service; when set, the index and files are
    /// submitted after being built.
    pub submit_url: Option<String>,

    /// Directory to download the produced artifacts into.
    pub download_dir: Option<PathBuf>,

    /// Bundle identity fields forwarded on submission.
    pub options: BundleOptions,

    /// Dry run mode - build and report without writing or submitting.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Output file overwrite behavior.
    pub overwrite_mode: OverwriteMode,
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - `--desc` is given without `--sort`
    /// - A download directory is given without a submit URL
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.descending && self.sort.is_none() {
            bail!("--desc requires --sort");
        }

        if self.download_dir.is_some() && self.submit_url.is_none() {
            bail!("--download requires --submit");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
