//! Command-line interface definition for bunidx.

use clap::Parser;
use std::path::PathBuf;

use bunidx::config::{BundleOptions, Config, OverwriteMode, SectionSpec};
use bunidx::error::BunIdxError;
use bunidx::model::SortField;
use bunidx::utils::collect_paths_for_patterns;

/// Build the index for a document bundle and optionally submit it.
#[derive(Parser, Debug)]
#[command(
    name = "bunidx",
    version,
    about = "Build and submit document bundle indexes",
    long_about = "Reads a set of PDF files, derives sanitized filenames, display titles, \
                  and document dates, arranges them into bundle order with optional \
                  section breaks, and writes the canonical index. With --submit the \
                  index and files are sent to a bundle service."
)]
pub struct Cli {
    /// Input PDF files or glob patterns, in bundle order
    #[arg(value_name = "INPUTS", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Read additional input paths from a file (one per line, # comments)
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Output path for the index
    #[arg(short, long, value_name = "FILE", default_value = "index.csv")]
    pub output: PathBuf,

    /// Insert a section break: "TITLE" or "POS:TITLE" (1-indexed row)
    #[arg(short = 's', long = "section", value_name = "SPEC")]
    pub sections: Vec<String>,

    /// Sort documents by this field (title, date)
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long = "desc", requires = "sort")]
    pub descending: bool,

    /// Submit the bundle to this service URL after building
    #[arg(long, value_name = "URL", env = "BUNIDX_SUBMIT_URL")]
    pub submit: Option<String>,

    /// Download the produced artifacts into this directory
    #[arg(long, value_name = "DIR", requires = "submit")]
    pub download: Option<PathBuf>,

    /// Bundle title forwarded to the service
    #[arg(long, value_name = "TITLE")]
    pub bundle_title: Option<String>,

    /// Case name forwarded to the service
    #[arg(long, value_name = "NAME")]
    pub case_name: Option<String>,

    /// Claim number forwarded to the service
    #[arg(long, value_name = "NO")]
    pub claim_no: Option<String>,

    /// Mark the bundle confidential
    #[arg(long)]
    pub confidential: bool,

    /// Overwrite the output file without prompting
    #[arg(short, long, conflicts_with = "no_clobber")]
    pub force: bool,

    /// Never overwrite the output file
    #[arg(short = 'n', long)]
    pub no_clobber: bool,

    /// Build and report without writing or submitting
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Validate argument combinations clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::InvalidConfig`] on an invalid combination.
    pub fn validate(&self) -> Result<(), BunIdxError> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(BunIdxError::invalid_config("No input files specified"));
        }

        if self.download.is_some() && self.submit.is_none() {
            return Err(BunIdxError::invalid_config("--download requires --submit"));
        }

        Ok(())
    }

    /// Resolve all input paths, expanding glob patterns and reading the
    /// input list file when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the input list cannot be read or a pattern is
    /// invalid.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>, BunIdxError> {
        let mut patterns = self.inputs.clone();

        if let Some(list_path) = &self.input_list {
            let contents = tokio::fs::read_to_string(list_path).await.map_err(|source| {
                BunIdxError::FileNotAccessible {
                    path: list_path.clone(),
                    source,
                }
            })?;

            patterns.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(String::from),
            );
        }

        collect_paths_for_patterns(&patterns)
    }

    /// Convert parsed arguments into a [`Config`].
    ///
    /// The caller fills in `inputs` from [`Cli::get_all_inputs`].
    ///
    /// # Errors
    ///
    /// Returns [`BunIdxError::InvalidConfig`] if a section spec or sort
    /// field fails to parse.
    pub fn to_config(&self) -> Result<Config, BunIdxError> {
        let sections = self
            .sections
            .iter()
            .map(|spec| {
                SectionSpec::parse(spec).map_err(|err| BunIdxError::invalid_config(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<SortField>)
            .transpose()?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        Ok(Config {
            inputs: Vec::new(),
            output: self.output.clone(),
            sections,
            sort,
            descending: self.descending,
            submit_url: self.submit.clone(),
            download_dir: self.download.clone(),
            options: BundleOptions::new(
                self.bundle_title.clone(),
                self.case_name.clone(),
                self.claim_no.clone(),
                self.confidential,
            ),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
        })
    }
}
