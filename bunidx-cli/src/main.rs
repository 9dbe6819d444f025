//! bunidx - Build and submit document bundle indexes.
//!
//! A CLI tool that prepares a set of PDFs for bundling: it derives
//! sanitized filenames, titles, and dates, arranges the documents with
//! optional section breaks, writes the canonical index, and can submit
//! the whole set to a bundle service.

mod cli;

use clap::Parser;
use std::process;

use crate::cli::Cli;
use bunidx::config::Config;
use bunidx::error::BunIdxError;
use bunidx::index::serialize_index;
use bunidx::ingest::Ingestor;
use bunidx::model::EntryModel;
use bunidx::output::{IngestProgress, OutputFormatter, create_formatter, display_ingest_statistics};
use bunidx::submit::{BundleClient, assemble};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), BunIdxError> {
    // Validate CLI arguments
    cli.validate()?;

    // Resolve all inputs (patterns and input-list entries)
    let all_inputs = cli.get_all_inputs().await?;

    // Convert CLI to config
    let mut config = cli.to_config()?;
    config.inputs = all_inputs;
    config.validate()?;

    // Create output formatter
    let formatter = create_formatter(&config);

    // Print header
    if formatter.should_print() {
        formatter.section(&format!("{} v{}", bunidx::NAME, bunidx::VERSION));
        formatter.blank_line();
    }

    // Ingest the input files
    formatter.info(&format!("Reading {} input file(s)...", config.inputs.len()));

    let mut model = EntryModel::new();
    let ingestor = Ingestor::new();

    let mut progress = if formatter.should_print() && !formatter.is_verbose() {
        IngestProgress::new(config.inputs.len())
    } else {
        IngestProgress::disabled()
    };

    let inputs = config.inputs.clone();
    let (results, stats) = ingestor
        .ingest_all(&mut model, &inputs, |index, result| {
            let name = inputs[index]
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| inputs[index].display().to_string());
            progress.tick(index, &name);
            if formatter.is_verbose() {
                match result {
                    Ok(doc) => formatter.info(&format!(
                        "  + {} ({} page(s))",
                        doc.sanitized_name, doc.page_count
                    )),
                    Err(err) => formatter.warning(&err.to_string()),
                }
            }
        })
        .await;
    progress.finish();

    // A missing or unwritable input is a hard error; per-file PDF
    // problems are reported and skipped.
    for result in results {
        match result {
            Err(err) if !err.is_recoverable() => return Err(err),
            Err(err) if !formatter.is_verbose() => {
                formatter.warning(&err.to_string());
            }
            _ => {}
        }
    }

    if formatter.should_print() {
        display_ingest_statistics(&formatter, &stats);
        formatter.blank_line();
    }

    if model.is_empty() {
        return Err(BunIdxError::EmptyWorkingSet);
    }

    // Insert section breaks, then sort (sections stay pinned)
    for section in &config.sections {
        match section.position {
            Some(position) => {
                model.insert_section_break_at(position - 1, &section.title);
            }
            None => {
                model.insert_section_break_at(model.len(), &section.title);
            }
        }
    }

    if let Some(field) = config.sort {
        model.sort_by(field);
        if config.descending {
            // A repeated sort on the same field flips the direction.
            model.sort_by(field);
        }
    }

    // Render the index
    let index = serialize_index(&model);

    // Dry run mode - report and stop here
    if config.dry_run {
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!(
            "  Index would contain {} row(s) ({} document(s))",
            model.len(),
            model.document_count()
        ));
        formatter.info(&format!("  Output would be: {}", config.output.display()));
        formatter.info("  Run without --dry-run to write the index");
        return Ok(());
    }

    // Handle output file existence, then write the index
    handle_output_overwrite(&config, &formatter).await?;

    formatter.info(&format!("Writing index to: {}", config.output.display()));
    tokio::fs::write(&config.output, index.as_bytes())
        .await
        .map_err(|source| BunIdxError::FailedToWrite {
            path: config.output.clone(),
            source,
        })?;

    if formatter.should_print() {
        formatter.success(&format!(
            "Wrote {} ({} row(s), {} document(s))",
            config.output.display(),
            model.len(),
            model.document_count()
        ));

        if formatter.is_verbose() {
            formatter.blank_line();
            formatter.section("Statistics");
            formatter.detail("Documents", &stats.accepted.to_string());
            formatter.detail("Total pages", &stats.total_pages.to_string());
            formatter.detail("Duplicates skipped", &stats.duplicates.to_string());
            formatter.detail("Non-PDFs skipped", &stats.rejected.to_string());
            formatter.detail("Failures", &stats.failures.to_string());
        }
    }

    // Submit to the bundle service
    if let Some(url) = &config.submit_url {
        formatter.blank_line();
        formatter.info(&format!("Submitting bundle to: {url}"));

        let payload = assemble(&model);
        let client = BundleClient::new(url.clone());
        let artifacts = client.create_bundle(payload, &config.options).await?;

        formatter.success(&artifacts.message);

        if let Some(dir) = &config.download_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| BunIdxError::FailedToWrite {
                    path: dir.clone(),
                    source,
                })?;

            let bundle_name = std::path::Path::new(&artifacts.bundle_path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "bundle.pdf".to_string());
            let dest = dir.join(bundle_name);
            let written = client.download_bundle(&artifacts.bundle_path, &dest).await?;
            formatter.success(&format!(
                "Downloaded {} ({written} byte(s))",
                dest.display()
            ));

            if let Some(zip_path) = &artifacts.zip_path {
                let zip_name = std::path::Path::new(zip_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "bundle.zip".to_string());
                let dest = dir.join(zip_name);
                let written = client.download_zip(zip_path, &dest).await?;
                formatter.success(&format!(
                    "Downloaded {} ({written} byte(s))",
                    dest.display()
                ));
            }
        }
    }

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), BunIdxError> {
    use bunidx::config::OverwriteMode;

    // Check if output exists
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => {
            // Just overwrite, no questions asked
            Ok(())
        }
        OverwriteMode::NoClobber => {
            // Error if file exists
            Err(BunIdxError::output_exists(config.output.clone()))
        }
        OverwriteMode::Prompt => {
            // Ask user for confirmation
            if formatter.is_quiet() {
                // In quiet mode, treat as no-clobber
                return Err(BunIdxError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            // Simple yes/no prompt
            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| BunIdxError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(BunIdxError::Cancelled)
            }
        }
    }
}
