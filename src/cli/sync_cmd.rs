//! Sync, check and order commands

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::output::Output;
use crate::pipeline::{self, DocumentStatus, Mode, Report};
use crate::storage::{discover_documents, Config};

/// Discovers documents under `root` and rewrites (or checks) their quote blocks
pub fn sync(output: &Output, root: &Path, config_path: Option<&Path>, mode: Mode) -> Result<()> {
    let Some(documents) = find_documents(output, root, config_path)? else {
        return Ok(());
    };

    let report = pipeline::process(&documents, mode)
        .with_context(|| format!("Quote processing aborted for {}", root.display()))?;

    output.verbose_ctx(
        "sync",
        &format!(
            "Processed {} documents ({} block warnings)",
            report.documents.len(),
            report.warning_count()
        ),
    );

    if output.is_json() {
        output.data(&report);
    } else {
        print_report(output, &report);
    }

    let stale = report.count(DocumentStatus::Stale);
    if mode == Mode::Check && stale > 0 {
        bail!("{} of {} documents have out-of-date quotes", stale, report.discovered);
    }

    Ok(())
}

/// Prints the processing order without touching any document
pub fn order(output: &Output, root: &Path, config_path: Option<&Path>) -> Result<()> {
    let Some(documents) = find_documents(output, root, config_path)? else {
        return Ok(());
    };

    let order = pipeline::schedule(&documents)?;

    if output.is_json() {
        output.data(&order);
    } else {
        for id in &order {
            output.line(&id.to_string());
        }
    }

    Ok(())
}

/// Loads configuration and discovers documents
///
/// Returns `None` when there is nothing to process.
fn find_documents(
    output: &Output,
    root: &Path,
    config_path: Option<&Path>,
) -> Result<Option<Vec<PathBuf>>> {
    if !root.exists() {
        bail!("Path '{}' does not exist", root.display());
    }

    let config = match config_path {
        Some(path) => {
            output.verbose_ctx("config", &format!("Loading {}", path.display()));
            Config::from_file(path)?
        }
        None => Config::load(root)?,
    };
    output.verbose_ctx(
        "config",
        &format!("Document extensions: {}", config.extensions.join(", ")),
    );

    let documents = discover_documents(root, &config);
    if documents.is_empty() {
        output.line("No markdown files found");
        return Ok(None);
    }

    output.line(&format!("Found {} markdown files", documents.len()));
    Ok(Some(documents))
}

fn print_report(output: &Output, report: &Report) {
    for doc in &report.documents {
        for warning in &doc.warnings {
            output.warning(&format!("{}:{}: {}", doc.path, warning.line, warning.message));
        }

        match doc.status {
            DocumentStatus::Updated => output.line(&format!("Updated quotes in: {}", doc.path)),
            DocumentStatus::Stale => output.line(&format!("Out of date: {}", doc.path)),
            DocumentStatus::Unchanged => {
                output.verbose_ctx("sync", &format!("Unchanged: {} ({} blocks)", doc.path, doc.blocks))
            }
            DocumentStatus::Failed => {
                if let Some(error) = &doc.error {
                    output.error(error);
                }
            }
        }
    }

    output.line("Quote processing completed");
}
