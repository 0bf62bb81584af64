//! # Quote Pipeline
//!
//! Two-pass batch run over a fixed set of documents.
//!
//! 1. **Scan** ([`scan`]): read every document and build the
//!    [`DependencyGraph`](crate::domain::DependencyGraph).
//! 2. **Schedule**: order the graph so quoted documents come before the
//!    documents quoting them. A cycle aborts the whole run before anything
//!    is written.
//! 3. **Rewrite** ([`rewrite`]): substitute quote blocks one document at a
//!    time, in schedule order, writing only documents whose text changed.
//!
//! Per-block and per-document failures are recorded in the [`Report`] and
//! never stop the run. Everything is sequential.

pub mod report;
pub mod rewrite;
pub mod scan;

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{DocumentId, GraphError, QuoteGrammar};
use crate::storage::SourceReader;

pub use report::{BlockWarning, DocumentReport, DocumentStatus, Report};
pub use rewrite::{rewrite_document, rewrite_loaded, rewrite_text, Rewrite};
pub use scan::{build_graph, scan_text};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to resolve document path {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Cycle(#[from] GraphError),
}

/// Whether changed documents are written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Write changed documents to disk
    #[default]
    Write,
    /// Report changed documents as stale without writing
    Check,
}

/// Runs both passes over a set of documents
///
/// Returns `Err` only for a dependency cycle (nothing is written) or a path
/// that cannot be made absolute.
pub fn process<P: AsRef<Path>>(paths: &[P], mode: Mode) -> Result<Report, SyncError> {
    let grammar = QuoteGrammar::new();
    let documents = identify(paths)?;
    let order = schedule_documents(&grammar, &documents)?;

    let mut sources = SourceReader::new();
    let mut report = Report::new(documents.len());
    for id in &order {
        report
            .documents
            .push(rewrite_document(&grammar, id, &mut sources, mode));
    }

    Ok(report)
}

/// Returns the order documents would be rewritten in
pub fn schedule<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DocumentId>, SyncError> {
    let documents = identify(paths)?;
    schedule_documents(&QuoteGrammar::new(), &documents)
}

/// Scans and orders the input documents
///
/// Referenced files outside the input set are scheduled by the graph but
/// dropped here: they are never rewritten.
fn schedule_documents(
    grammar: &QuoteGrammar,
    documents: &[DocumentId],
) -> Result<Vec<DocumentId>, SyncError> {
    let graph = build_graph(grammar, documents);
    let inputs: HashSet<&DocumentId> = documents.iter().collect();

    Ok(graph
        .topological_order()?
        .into_iter()
        .filter(|id| inputs.contains(id))
        .collect())
}

/// Converts input paths to identities, dropping duplicates
fn identify<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DocumentId>, SyncError> {
    let mut seen = HashSet::new();
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let id = DocumentId::from_path(path).map_err(|source| SyncError::Path {
            path: path.to_path_buf(),
            source,
        })?;
        if seen.insert(id.clone()) {
            documents.push(id);
        }
    }

    Ok(documents)
}
