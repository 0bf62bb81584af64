//! Run report
//!
//! Everything a run did, per document, in processing order. Serializes to
//! JSON for `--format json`.

use serde::Serialize;

use crate::domain::DocumentId;

/// What happened to one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Rewritten on disk
    Updated,
    /// Would be rewritten (check runs only)
    Stale,
    /// Already up to date
    Unchanged,
    /// Could not be read or written
    Failed,
}

/// A recovered problem with a single quote block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockWarning {
    /// 1-based line of the block's begin marker
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: DocumentId,
    pub status: DocumentStatus,
    pub blocks: usize,
    pub warnings: Vec<BlockWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Number of distinct input documents
    pub discovered: usize,

    /// Per-document results, in processing order
    pub documents: Vec<DocumentReport>,
}

impl Report {
    pub fn new(discovered: usize) -> Self {
        Self {
            discovered,
            documents: Vec::new(),
        }
    }

    /// Returns the documents with the given status
    pub fn with_status(&self, status: DocumentStatus) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(move |d| d.status == status)
    }

    /// Returns the number of documents with the given status
    pub fn count(&self, status: DocumentStatus) -> usize {
        self.with_status(status).count()
    }

    /// Returns true if any document was rewritten or would be
    pub fn has_changes(&self) -> bool {
        self.documents
            .iter()
            .any(|d| matches!(d.status, DocumentStatus::Updated | DocumentStatus::Stale))
    }

    /// Returns the total number of block warnings
    pub fn warning_count(&self) -> usize {
        self.documents.iter().map(|d| d.warnings.len()).sum()
    }
}
