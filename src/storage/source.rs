//! Line-range extraction from quoted files
//!
//! [`SourceReader`] reads a referenced file and returns an inclusive, 1-based
//! line range with the original line terminators preserved. Out-of-range
//! numbers are clamped instead of rejected.
//!
//! The reader can also hold pending document text that has not been written
//! to disk (used by check runs), so quoting a document that was rewritten
//! earlier in the same run sees the rewritten lines.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DocumentId;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read quoted file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads line ranges, preferring pending in-memory text over the filesystem
#[derive(Debug, Default)]
pub struct SourceReader {
    pending: HashMap<DocumentId, String>,
}

impl SourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records text for a file that should be used instead of its disk contents
    pub fn set_pending(&mut self, id: DocumentId, text: String) {
        self.pending.insert(id, text);
    }

    /// Returns the pending text for a file, if any
    pub fn pending(&self, id: &DocumentId) -> Option<&str> {
        self.pending.get(id).map(String::as_str)
    }

    /// Extracts lines `start_line..=end_line` from a file
    ///
    /// Fails only if the file cannot be read or is not valid UTF-8; a clamped
    /// range always succeeds.
    pub fn extract(
        &self,
        id: &DocumentId,
        start_line: usize,
        end_line: usize,
    ) -> Result<String, ReadError> {
        if let Some(text) = self.pending(id) {
            return Ok(line_range(text, start_line, end_line));
        }

        let text = fs::read_to_string(id.path()).map_err(|source| ReadError::Io {
            path: id.path().to_path_buf(),
            source,
        })?;
        Ok(line_range(&text, start_line, end_line))
    }
}

/// Selects an inclusive 1-based line range from `text`
///
/// `start_line` is clamped into `[1, total]` and `end_line` into
/// `[start_line, total]`. An empty text yields an empty string.
pub fn line_range(text: &str, start_line: usize, end_line: usize) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let total = lines.len();
    if total == 0 {
        return String::new();
    }

    let start = start_line.clamp(1, total);
    let end = end_line.clamp(start, total);
    lines[start - 1..end].concat()
}
