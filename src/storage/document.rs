//! Document files
//!
//! Documents are read whole and written back whole. A write only happens when
//! the new text differs byte-for-byte from what was read. Writes are plain
//! overwrites, not temp-file renames.

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DocumentId;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A document and the text it had when it was read
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    text: String,
}

impl Document {
    /// Reads a document from disk
    pub fn read(id: DocumentId) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(id.path()).map_err(|source| DocumentError::Read {
            path: id.path().to_path_buf(),
            source,
        })?;
        Ok(Self { id, text })
    }

    /// Returns the document identity
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Returns the text as read
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Writes `new_text` if it differs from the text that was read
    ///
    /// Returns true if the file was written.
    pub fn write_if_changed(&self, new_text: &str) -> Result<bool, DocumentError> {
        if new_text == self.text {
            return Ok(false);
        }

        fs::write(self.id.path(), new_text).map_err(|source| DocumentError::Write {
            path: self.id.path().to_path_buf(),
            source,
        })?;
        Ok(true)
    }
}
