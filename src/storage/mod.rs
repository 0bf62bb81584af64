//! # Storage Layer
//!
//! Filesystem access for mdquote.
//!
//! | Concern | Type / function |
//! |---------|-----------------|
//! | Reading and writing documents | [`Document`] |
//! | Quoting line ranges from files | [`SourceReader`] |
//! | Finding documents under a directory | [`discover_documents`] |
//! | `mdquote.toml` | [`Config`] |
//!
//! Documents are written with a plain overwrite, only when their text
//! changed. Nothing else is persisted.

mod config;
mod discovery;
mod document;
mod source;

pub use config::{Config, ConfigError, CONFIG_FILE_NAME};
pub use discovery::discover_documents;
pub use document::{Document, DocumentError};
pub use source::{line_range, ReadError, SourceReader};
