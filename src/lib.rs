//! mdquote - keeps quoted excerpts in markdown documents in sync
//!
//! Documents mark excerpts with quote blocks:
//!
//! ```text
//! <!-- quote_begin content="[description](src/lib.rs#L10-L20)" lang="rust" -->
//! ...replaced on every run...
//! <!-- quote_end -->
//! ```
//!
//! A run replaces each block's body with the referenced line range. Documents
//! that quote other documents are rewritten after the documents they quote.

pub mod cli;
pub mod domain;
pub mod pipeline;
pub mod storage;

pub use domain::{DependencyGraph, DocumentId, PathSpec, QuoteGrammar};
pub use pipeline::{process, Mode, Report, SyncError};
