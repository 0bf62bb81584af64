//! Domain models for mdquote
//!
//! Contains the quote block grammar, document identity and the dependency
//! graph, without any I/O concerns.

mod grammar;
mod graph;
mod identity;

pub use grammar::{PathSpec, PathSpecError, QuoteBlock, QuoteGrammar, DEFAULT_LANG};
pub use graph::{DependencyGraph, GraphError};
pub use identity::DocumentId;
