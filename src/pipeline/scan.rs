//! Pass 1: dependency scanning
//!
//! Reads every document once and records an edge from each quoted file to the
//! document quoting it. Nothing is written.

use crate::domain::{DependencyGraph, DocumentId, QuoteGrammar};
use crate::storage::Document;

/// Records the dependencies of one document's text
///
/// Blocks with an unresolvable path-spec add no edge. Returns the number of
/// quote blocks found.
pub fn scan_text(
    grammar: &QuoteGrammar,
    id: &DocumentId,
    text: &str,
    graph: &mut DependencyGraph,
) -> usize {
    let blocks = grammar.blocks(text);
    for block in &blocks {
        if let Ok(spec) = &block.spec {
            graph.add_dependency(id.resolve(&spec.path), id.clone());
        }
    }
    blocks.len()
}

/// Builds the dependency graph for a set of documents
///
/// Every document becomes a node, in input order, even if it quotes nothing.
/// A document that cannot be read contributes no edges; the read failure is
/// reported when the document is rewritten.
pub fn build_graph(grammar: &QuoteGrammar, documents: &[DocumentId]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for id in documents {
        graph.add_node(id.clone());
    }

    for id in documents {
        if let Ok(document) = Document::read(id.clone()) {
            scan_text(grammar, id, document.text(), &mut graph);
        }
    }

    graph
}
