//! Dependency graph for documents
//!
//! An edge `referenced -> referencing` means the referenced file must be
//! rewritten before the document that quotes it. The graph is built fresh on
//! every run and never persisted.
//!
//! Uses petgraph for storage; scheduling is Kahn's algorithm with a FIFO ready
//! queue seeded in node discovery order, so the same input always yields the
//! same order.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

use super::identity::DocumentId;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Cycle detected in dependency graph between: {}", format_ids(.0))]
    CycleDetected(Vec<DocumentId>),
}

fn format_ids(ids: &[DocumentId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A dependency graph over documents and the files they quote
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<DocumentId, ()>,

    /// Map from DocumentId to node index
    node_map: HashMap<DocumentId, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Adds a node if it is not already present and returns its index
    pub fn add_node(&mut self, id: DocumentId) -> NodeIndex {
        if let Some(idx) = self.node_map.get(&id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_map.insert(id, idx);
        idx
    }

    /// Records that `referencing` quotes `referenced`
    ///
    /// The edge direction is: referenced -> referencing. Repeated quotes of
    /// the same file collapse to one edge. A document quoting itself becomes
    /// a self-loop and therefore a cycle.
    pub fn add_dependency(&mut self, referenced: DocumentId, referencing: DocumentId) {
        let from = self.add_node(referenced);
        let to = self.add_node(referencing);
        self.graph.update_edge(from, to, ());
    }

    /// Returns the files a document quotes
    pub fn dependencies(&self, id: &DocumentId) -> Vec<DocumentId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Returns the documents that quote a file
    pub fn dependents(&self, id: &DocumentId) -> Vec<DocumentId> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &DocumentId, direction: Direction) -> Vec<DocumentId> {
        let idx = match self.node_map.get(id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort();
        found
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Returns every node in an order where each edge `u -> v` has `u` first
    ///
    /// When a cycle exists no partial order is returned; the error lists the
    /// nodes that could not be scheduled.
    pub fn topological_order(&self) -> Result<Vec<DocumentId>, GraphError> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .collect();

        // Node indices follow discovery order
        let mut ready: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(current) = ready.pop_front() {
            order.push(current);

            // Successors in edge insertion order
            let mut successors: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(current, Direction::Outgoing)
                .collect();
            successors.reverse();

            for next in successors {
                let degree = &mut in_degree[next.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(next);
                }
            }
        }

        if order.len() != self.graph.node_count() {
            let stuck = self
                .graph
                .node_indices()
                .filter(|idx| in_degree[idx.index()] > 0)
                .filter_map(|idx| self.graph.node_weight(idx).cloned())
                .collect();
            return Err(GraphError::CycleDetected(stuck));
        }

        Ok(order
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect())
    }

    /// Returns true if the graph contains the node
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns the number of nodes in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns the number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
