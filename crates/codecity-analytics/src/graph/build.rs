//! Resolved file dependency graph.
//!
//! # Overview
//!
//! Nodes are the files of one flattened snapshot, added in flat-list order,
//! so `NodeIndex::index()` is the record's position in that list. An edge
//! `A → B` means "A imports B".
//!
//! ## Resolution
//!
//! Only edges whose endpoints are both in the snapshot become graph edges.
//! The declared (normalized) target count of every file is kept alongside,
//! because out-degree can optionally include imports of paths outside the
//! snapshot.
//!
//! ## Cache Invalidation
//!
//! The graph carries a BLAKE3 hash of its sorted resolved edge list. It
//! changes only when the resolved edge set changes, so consumers can skip
//! recomputing metrics for an unchanged graph.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use codecity_core::DependencyIndex;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::flatten::FlatFileRecord;

// ---------------------------------------------------------------------------
// FileGraph
// ---------------------------------------------------------------------------

/// Directed import graph over the files of one snapshot.
#[derive(Debug)]
pub struct FileGraph {
    /// Directed graph: nodes = file paths, edges = resolved imports.
    pub graph: DiGraph<String, ()>,
    /// Mapping from file path to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Declared target count per node, including unresolved targets.
    pub declared_out: Vec<usize>,
    /// Number of declared edges dropped because an endpoint is missing.
    pub unresolved: usize,
    /// BLAKE3 content hash of the resolved edge set.
    pub content_hash: String,
}

impl FileGraph {
    /// Build the graph for `files` from the dependency map.
    ///
    /// Dependency sources absent from `files` contribute nothing. When a
    /// path occurs twice in `files`, edges attach to the first occurrence.
    #[must_use]
    #[instrument(skip_all, fields(files = files.len(), sources = deps.len()))]
    pub fn build(files: &[FlatFileRecord], deps: &DependencyIndex) -> Self {
        let mut graph = DiGraph::<String, ()>::with_capacity(files.len(), 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(files.len());

        for file in files {
            let idx = graph.add_node(file.path.clone());
            node_map.entry(file.path.clone()).or_insert(idx);
        }

        let mut declared_out = vec![0; files.len()];
        let mut resolved: Vec<(&str, &str)> = Vec::new();
        let mut unresolved = 0_usize;

        for (from, to) in deps.edges() {
            let Some(&from_idx) = node_map.get(from) else {
                unresolved += 1;
                continue;
            };
            declared_out[from_idx.index()] += 1;
            let Some(&to_idx) = node_map.get(to) else {
                unresolved += 1;
                continue;
            };
            if !graph.contains_edge(from_idx, to_idx) {
                graph.add_edge(from_idx, to_idx, ());
                resolved.push((from, to));
            }
        }

        resolved.sort_unstable();
        let content_hash = compute_edge_hash(&resolved);

        debug!(
            edges = graph.edge_count(),
            unresolved, "built file dependency graph"
        );

        Self {
            graph,
            node_map,
            declared_out,
            unresolved,
            content_hash,
        }
    }

    /// Return the number of nodes (files) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of resolved edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a file path.
    #[must_use]
    pub fn node_index(&self, path: &str) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }

    /// Resolved imports of the file at `idx`.
    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Incoming).count()
    }

    /// Resolved imports made by the file at `idx`.
    #[must_use]
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Outgoing).count()
    }

    /// Every resolved edge as flat-list positions `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Compute a BLAKE3 hash of the sorted edge list for cache invalidation.
fn compute_edge_hash(edges: &[(&str, &str)]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (from, to) in edges {
        hasher.update(from.as_bytes());
        hasher.update(b"\x00");
        hasher.update(to.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
