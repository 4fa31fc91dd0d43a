//! Hub detection and fan-out instability.
//!
//! # Overview
//!
//! - **Hub score** `H = in / (n − 1)`: the share of other files importing
//!   this one. A high score marks a central file everything leans on.
//! - **Martin instability** `I = out / (in + out)`: 0 for a file that is
//!   only depended on, 1 for a file that only depends on others.
//!
//! In-degree counts resolved edges only. Out-degree counts the declared
//! target list (unresolved imports included) unless the caller asks for
//! resolved edges only.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::flatten::FlatFileRecord;
use crate::graph::FileGraph;

/// Degree-derived scores of one file.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HubStats {
    pub in_degree: usize,
    pub out_degree: usize,
    pub instability: f64,
    pub hub_score: f64,
}

/// Compute [`HubStats`] for every file of the snapshot, keyed by path.
///
/// A path listed twice keeps the stats of its first occurrence, which is
/// the node its edges attach to.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hub_and_instability(
    files: &[FlatFileRecord],
    graph: &FileGraph,
    count_external_imports: bool,
) -> HashMap<String, HubStats> {
    let n = files.len();
    let mut stats = HashMap::with_capacity(n);
    for (i, file) in files.iter().enumerate() {
        stats.entry(file.path.clone()).or_insert_with(|| {
            let idx = NodeIndex::new(i);
            let in_degree = graph.in_degree(idx);
            let out_degree = if count_external_imports {
                graph.declared_out.get(i).copied().unwrap_or_default()
            } else {
                graph.out_degree(idx)
            };
            let total = in_degree + out_degree;
            HubStats {
                in_degree,
                out_degree,
                instability: if total == 0 {
                    0.0
                } else {
                    out_degree as f64 / total as f64
                },
                hub_score: if n > 1 {
                    in_degree as f64 / (n - 1) as f64
                } else {
                    0.0
                },
            }
        });
    }
    stats
}
