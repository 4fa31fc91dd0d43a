//! District-level and city-wide modularity.
//!
//! # Local modularity
//!
//! `M_d = |E_intra| / |E_touching|` over resolved edges with at least one
//! endpoint in district `d`; 1 when the district has no such edges.
//!
//! # Newman–Girvan Q
//!
//! Communities are immediate parent directories. Each directed edge `i → j`
//! is weighted `w = ln(1 + size_i)`, so large importers count more than
//! small glue files:
//!
//! ```text
//! Q = Σ_c [ e_c / W − (a_c / 2W)² ]
//! ```
//!
//! where `e_c` is the weight of edges inside `c`, `a_c` the weight incident
//! to `c` (counted once per endpoint), and `W` the total weight. `Q` lies in
//! roughly `[−0.5, 1]` and is mapped to a 0–100 score by
//! [`modularity_score`].

use std::collections::BTreeMap;

use crate::flatten::FlatFileRecord;
use crate::graph::FileGraph;
use crate::score::composite::to_score;

/// Local modularity of every district of `files`.
#[must_use]
pub fn local_modularity(files: &[FlatFileRecord], graph: &FileGraph) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, (usize, usize)> = files
        .iter()
        .map(|file| (file.district_path.as_str(), (0, 0)))
        .collect();

    for (from, to) in graph.edges() {
        let from_district = files[from].district_path.as_str();
        let to_district = files[to].district_path.as_str();
        if from_district == to_district {
            if let Some((intra, total)) = counts.get_mut(from_district) {
                *intra += 1;
                *total += 1;
            }
        } else {
            for district in [from_district, to_district] {
                if let Some((_, total)) = counts.get_mut(district) {
                    *total += 1;
                }
            }
        }
    }

    counts
        .into_iter()
        .map(|(district, (intra, total))| {
            #[allow(clippy::cast_precision_loss)]
            let value = if total == 0 {
                1.0
            } else {
                intra as f64 / total as f64
            };
            (district.to_string(), value)
        })
        .collect()
}

/// Newman–Girvan Q with parent directories as communities; 0 without edges.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn newman_girvan_q(files: &[FlatFileRecord], graph: &FileGraph) -> f64 {
    let mut intra: BTreeMap<&str, f64> = BTreeMap::new();
    let mut incident: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total = 0.0;

    for (from, to) in graph.edges() {
        let weight = (files[from].size as f64).ln_1p();
        let c_from = files[from].district_path.as_str();
        let c_to = files[to].district_path.as_str();
        total += weight;
        *incident.entry(c_from).or_default() += weight;
        *incident.entry(c_to).or_default() += weight;
        if c_from == c_to {
            *intra.entry(c_from).or_default() += weight;
        }
    }

    if total <= 0.0 {
        return 0.0;
    }

    incident
        .iter()
        .map(|(community, a)| {
            let e = intra.get(community).copied().unwrap_or_default() / total;
            let a = a / (2.0 * total);
            e - a * a
        })
        .sum()
}

/// Map `Q` from `[−0.5, 1]` onto a rounded 0–100 score.
///
/// `Q = 0` (no better than random) maps to 33.
#[must_use]
pub fn modularity_score(q: f64) -> u8 {
    to_score((q + 0.5) / 1.5 * 100.0)
}
