//! Coupling radius: how far imports reach across the city.
//!
//! `C = (1/|E|) Σ √((x_u − x_v)² + (z_u − z_v)²)` over resolved edges. Low
//! values mean imports stay in the neighbourhood; high values mean tight
//! coupling between distant modules.

use std::collections::BTreeMap;

use crate::flatten::FlatFileRecord;
use crate::graph::FileGraph;

/// A resolved import with its length in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRecord {
    /// Flat-list position of the importer.
    pub from: usize,
    /// Flat-list position of the imported file.
    pub to: usize,
    pub length: f64,
}

/// Measure every resolved edge once.
#[must_use]
pub fn arc_records(files: &[FlatFileRecord], graph: &FileGraph) -> Vec<ArcRecord> {
    graph
        .edges()
        .map(|(from, to)| {
            let (f, t) = (&files[from], &files[to]);
            ArcRecord {
                from,
                to,
                length: (f.world_x - t.world_x).hypot(f.world_z - t.world_z),
            }
        })
        .collect()
}

/// Mean arc length over the whole city; 0 without arcs.
#[must_use]
pub fn global_coupling_radius(arcs: &[ArcRecord]) -> f64 {
    mean(arcs.iter().map(|arc| arc.length))
}

/// Mean arc length per district over arcs with at least one endpoint in it.
///
/// Every district of `files` gets an entry; districts without arcs get 0.
#[must_use]
pub fn district_coupling_radius(
    files: &[FlatFileRecord],
    arcs: &[ArcRecord],
) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, (f64, usize)> = files
        .iter()
        .map(|file| (file.district_path.as_str(), (0.0, 0)))
        .collect();

    for arc in arcs {
        let from = files[arc.from].district_path.as_str();
        let to = files[arc.to].district_path.as_str();
        let mut add = |district: &str| {
            if let Some((sum, count)) = sums.get_mut(district) {
                *sum += arc.length;
                *count += 1;
            }
        };
        add(from);
        if to != from {
            add(to);
        }
    }

    sums.into_iter()
        .map(|(district, (sum, count))| {
            #[allow(clippy::cast_precision_loss)]
            let avg = if count == 0 { 0.0 } else { sum / count as f64 };
            (district.to_string(), avg)
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
