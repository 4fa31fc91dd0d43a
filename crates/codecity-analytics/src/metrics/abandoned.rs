//! Abandoned-zone detection: likely dead code.
//!
//! A file is flagged when nothing imports it, it is larger than a trivial
//! stub, and it was last modified no later than the staleness cutoff. The
//! cutoff is a low percentile of the modification times of files that have
//! one. Files without a timestamp sit at the epoch: they are always old
//! enough but do not move the cutoff.

use std::collections::{HashMap, HashSet};

use crate::flatten::FlatFileRecord;

/// Thresholds of the abandonment test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbandonmentRule {
    /// Files at or below this many lines are never flagged.
    pub min_size: u64,
    /// Percentile (0–1) of modification times used as the cutoff.
    pub percentile: f64,
}

impl Default for AbandonmentRule {
    fn default() -> Self {
        Self {
            min_size: 10,
            percentile: 0.25,
        }
    }
}

/// Staleness cutoff in epoch milliseconds.
///
/// Sorted timestamps at `floor(percentile × count)`; 0 when no file has a
/// timestamp or the index falls past the end.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn staleness_cutoff(files: &[FlatFileRecord], percentile: f64) -> i64 {
    let mut stamps: Vec<i64> = files
        .iter()
        .filter_map(|file| file.last_modified)
        .map(|ts| ts.timestamp_millis())
        .collect();
    stamps.sort_unstable();
    let index = (stamps.len() as f64 * percentile.max(0.0)).floor() as usize;
    stamps.get(index).copied().unwrap_or(0)
}

/// Paths of every abandoned file.
///
/// `in_degree` holds resolved in-degrees keyed by path; missing paths count
/// as 0.
#[must_use]
pub fn abandoned_files(
    files: &[FlatFileRecord],
    in_degree: &HashMap<String, usize>,
    rule: AbandonmentRule,
) -> HashSet<String> {
    let cutoff = staleness_cutoff(files, rule.percentile);
    files
        .iter()
        .filter(|file| file.size > rule.min_size)
        .filter(|file| in_degree.get(&file.path).copied().unwrap_or_default() == 0)
        .filter(|file| file.last_modified.map_or(0, |ts| ts.timestamp_millis()) <= cutoff)
        .map(|file| file.path.clone())
        .collect()
}
