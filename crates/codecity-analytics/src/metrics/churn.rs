//! Churn density: lines changed relative to current size.

use std::collections::HashMap;

use crate::flatten::FlatFileRecord;

/// `(total_added + total_deleted) / max(size, 1)`. Unbounded above.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn churn_rate(file: &FlatFileRecord) -> f64 {
    (file.total_added as f64 + file.total_deleted as f64) / file.size.max(1) as f64
}

/// Churn rate of every file, keyed by path.
#[must_use]
pub fn churn_rates(files: &[FlatFileRecord]) -> HashMap<String, f64> {
    files
        .iter()
        .map(|file| (file.path.clone(), churn_rate(file)))
        .collect()
}
