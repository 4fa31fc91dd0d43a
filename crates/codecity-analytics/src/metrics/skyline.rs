//! Skyline roughness: how uneven building heights are within a district.
//!
//! `R = σ_h / h̄` (population standard deviation over mean). A single tower
//! among low buildings flags a likely god file.

use std::collections::BTreeMap;

use crate::flatten::FlatFileRecord;

/// Height statistics of one district.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkylineStats {
    pub file_count: usize,
    pub avg_height: f64,
    pub roughness: f64,
}

/// Coefficient of variation of `heights`; 0 for fewer than two values or a
/// zero mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn roughness(heights: &[f64]) -> f64 {
    if heights.len() < 2 {
        return 0.0;
    }
    let n = heights.len() as f64;
    let mean = heights.iter().sum::<f64>() / n;
    if mean.abs() < f64::EPSILON {
        return 0.0;
    }
    let variance = heights.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// [`SkylineStats`] of every district of `files`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn skyline(files: &[FlatFileRecord]) -> BTreeMap<String, SkylineStats> {
    let mut heights: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for file in files {
        heights
            .entry(file.district_path.as_str())
            .or_default()
            .push(file.world_height);
    }

    heights
        .into_iter()
        .map(|(district, hs)| {
            let stats = SkylineStats {
                file_count: hs.len(),
                avg_height: hs.iter().sum::<f64>() / hs.len() as f64,
                roughness: roughness(&hs),
            };
            (district.to_string(), stats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::world_height;
    use crate::test_support::flat_file;

    fn assert_approx_eq(actual: f64, expected: f64) {
        let tolerance = 1e-10;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual ({actual}) != expected ({expected})"
        );
    }

    #[test]
    fn uniform_heights_are_smooth() {
        assert_approx_eq(roughness(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn uses_population_deviation() {
        // mean 2, σ = 1 → R = 0.5
        assert_approx_eq(roughness(&[1.0, 3.0]), 0.5);
    }

    #[test]
    fn degenerate_inputs_are_zero() {
        assert_approx_eq(roughness(&[]), 0.0);
        assert_approx_eq(roughness(&[9.0]), 0.0);
        assert_approx_eq(roughness(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn groups_by_district() {
        let mut tall = flat_file("src/big.ts", "src");
        tall.world_height = world_height(300);
        let mut short = flat_file("src/small.ts", "src");
        short.world_height = world_height(100);
        let lone = flat_file("docs/readme.md", "docs");

        let stats = skyline(&[tall, short, lone]);
        let src = stats["src"];
        assert_eq!(src.file_count, 2);
        assert_approx_eq(src.avg_height, 20.0);
        assert_approx_eq(src.roughness, 0.5);
        assert_approx_eq(stats["docs"].roughness, 0.0);
    }
}
