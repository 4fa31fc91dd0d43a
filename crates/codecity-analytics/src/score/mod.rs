//! Metrics aggregation: joins the per-pass mappings into file, district and
//! city records with composite 0–100 scores.

pub mod composite;

use std::collections::{BTreeMap, HashMap};

use codecity_core::DependencyIndex;
use codecity_core::config::AnalyticsConfig;
use codecity_core::model::LayoutNode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::flatten::{FlatFileRecord, district_name, flatten};
use crate::graph::FileGraph;
use crate::metrics::{
    AbandonmentRule, abandoned_files, arc_records, churn_rates, district_coupling_radius,
    global_coupling_radius, hub_and_instability, local_modularity, modularity_score,
    newman_girvan_q, skyline,
};

pub use composite::{district_health, hub_concentration, scalability_score, to_score};

/// Metrics of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub path: String,
    pub in_degree: usize,
    pub out_degree: usize,
    /// Martin instability: `out / (in + out)`; 0 = stable, 1 = unstable.
    pub instability: f64,
    /// `in / (n − 1)`.
    pub hub_score: f64,
    pub is_abandoned: bool,
    /// `(added + deleted) / max(size, 1)`.
    pub churn_rate: f64,
}

/// Metrics of one district (a directory that directly holds files).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictMetrics {
    pub path: String,
    pub name: String,
    pub file_count: usize,
    pub avg_height: f64,
    pub skyline_roughness: f64,
    /// Share of touching edges that stay inside the district.
    pub modularity_index: f64,
    pub avg_coupling_radius: f64,
    pub avg_instability: f64,
    pub health_score: u8,
}

/// City-wide metrics of one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMetrics {
    pub modularity_score: u8,
    pub scalability_score: u8,
    pub avg_coupling_radius: f64,
    pub hub_concentration: f64,
    pub dead_code_ratio: f64,
    pub avg_instability: f64,
    pub hub_files: Vec<FileMetrics>,
    pub abandoned_files: Vec<FileMetrics>,
    /// Sorted by path.
    pub districts: Vec<DistrictMetrics>,
    /// In flat-list order.
    pub files: Vec<FileMetrics>,
    /// BLAKE3 hash of the resolved edge set these metrics were computed on.
    pub graph_hash: String,
}

/// Run every pass over a layout snapshot and its dependency map.
#[must_use]
#[instrument(skip_all, fields(sources = deps.len()))]
pub fn compute_city_metrics(
    root: &LayoutNode,
    deps: &DependencyIndex,
    config: &AnalyticsConfig,
) -> CityMetrics {
    analyze_files(&flatten(root), deps, config)
}

/// [`compute_city_metrics`] over an already flattened snapshot.
#[must_use]
pub fn analyze_files(
    files: &[FlatFileRecord],
    deps: &DependencyIndex,
    config: &AnalyticsConfig,
) -> CityMetrics {
    let graph = FileGraph::build(files, deps);

    let hubs = hub_and_instability(files, &graph, config.count_external_imports);
    let churn = churn_rates(files);
    let in_degree: HashMap<String, usize> = hubs
        .iter()
        .map(|(path, stats)| (path.clone(), stats.in_degree))
        .collect();
    let abandoned = abandoned_files(
        files,
        &in_degree,
        AbandonmentRule {
            min_size: config.abandoned_min_size,
            percentile: config.abandoned_percentile,
        },
    );

    let file_metrics: Vec<FileMetrics> = files
        .iter()
        .map(|file| {
            let stats = hubs.get(&file.path).copied().unwrap_or_default();
            FileMetrics {
                path: file.path.clone(),
                in_degree: stats.in_degree,
                out_degree: stats.out_degree,
                instability: stats.instability,
                hub_score: stats.hub_score,
                is_abandoned: abandoned.contains(&file.path),
                churn_rate: churn.get(&file.path).copied().unwrap_or_default(),
            }
        })
        .collect();

    let arcs = arc_records(files, &graph);
    let districts = assemble_districts(files, &graph, &arcs, &file_metrics);

    let q = newman_girvan_q(files, &graph);
    let avg_instability = mean(file_metrics.iter().map(|f| f.instability));
    let in_degrees: Vec<usize> = file_metrics.iter().map(|f| f.in_degree).collect();
    let hub_concentration = hub_concentration(&in_degrees, config.hub_top_fraction);
    let abandoned_count = file_metrics.iter().filter(|f| f.is_abandoned).count();
    let dead_code_ratio = composite::ratio(abandoned_count, file_metrics.len());

    let mut hub_files: Vec<FileMetrics> = file_metrics
        .iter()
        .filter(|f| f.hub_score > config.hub_threshold)
        .cloned()
        .collect();
    hub_files.sort_by(|a, b| {
        b.hub_score
            .total_cmp(&a.hub_score)
            .then_with(|| a.path.cmp(&b.path))
    });
    hub_files.truncate(config.top_n);

    let abandoned_files: Vec<FileMetrics> = file_metrics
        .iter()
        .filter(|f| f.is_abandoned)
        .take(config.top_n)
        .cloned()
        .collect();

    let metrics = CityMetrics {
        modularity_score: modularity_score(q),
        scalability_score: scalability_score(
            hub_concentration,
            dead_code_ratio,
            avg_instability,
            &config.scalability,
        ),
        avg_coupling_radius: global_coupling_radius(&arcs),
        hub_concentration,
        dead_code_ratio,
        avg_instability,
        hub_files,
        abandoned_files,
        districts,
        files: file_metrics,
        graph_hash: graph.content_hash,
    };

    debug!(
        files = metrics.files.len(),
        districts = metrics.districts.len(),
        modularity = metrics.modularity_score,
        scalability = metrics.scalability_score,
        "computed city metrics"
    );

    metrics
}

fn assemble_districts(
    files: &[FlatFileRecord],
    graph: &FileGraph,
    arcs: &[crate::metrics::ArcRecord],
    file_metrics: &[FileMetrics],
) -> Vec<DistrictMetrics> {
    let skylines = skyline(files);
    let modularity = local_modularity(files, graph);
    let coupling = district_coupling_radius(files, arcs);

    let mut instability: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (file, metrics) in files.iter().zip(file_metrics) {
        instability
            .entry(file.district_path.as_str())
            .or_default()
            .push(metrics.instability);
    }

    skylines
        .into_iter()
        .map(|(path, sky)| {
            let modularity_index = modularity.get(&path).copied().unwrap_or(1.0);
            let avg_instability = instability
                .get(path.as_str())
                .map_or(0.0, |values| mean(values.iter().copied()));
            DistrictMetrics {
                name: district_name(&path).to_string(),
                file_count: sky.file_count,
                avg_height: sky.avg_height,
                skyline_roughness: sky.roughness,
                modularity_index,
                avg_coupling_radius: coupling.get(&path).copied().unwrap_or_default(),
                avg_instability,
                health_score: district_health(sky.roughness, modularity_index, avg_instability),
                path,
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{deps, flat_file};

    fn assert_approx_eq(actual: f64, expected: f64) {
        let tolerance = 1e-10;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual ({actual}) != expected ({expected})"
        );
    }

    #[test]
    fn empty_snapshot_is_neutral() {
        let metrics = analyze_files(&[], &DependencyIndex::default(), &AnalyticsConfig::default());
        assert_eq!(metrics.modularity_score, 33);
        assert_eq!(metrics.scalability_score, 100);
        assert!(metrics.files.is_empty());
        assert!(metrics.districts.is_empty());
        assert_approx_eq(metrics.avg_coupling_radius, 0.0);
        assert_approx_eq(metrics.dead_code_ratio, 0.0);
    }

    #[test]
    fn single_import_pair() {
        let files = vec![flat_file("a.ts", ""), flat_file("b.ts", "")];
        let metrics = analyze_files(
            &files,
            &deps(vec![("a.ts", vec!["b.ts"])]),
            &AnalyticsConfig::default(),
        );
        let a = &metrics.files[0];
        assert_eq!((a.in_degree, a.out_degree), (0, 1));
        assert_approx_eq(a.instability, 1.0);
        let b = &metrics.files[1];
        assert_eq!((b.in_degree, b.out_degree), (1, 0));
        assert_approx_eq(b.instability, 0.0);

        assert_eq!(metrics.hub_files.len(), 1);
        assert_eq!(metrics.hub_files[0].path, "b.ts");
        assert_eq!(metrics.districts.len(), 1);
        assert_eq!(metrics.districts[0].name, "");
    }

    #[test]
    fn districts_are_sorted_by_path_with_names() {
        let files = vec![
            flat_file("web/ui/a.ts", "web/ui"),
            flat_file("api/b.ts", "api"),
            flat_file("web/ui/c.ts", "web/ui"),
        ];
        let metrics = analyze_files(&files, &DependencyIndex::default(), &AnalyticsConfig::default());
        let paths: Vec<_> = metrics.districts.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["api", "web/ui"]);
        assert_eq!(metrics.districts[1].name, "ui");
        assert_eq!(metrics.districts[1].file_count, 2);
        assert_eq!(metrics.districts[1].health_score, 100);
    }

    #[test]
    fn hub_files_break_ties_by_path_and_respect_top_n() {
        let files: Vec<_> = ["z.ts", "y.ts", "a.ts", "b.ts"]
            .into_iter()
            .map(|p| flat_file(p, ""))
            .collect();
        let config = AnalyticsConfig {
            top_n: 1,
            ..AnalyticsConfig::default()
        };
        let metrics = analyze_files(
            &files,
            &deps(vec![("a.ts", vec!["z.ts", "y.ts"]), ("b.ts", vec!["z.ts", "y.ts"])]),
            &config,
        );
        assert_eq!(metrics.hub_files.len(), 1);
        assert_eq!(metrics.hub_files[0].path, "y.ts");
    }

    #[test]
    fn abandoned_files_keep_flat_order() {
        let big = |path: &str| FlatFileRecord {
            size: 100,
            ..flat_file(path, "")
        };
        let files = vec![big("m.ts"), big("b.ts"), big("x.ts")];
        let metrics = analyze_files(&files, &DependencyIndex::default(), &AnalyticsConfig::default());
        let order: Vec<_> = metrics.abandoned_files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, vec!["m.ts", "b.ts", "x.ts"]);
        assert_approx_eq(metrics.dead_code_ratio, 1.0);
    }

    #[test]
    fn serializes_snake_case() {
        let metrics = analyze_files(
            &[flat_file("a.ts", "")],
            &DependencyIndex::default(),
            &AnalyticsConfig::default(),
        );
        let json = serde_json::to_value(&metrics).expect("serialize");
        assert!(json.get("modularity_score").is_some());
        assert!(json["graph_hash"].as_str().is_some_and(|h| h.starts_with("blake3:")));
        assert!(json["files"][0].get("is_abandoned").is_some());
    }
}
