//! `codecity analyze`: structural-health metrics of a layout snapshot.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use codecity_analytics::{CityMetrics, compute_city_metrics};
use codecity_core::config::AnalyticsConfig;
use codecity_core::model::LayoutNode;
use codecity_core::DependencyIndex;
use tracing::info;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode, report_load};

/// Arguments for `codecity analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Layout snapshot JSON (tree with rectangles).
    #[arg(long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Dependency map JSON (file → imported paths). Without it every file
    /// is treated as isolated.
    #[arg(long, value_name = "FILE")]
    pub deps: Option<PathBuf>,

    /// Cap on listed hub and abandoned files (overrides the project config).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

/// Execute `codecity analyze`.
pub fn run_analyze(
    args: &AnalyzeArgs,
    output: OutputMode,
    config: &AnalyticsConfig,
) -> anyhow::Result<()> {
    let layout = report_load(output, LayoutNode::load(&args.layout))?;
    let deps = match args.deps {
        Some(ref path) => report_load(output, DependencyIndex::load(path))?,
        None => DependencyIndex::default(),
    };

    let mut config = config.clone();
    if let Some(top) = args.top {
        config.top_n = top;
    }

    let metrics = compute_city_metrics(&layout, &deps, &config);
    info!(
        files = metrics.files.len(),
        modularity = metrics.modularity_score,
        scalability = metrics.scalability_score,
        "analysis complete"
    );
    render_mode(output, &metrics, render_analyze_text, render_analyze_pretty)
}

fn render_analyze_text(metrics: &CityMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "modularity_score={}", metrics.modularity_score)?;
    writeln!(w, "scalability_score={}", metrics.scalability_score)?;
    writeln!(w, "avg_coupling_radius={:.3}", metrics.avg_coupling_radius)?;
    writeln!(w, "hub_concentration={:.3}", metrics.hub_concentration)?;
    writeln!(w, "dead_code_ratio={:.3}", metrics.dead_code_ratio)?;
    writeln!(w, "avg_instability={:.3}", metrics.avg_instability)?;
    for hub in &metrics.hub_files {
        writeln!(w, "hub\t{}\t{:.3}", hub.path, hub.hub_score)?;
    }
    for file in &metrics.abandoned_files {
        writeln!(w, "abandoned\t{}", file.path)?;
    }
    for district in &metrics.districts {
        writeln!(
            w,
            "district\t{}\t{}\t{}",
            display_district(&district.path),
            district.file_count,
            district.health_score
        )?;
    }
    Ok(())
}

fn render_analyze_pretty(metrics: &CityMetrics, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "City health")?;
    pretty_kv(w, "Modularity", format!("{}/100", metrics.modularity_score))?;
    pretty_kv(w, "Scalability", format!("{}/100", metrics.scalability_score))?;
    pretty_kv(w, "Coupling", format!("{:.2}", metrics.avg_coupling_radius))?;
    pretty_kv(w, "Hub share", format!("{:.1}%", metrics.hub_concentration * 100.0))?;
    pretty_kv(w, "Dead code", format!("{:.1}%", metrics.dead_code_ratio * 100.0))?;
    pretty_kv(w, "Instability", format!("{:.2}", metrics.avg_instability))?;

    if !metrics.hub_files.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Hub files")?;
        for hub in &metrics.hub_files {
            writeln!(w, "  {:<56} {:>6.3}", hub.path, hub.hub_score)?;
        }
    }

    if !metrics.abandoned_files.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Abandoned files")?;
        for file in &metrics.abandoned_files {
            writeln!(w, "  {}", file.path)?;
        }
    }

    writeln!(w)?;
    pretty_section(w, "Districts")?;
    writeln!(w, "  {:<40} {:>6} {:>8} {:>7}", "Path", "Files", "Rough", "Health")?;
    for district in &metrics.districts {
        writeln!(
            w,
            "  {:<40} {:>6} {:>8.3} {:>7}",
            display_district(&district.path),
            district.file_count,
            district.skyline_roughness,
            district.health_score
        )?;
    }
    Ok(())
}

/// The root district has an empty path.
fn display_district(path: &str) -> &str {
    if path.is_empty() { "." } else { path }
}
