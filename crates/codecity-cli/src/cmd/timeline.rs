//! `codecity timeline`: snapshot statistics along the history.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;
use codecity_core::config::ProjectConfig;
use codecity_core::{CommitLog, RenamePolicy};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::{RenameArg, load_commits, rename_policy};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `codecity timeline`.
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Commit log JSON, oldest commit first.
    #[arg(long, value_name = "FILE")]
    pub commits: PathBuf,

    /// Sample every K-th commit. The last commit is always included.
    #[arg(long, value_name = "K", default_value = "1")]
    pub step: NonZeroUsize,

    /// How renamed files are replayed (overrides the project config).
    #[arg(long, value_enum)]
    pub rename: Option<RenameArg>,
}

#[derive(Debug, Serialize)]
struct TimelineOutput {
    commit_count: usize,
    step: usize,
    points: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, Serialize)]
struct TimelinePoint {
    index: usize,
    commit: String,
    date: DateTime<Utc>,
    file_count: usize,
    directory_count: usize,
    total_size: u64,
    changed: usize,
}

/// Execute `codecity timeline`.
pub fn run_timeline(
    args: &TimelineArgs,
    output: OutputMode,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    let log = load_commits(&args.commits, output)?;
    let report = TimelineOutput {
        commit_count: log.len(),
        step: args.step.get(),
        points: timeline(&log, args.step, rename_policy(args.rename, config)),
    };
    render_mode(output, &report, render_timeline_text, render_timeline_pretty)
}

/// `0, K, 2K, …` plus the last index.
fn sample_indices(len: usize, step: NonZeroUsize) -> Vec<usize> {
    let Some(last) = len.checked_sub(1) else {
        return Vec::new();
    };
    let mut indices: Vec<usize> = (0..len).step_by(step.get()).collect();
    if indices.last() != Some(&last) {
        indices.push(last);
    }
    indices
}

/// Each sampled snapshot is rebuilt independently, so they replay in
/// parallel; `collect` keeps index order.
fn timeline(log: &CommitLog, step: NonZeroUsize, policy: RenamePolicy) -> Vec<TimelinePoint> {
    let indices = sample_indices(log.len(), step);
    debug!(samples = indices.len(), commits = log.len(), "building timeline");

    indices
        .par_iter()
        .filter_map(|&index| {
            let commit = log.get(index)?;
            let tree = log.reconstruct(index, policy);
            Some(TimelinePoint {
                index,
                commit: commit.hash.clone(),
                date: commit.timestamp,
                file_count: tree.file_count(),
                directory_count: tree.directory_count(),
                total_size: tree.total_size(),
                changed: log.changed_paths(index).len(),
            })
        })
        .collect()
}

fn render_timeline_text(report: &TimelineOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "index\tcommit\tdate\tfiles\tdirectories\ttotal_size\tchanged")?;
    for point in &report.points {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            point.index,
            point.commit,
            point.date.to_rfc3339(),
            point.file_count,
            point.directory_count,
            point.total_size,
            point.changed
        )?;
    }
    Ok(())
}

fn render_timeline_pretty(report: &TimelineOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Timeline ({} of {} commits, every {})",
            report.points.len(),
            report.commit_count,
            report.step
        ),
    )?;
    writeln!(
        w,
        "{:>6}  {:<10}  {:<16}  {:>6}  {:>5}  {:>10}",
        "#", "Commit", "Date", "Files", "Dirs", "Size"
    )?;
    for point in &report.points {
        let short: String = point.commit.chars().take(10).collect();
        writeln!(
            w,
            "{:>6}  {:<10}  {:<16}  {:>6}  {:>5}  {:>10}",
            point.index,
            short,
            point.date.format("%Y-%m-%d %H:%M"),
            point.file_count,
            point.directory_count,
            point.total_size
        )?;
    }
    Ok(())
}
