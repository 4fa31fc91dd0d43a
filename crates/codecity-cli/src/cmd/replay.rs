//! `codecity replay`: reconstruct the file tree at one point in history.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use codecity_core::config::ProjectConfig;
use codecity_core::model::{CommitRecord, TreeNode};
use codecity_core::{CommitLog, RenamePolicy, TimeRange};
use serde::Serialize;

use super::{RenameArg, load_commits, rename_policy};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `codecity replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Commit log JSON, oldest commit first.
    #[arg(long, value_name = "FILE")]
    pub commits: PathBuf,

    /// Replay through this commit index (default: the whole log).
    #[arg(long, value_name = "N")]
    pub at: Option<usize>,

    /// How renamed files are replayed (overrides the project config).
    #[arg(long, value_enum)]
    pub rename: Option<RenameArg>,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    commit_count: usize,
    /// Effective index after clamping; `None` for an empty log.
    index: Option<usize>,
    commit: Option<String>,
    /// Author of the commit at `index`, when the log records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    file_count: usize,
    directory_count: usize,
    total_size: u64,
    /// Span of the replayed prefix.
    time_range: Option<TimeRange>,
    tree: TreeNode,
}

/// Execute `codecity replay`.
pub fn run_replay(
    args: &ReplayArgs,
    output: OutputMode,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    let log = load_commits(&args.commits, output)?;
    let report = snapshot(&log, args.at, rename_policy(args.rename, config));
    render_mode(output, &report, render_replay_text, render_replay_pretty)
}

fn snapshot(log: &CommitLog, at: Option<usize>, policy: RenamePolicy) -> ReplayOutput {
    let index = log
        .len()
        .checked_sub(1)
        .map(|last| at.map_or(last, |at| at.min(last)));
    let tree = log.reconstruct(index.unwrap_or(0), policy);
    let time_range =
        index.and_then(|index| TimeRange::from_commits(&log.commits()[..=index]));
    let commit = index.and_then(|index| log.get(index));

    ReplayOutput {
        commit_count: log.len(),
        index,
        commit: commit.map(|commit| commit.hash.clone()),
        author: commit
            .map(CommitRecord::author)
            .filter(|author| !author.is_empty()),
        file_count: tree.file_count(),
        directory_count: tree.directory_count(),
        total_size: tree.total_size(),
        time_range,
        tree,
    }
}

fn render_replay_text(report: &ReplayOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "commits={}", report.commit_count)?;
    if let Some(index) = report.index {
        writeln!(w, "index={index}")?;
    }
    if let Some(ref hash) = report.commit {
        writeln!(w, "commit={hash}")?;
    }
    if let Some(ref author) = report.author {
        writeln!(w, "author={author}")?;
    }
    writeln!(w, "files={}", report.file_count)?;
    writeln!(w, "directories={}", report.directory_count)?;
    writeln!(w, "total_size={}", report.total_size)?;
    if let Some(range) = report.time_range {
        writeln!(w, "oldest={}", range.oldest.to_rfc3339())?;
        writeln!(w, "newest={}", range.newest.to_rfc3339())?;
    }
    Ok(())
}

fn render_replay_pretty(report: &ReplayOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Snapshot")?;
    let position = match (report.index, report.commit.as_deref()) {
        (Some(index), Some(hash)) => {
            format!("{} of {} ({hash})", index + 1, report.commit_count)
        }
        _ => "empty log".to_string(),
    };
    pretty_kv(w, "Commit", position)?;
    if let Some(ref author) = report.author {
        pretty_kv(w, "Author", author)?;
    }
    pretty_kv(w, "Files", report.file_count.to_string())?;
    pretty_kv(w, "Directories", report.directory_count.to_string())?;
    pretty_kv(w, "Total size", format!("{} lines", report.total_size))?;
    if let Some(range) = report.time_range {
        pretty_kv(
            w,
            "Time range",
            format!(
                "{} .. {}",
                range.oldest.format("%Y-%m-%d %H:%M"),
                range.newest.format("%Y-%m-%d %H:%M")
            ),
        )?;
    }
    Ok(())
}
