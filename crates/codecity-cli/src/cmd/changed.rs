//! `codecity changed`: files touched by one commit.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use codecity_core::CommitLog;
use serde::Serialize;

use super::load_commits;
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `codecity changed`.
#[derive(Args, Debug)]
pub struct ChangedArgs {
    /// Commit log JSON, oldest commit first.
    #[arg(long, value_name = "FILE")]
    pub commits: PathBuf,

    /// Commit index to inspect.
    #[arg(long, value_name = "N")]
    pub at: usize,
}

#[derive(Debug, Serialize)]
struct ChangedOutput {
    index: usize,
    /// `None` when the index is past the end of the log.
    commit: Option<String>,
    changed_paths: Vec<String>,
}

/// Execute `codecity changed`.
pub fn run_changed(args: &ChangedArgs, output: OutputMode) -> anyhow::Result<()> {
    let log = load_commits(&args.commits, output)?;
    let report = changed_at(&log, args.at);
    render_mode(output, &report, render_changed_text, render_changed_pretty)
}

fn changed_at(log: &CommitLog, index: usize) -> ChangedOutput {
    ChangedOutput {
        index,
        commit: log.get(index).map(|commit| commit.hash.clone()),
        changed_paths: log.changed_paths(index).into_iter().collect(),
    }
}

fn render_changed_text(report: &ChangedOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for path in &report.changed_paths {
        writeln!(w, "{path}")?;
    }
    Ok(())
}

fn render_changed_pretty(report: &ChangedOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = report.commit.as_deref().map_or_else(
        || format!("Commit #{} (out of range)", report.index),
        |hash| format!("Commit #{} ({hash})", report.index),
    );
    pretty_section(w, &heading)?;
    if report.changed_paths.is_empty() {
        writeln!(w, "  (no files changed)")?;
    }
    for path in &report.changed_paths {
        writeln!(w, "  {path}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use codecity_core::model::{CommitRecord, FileChange};

    fn log() -> CommitLog {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid date");
        CommitLog::new(vec![
            CommitRecord::new("seed", ts)
                .with_change(FileChange::added("b/two.ts", 3))
                .with_change(FileChange::added("a/one.ts", 3)),
            CommitRecord::new("prune", ts)
                .with_change(FileChange::deleted("b/two.ts"))
                .with_change(FileChange::modified("a/one.ts", 1, 0)),
        ])
    }

    #[test]
    fn paths_are_sorted_and_skip_deletions() {
        assert_eq!(
            changed_at(&log(), 0).changed_paths,
            vec!["a/one.ts", "b/two.ts"]
        );
        assert_eq!(changed_at(&log(), 1).changed_paths, vec!["a/one.ts"]);
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let report = changed_at(&log(), 9);
        assert!(report.commit.is_none());
        assert!(report.changed_paths.is_empty());

        let mut out = Vec::new();
        render_changed_pretty(&report, &mut out).expect("render");
        assert!(String::from_utf8(out).expect("utf8").contains("out of range"));
    }

    #[test]
    fn text_is_one_path_per_line() {
        let mut out = Vec::new();
        render_changed_text(&changed_at(&log(), 0), &mut out).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "a/one.ts\nb/two.ts\n");
    }
}
