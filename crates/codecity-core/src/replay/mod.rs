//! Temporal tree reconstruction.
//!
//! Replays a prefix of the commit log into a [`TreeNode`] snapshot. Each
//! call starts from an empty root, so snapshots at different indices never
//! share structure and can be built on separate threads.
//!
//! # Algorithm
//!
//! For every commit in `commits[..=upto]`, in order, and every file change
//! in commit order:
//!
//! 1. Split the path into directory segments and a file name; skip the
//!    change if the name is empty.
//! 2. Deleted: detach the file and prune directories left empty, stopping
//!    at the first non-empty ancestor or at the root. Missing paths are a
//!    no-op.
//! 3. Anything else: find or create the directory chain and the file, then
//!    `size = max(0, size + added - deleted)`, bump the cumulative counters,
//!    and stamp `last_modified` with the commit time.
//!
//! Renames follow the configured [`RenamePolicy`].
//!
//! [`SnapshotCursor`] replays incrementally for the common "scrub forward
//! through history" access pattern and produces identical trees.

mod cursor;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::model::commit::{ChangeStatus, CommitRecord, FileChange};
use crate::model::tree::{TreeNode, join_path, split_path};

pub use cursor::SnapshotCursor;

/// How `R` (renamed) changes are replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenamePolicy {
    /// Upsert at the new path exactly like a modification; the old path is
    /// left to an explicit delete, if the log has one.
    #[default]
    #[serde(rename = "modify")]
    TreatAsModify,
    /// Move the node from `previous_path` to the new path, keeping its size
    /// and counters, then apply the line counts.
    #[serde(rename = "move")]
    Move,
}

/// Applies commits one at a time to an owned tree.
#[derive(Debug, Clone)]
pub struct Replayer {
    root: TreeNode,
    policy: RenamePolicy,
    applied: usize,
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(RenamePolicy::default())
    }
}

impl Replayer {
    #[must_use]
    pub fn new(policy: RenamePolicy) -> Self {
        Self {
            root: TreeNode::root(),
            policy,
            applied: 0,
        }
    }

    /// Number of commits applied so far.
    #[must_use]
    pub const fn applied(&self) -> usize {
        self.applied
    }

    #[must_use]
    pub const fn policy(&self) -> RenamePolicy {
        self.policy
    }

    #[must_use]
    pub const fn tree(&self) -> &TreeNode {
        &self.root
    }

    #[must_use]
    pub fn into_tree(self) -> TreeNode {
        self.root
    }

    /// Apply every file change of `commit`, in order.
    pub fn apply(&mut self, commit: &CommitRecord) {
        trace!(hash = %commit.hash, changes = commit.files.len(), "applying commit");
        for change in &commit.files {
            self.apply_change(change, commit.timestamp);
        }
        self.applied += 1;
    }

    fn apply_change(&mut self, change: &FileChange, timestamp: DateTime<Utc>) {
        let Some((dirs, name)) = split_path(&change.path) else {
            debug!(path = %change.path, "skipping change with empty file name");
            return;
        };

        match change.status {
            ChangeStatus::Deleted => {
                if self.root.remove_file(&dirs, name).is_none() {
                    trace!(path = %change.path, "delete of absent file ignored");
                }
            }
            ChangeStatus::Renamed if self.policy == RenamePolicy::Move => {
                self.apply_move(change, &dirs, name, timestamp);
            }
            ChangeStatus::Added | ChangeStatus::Modified | ChangeStatus::Renamed => {
                self.upsert(change, &dirs, name, timestamp);
            }
        }
    }

    fn upsert(&mut self, change: &FileChange, dirs: &[&str], name: &str, timestamp: DateTime<Utc>) {
        let Some(file) = self.root.file_entry(dirs, name) else {
            debug!(path = %change.path, "skipping change that collides with an existing node");
            return;
        };
        file.size = file.size.saturating_add(change.added).saturating_sub(change.deleted);
        file.last_modified = Some(timestamp);
        file.total_added = file.total_added.saturating_add(change.added);
        file.total_deleted = file.total_deleted.saturating_add(change.deleted);
    }

    fn apply_move(
        &mut self,
        change: &FileChange,
        dirs: &[&str],
        name: &str,
        timestamp: DateTime<Utc>,
    ) {
        let source = change
            .previous_path
            .as_deref()
            .filter(|previous| *previous != change.path)
            .and_then(split_path)
            .filter(|(src_dirs, src_name)| {
                self.root.find(&src_dirs.join("/")).is_some_and(|dir| {
                    dir.child(src_name).is_some_and(TreeNode::is_file)
                })
            });

        let Some((src_dirs, src_name)) = source else {
            self.upsert(change, dirs, name, timestamp);
            return;
        };

        // Claim the destination first so a conflict leaves the source intact.
        if self.root.file_entry(dirs, name).is_none() {
            debug!(path = %change.path, "skipping rename that collides with an existing node");
            return;
        }
        let Some(moved) = self.root.remove_file(&src_dirs, src_name) else {
            return;
        };
        if let Some(file) = self.root.file_entry(dirs, name) {
            file.size = moved.size;
            file.total_added = file.total_added.saturating_add(moved.total_added);
            file.total_deleted = file.total_deleted.saturating_add(moved.total_deleted);
            file.last_modified = moved.last_modified.or(file.last_modified);
        }
        self.upsert(change, dirs, name, timestamp);
    }
}

/// Reconstruct the snapshot after `commits[..=upto]`, treating renames as
/// modifications.
///
/// An `upto` past the end replays the whole log; an empty log yields an
/// empty root.
#[must_use]
pub fn reconstruct(commits: &[CommitRecord], upto: usize) -> TreeNode {
    reconstruct_with(commits, upto, RenamePolicy::default())
}

/// [`reconstruct`] with an explicit rename policy.
#[must_use]
#[instrument(skip(commits), fields(commits = commits.len()))]
pub fn reconstruct_with(commits: &[CommitRecord], upto: usize, policy: RenamePolicy) -> TreeNode {
    let end = upto.saturating_add(1).min(commits.len());
    let mut replayer = Replayer::new(policy);
    for commit in &commits[..end] {
        replayer.apply(commit);
    }
    debug!(applied = replayer.applied(), "reconstructed snapshot");
    replayer.into_tree()
}

/// File paths touched by the commit at `index`, excluding deletions.
///
/// Paths are normalized the way replay names tree nodes, so they compare
/// equal to [`TreeNode::path`]. Used to highlight recently changed nodes. An out-of-range index yields
/// an empty set.
#[must_use]
pub fn changed_paths(commits: &[CommitRecord], index: usize) -> BTreeSet<String> {
    commits
        .get(index)
        .map(|commit| {
            commit
                .files
                .iter()
                .filter(|change| !change.status.is_deletion())
                .filter_map(|change| split_path(&change.path))
                .map(|(dirs, name)| join_path(&dirs.join("/"), name))
                .collect()
        })
        .unwrap_or_default()
}
