//! The commit log and the time range it spans.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{InputKind, LoadError};
use crate::input;
use crate::model::commit::CommitRecord;
use crate::model::tree::TreeNode;
use crate::replay::{self, RenamePolicy, SnapshotCursor};

/// Oldest and newest commit timestamps of a log.
///
/// Computed once per log and passed explicitly to anything that needs a
/// recency baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub oldest: DateTime<Utc>,
    pub newest: DateTime<Utc>,
}

impl TimeRange {
    /// Min/max over every commit timestamp. `None` for an empty log.
    #[must_use]
    pub fn from_commits(commits: &[CommitRecord]) -> Option<Self> {
        let oldest = commits.iter().map(|c| c.timestamp).min()?;
        let newest = commits.iter().map(|c| c.timestamp).max()?;
        Some(Self { oldest, newest })
    }

    /// Map `ts` onto `[0, 1]` between oldest and newest.
    ///
    /// A missing timestamp is treated as the oldest (0). A zero-width range
    /// is widened to one millisecond.
    #[must_use]
    pub fn recency(&self, ts: Option<DateTime<Utc>>) -> f64 {
        let Some(ts) = ts else {
            return 0.0;
        };
        let span = (self.newest - self.oldest).num_milliseconds().max(1);
        let offset = (ts - self.oldest).num_milliseconds();
        #[allow(clippy::cast_precision_loss)]
        let ratio = offset as f64 / span as f64;
        ratio.clamp(0.0, 1.0)
    }
}

/// Commit records ordered oldest to newest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitLog {
    commits: Vec<CommitRecord>,
}

impl CommitLog {
    #[must_use]
    pub const fn new(commits: Vec<CommitRecord>) -> Self {
        Self { commits }
    }

    /// Decode a commit list from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] if the text is not a commit list.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        input::parse_json(raw, InputKind::CommitLog).map(Self::new)
    }

    /// Read and decode a commit list file.
    ///
    /// The log is used in file order; out-of-order timestamps only produce
    /// a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let log = Self::new(input::read_json_file(path, InputKind::CommitLog)?);
        if !log.is_chronological() {
            warn!(path = %path.display(), "commit log is not sorted oldest to newest");
        }
        info!(path = %path.display(), commits = log.len(), "loaded commit log");
        Ok(log)
    }

    #[must_use]
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CommitRecord> {
        self.commits.get(index)
    }

    #[must_use]
    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::from_commits(&self.commits)
    }

    /// `true` when timestamps never decrease along the log.
    #[must_use]
    pub fn is_chronological(&self) -> bool {
        self.commits
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// Snapshot after `commits[..=upto]`.
    #[must_use]
    pub fn reconstruct(&self, upto: usize, policy: RenamePolicy) -> TreeNode {
        replay::reconstruct_with(&self.commits, upto, policy)
    }

    /// Paths touched (not deleted) by the commit at `index`.
    #[must_use]
    pub fn changed_paths(&self, index: usize) -> BTreeSet<String> {
        replay::changed_paths(&self.commits, index)
    }

    #[must_use]
    pub fn cursor(&self, policy: RenamePolicy) -> SnapshotCursor<'_> {
        SnapshotCursor::new(&self.commits, policy)
    }
}

impl From<Vec<CommitRecord>> for CommitLog {
    fn from(commits: Vec<CommitRecord>) -> Self {
        Self::new(commits)
    }
}
