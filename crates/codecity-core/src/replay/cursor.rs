use tracing::debug;

use crate::model::commit::CommitRecord;
use crate::model::tree::TreeNode;

use super::{RenamePolicy, Replayer};

/// Incremental replay over a borrowed commit log.
///
/// Seeking forward applies only the commits in between; seeking backward
/// rebuilds from an empty root. Every position yields the same tree as
/// [`super::reconstruct_with`] at that index.
#[derive(Debug)]
pub struct SnapshotCursor<'a> {
    commits: &'a [CommitRecord],
    replayer: Replayer,
}

impl<'a> SnapshotCursor<'a> {
    #[must_use]
    pub fn new(commits: &'a [CommitRecord], policy: RenamePolicy) -> Self {
        Self {
            commits,
            replayer: Replayer::new(policy),
        }
    }

    /// Index of the last applied commit, or `None` before the first seek.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.replayer.applied().checked_sub(1)
    }

    /// The snapshot at the current position.
    #[must_use]
    pub const fn tree(&self) -> &TreeNode {
        self.replayer.tree()
    }

    /// Move to the snapshot after `commits[..=index]` and return it.
    ///
    /// An index past the end clamps to the last commit.
    pub fn seek(&mut self, index: usize) -> &TreeNode {
        let target = index.saturating_add(1).min(self.commits.len());
        if target < self.replayer.applied() {
            debug!(from = self.replayer.applied(), to = target, "rewinding cursor");
            self.replayer = Replayer::new(self.replayer.policy());
        }
        for commit in &self.commits[self.replayer.applied()..target] {
            self.replayer.apply(commit);
        }
        self.replayer.tree()
    }
}
