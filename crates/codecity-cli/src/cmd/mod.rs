pub mod analyze;
pub mod changed;
pub mod replay;
pub mod timeline;

use std::path::Path;

use clap::ValueEnum;
use codecity_core::config::ProjectConfig;
use codecity_core::{CommitLog, RenamePolicy};

use crate::output::{OutputMode, report_load};

/// `--rename` values; mirrors `[replay] rename` in the project config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenameArg {
    /// Upsert the new path only.
    Modify,
    /// Move the node from its previous path.
    Move,
}

impl From<RenameArg> for RenamePolicy {
    fn from(arg: RenameArg) -> Self {
        match arg {
            RenameArg::Modify => Self::TreatAsModify,
            RenameArg::Move => Self::Move,
        }
    }
}

/// The flag wins over the project config.
pub fn rename_policy(flag: Option<RenameArg>, config: &ProjectConfig) -> RenamePolicy {
    flag.map_or(config.replay.rename, RenamePolicy::from)
}

/// Load a commit log, rendering a structured error on failure.
pub fn load_commits(path: &Path, output: OutputMode) -> anyhow::Result<CommitLog> {
    report_load(output, CommitLog::load(path))
}
