#![forbid(unsafe_code)]
//! codecity-core library.
//!
//! Commit-log replay into file-tree snapshots, plus the input types the
//! analytics crate consumes.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the I/O boundary ([`error::LoadError`]),
//!   `anyhow::Result` for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod deps;
pub mod error;
pub mod history;
mod input;
pub mod model;
pub mod replay;

pub use deps::DependencyIndex;
pub use error::{ErrorCode, InputKind, LoadError};
pub use history::{CommitLog, TimeRange};
pub use replay::{RenamePolicy, Replayer, SnapshotCursor, changed_paths, reconstruct, reconstruct_with};
