//! Data model shared by replay and analytics.
//!
//! - [`commit`]: commit log records (external input).
//! - [`tree`]: reconstructed file/directory snapshots.
//! - [`layout`]: snapshots annotated with rectangles by the layout component.

pub mod commit;
pub mod layout;
pub mod tree;

pub use commit::{ChangeStatus, CommitRecord, FileChange};
pub use layout::{LayoutNode, Rect};
pub use tree::{NodeKind, TreeNode};
