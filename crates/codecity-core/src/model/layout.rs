//! Layout snapshot: a [`TreeNode`] annotated with 2D rectangles.
//!
//! The rectangle packing itself happens outside this workspace. This module
//! only defines the shape the analytics engine reads, how it is decoded, and
//! a helper for layout implementors to decorate a reconstructed tree.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InputKind, LoadError};
use crate::input;
use crate::model::tree::{NodeKind, TreeNode};

/// Axis-aligned rectangle in layout space (`x`/`y` is the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point; the layout's second axis becomes world Z.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A tree node plus its rectangle, as produced by the layout component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_added: u64,
    #[serde(default)]
    pub total_deleted: u64,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Decorate `tree` with rectangles chosen by `place`, preserving child
    /// order.
    pub fn from_tree(tree: &TreeNode, place: &mut impl FnMut(&TreeNode) -> Rect) -> Self {
        Self {
            name: tree.name.clone(),
            path: tree.path.clone(),
            kind: tree.kind,
            size: tree.size,
            last_modified: tree.last_modified,
            total_added: tree.total_added,
            total_deleted: tree.total_deleted,
            rect: place(tree),
            children: tree
                .children
                .iter()
                .map(|child| Self::from_tree(child, place))
                .collect(),
        }
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Decode a layout snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] if the text is not a valid snapshot.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        input::parse_json(raw, InputKind::LayoutSnapshot)
    }

    /// Read and decode a layout snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        input::read_json_file(path, InputKind::LayoutSnapshot)
    }
}
