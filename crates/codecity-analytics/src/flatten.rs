//! Layout snapshot to flat file records.

use chrono::{DateTime, Utc};
use codecity_core::model::LayoutNode;
use serde::{Deserialize, Serialize};

/// Smallest building height, so empty files stay visible.
pub const MIN_WORLD_HEIGHT: f64 = 0.2;

/// World height per line of code.
pub const HEIGHT_PER_LINE: f64 = 0.1;

/// One file of a layout snapshot, positioned in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatFileRecord {
    pub path: String,
    pub name: String,
    /// Rectangle center on the layout's x axis.
    pub world_x: f64,
    /// Rectangle center on the layout's y axis.
    pub world_z: f64,
    pub world_height: f64,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub total_added: u64,
    pub total_deleted: u64,
    /// Path of the immediate parent directory.
    pub district_path: String,
}

/// Building height for a file of `size` lines.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn world_height(size: u64) -> f64 {
    (size as f64 * HEIGHT_PER_LINE).max(MIN_WORLD_HEIGHT)
}

/// Collect every file of `root`, depth-first in child order.
#[must_use]
pub fn flatten(root: &LayoutNode) -> Vec<FlatFileRecord> {
    let mut out = Vec::new();
    collect(root, "", &mut out);
    out
}

fn collect(node: &LayoutNode, parent_path: &str, out: &mut Vec<FlatFileRecord>) {
    if node.is_file() {
        let (world_x, world_z) = node.rect.center();
        out.push(FlatFileRecord {
            path: node.path.clone(),
            name: node.name.clone(),
            world_x,
            world_z,
            world_height: world_height(node.size),
            size: node.size,
            last_modified: node.last_modified,
            total_added: node.total_added,
            total_deleted: node.total_deleted,
            district_path: parent_path.to_string(),
        });
        return;
    }
    for child in &node.children {
        collect(child, &node.path, out);
    }
}

/// Last segment of a district path (the whole path when it has no `/`).
#[must_use]
pub fn district_name(district_path: &str) -> &str {
    district_path
        .rsplit_once('/')
        .map_or(district_path, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecity_core::model::{NodeKind, Rect};

    fn node(kind: NodeKind, path: &str, rect: Rect, children: Vec<LayoutNode>) -> LayoutNode {
        LayoutNode {
            name: path.rsplit('/').next().unwrap_or_default().to_string(),
            path: path.to_string(),
            kind,
            size: 0,
            last_modified: None,
            total_added: 0,
            total_deleted: 0,
            rect,
            children,
        }
    }

    fn file(path: &str, size: u64, rect: Rect) -> LayoutNode {
        LayoutNode {
            size,
            ..node(NodeKind::File, path, rect, Vec::new())
        }
    }

    #[test]
    fn records_follow_child_order_with_parent_district() {
        let root = node(
            NodeKind::Directory,
            "",
            Rect::new(0.0, 0.0, 100.0, 100.0),
            vec![
                file("top.ts", 5, Rect::new(0.0, 0.0, 10.0, 10.0)),
                node(
                    NodeKind::Directory,
                    "src/ui",
                    Rect::new(10.0, 0.0, 90.0, 100.0),
                    vec![file("src/ui/button.ts", 40, Rect::new(20.0, 30.0, 4.0, 8.0))],
                ),
            ],
        );

        let flat = flatten(&root);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].path, "top.ts");
        assert_eq!(flat[0].district_path, "");
        assert_eq!(flat[1].district_path, "src/ui");
        assert_eq!((flat[1].world_x, flat[1].world_z), (22.0, 34.0));
        assert!((flat[1].world_height - 4.0).abs() < 1e-12);
    }

    #[test]
    fn small_files_get_minimum_height() {
        assert!((world_height(0) - MIN_WORLD_HEIGHT).abs() < f64::EPSILON);
        assert!((world_height(1) - MIN_WORLD_HEIGHT).abs() < f64::EPSILON);
        assert!((world_height(3) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn empty_root_flattens_to_nothing() {
        let root = node(NodeKind::Directory, "", Rect::default(), Vec::new());
        assert!(flatten(&root).is_empty());
    }

    #[test]
    fn district_name_is_last_segment() {
        assert_eq!(district_name("src/ui"), "ui");
        assert_eq!(district_name("src"), "src");
        assert_eq!(district_name(""), "");
    }
}
