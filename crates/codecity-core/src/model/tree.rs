//! File/directory snapshot tree.
//!
//! Every directory owns its children outright (`Vec<TreeNode>`), so a tree
//! is a plain value: cloning it yields an independent snapshot and mutation
//! never reaches another snapshot. The mutating helpers used by replay work
//! on child positions inside those owned vectors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Node discriminator. Serialized as `"file"` / `"directory"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// A file or directory in a reconstructed snapshot.
///
/// Directory `size` is always 0 here; consumers that need a directory's
/// weight use [`TreeNode::total_size`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// An empty root directory (`path = ""`).
    #[must_use]
    pub fn root() -> Self {
        Self::directory("root", "")
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            size: 0,
            last_modified: None,
            total_added: 0,
            total_deleted: 0,
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::File,
            ..Self::directory(name, path)
        }
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    /// Direct child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Look up a descendant by `/`-separated path relative to this node.
    ///
    /// An empty path returns `self`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Self> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Depth-first iterator over every file below (or at) this node.
    #[must_use]
    pub fn files(&self) -> Files<'_> {
        Files { stack: vec![self] }
    }

    /// Number of files below this node.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Number of directories strictly below this node.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.children
            .iter()
            .filter(|c| c.is_directory())
            .map(|c| 1 + c.directory_count())
            .sum()
    }

    /// Layout weight: the node's own size for a file, the sum of descendant
    /// file sizes for a directory.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files().map(|f| f.size).fold(0, u64::saturating_add)
    }

    /// Walk (creating as needed) the directory chain `segments` below this
    /// node.
    ///
    /// Returns `None` when a segment names an existing file; nothing is
    /// created in that case because every segment before the conflict
    /// already existed.
    pub(crate) fn ensure_directory(&mut self, segments: &[&str]) -> Option<&mut Self> {
        let mut current = self;
        for segment in segments {
            let pos = match current.children.iter().position(|c| c.name == *segment) {
                Some(pos) if current.children[pos].is_directory() => pos,
                Some(_) => return None,
                None => {
                    let path = join_path(&current.path, segment);
                    current.children.push(Self::directory(*segment, path));
                    current.children.len() - 1
                }
            };
            current = &mut current.children[pos];
        }
        Some(current)
    }

    /// Find or create the file `name` under the directory chain `dirs`.
    ///
    /// Returns `None` on a file/directory name conflict.
    pub(crate) fn file_entry(&mut self, dirs: &[&str], name: &str) -> Option<&mut Self> {
        let dir = self.ensure_directory(dirs)?;
        let pos = match dir.children.iter().position(|c| c.name == name) {
            Some(pos) if dir.children[pos].is_file() => pos,
            Some(_) => return None,
            None => {
                let path = join_path(&dir.path, name);
                dir.children.push(Self::file(name, path));
                dir.children.len() - 1
            }
        };
        Some(&mut dir.children[pos])
    }

    /// Detach the file `name` under `dirs`, pruning every directory left
    /// empty on the way back up. `self` is never pruned.
    ///
    /// Returns `None` (and changes nothing) when any part of the path is
    /// missing.
    pub(crate) fn remove_file(&mut self, dirs: &[&str], name: &str) -> Option<Self> {
        match dirs.split_first() {
            None => {
                let pos = self
                    .children
                    .iter()
                    .position(|c| c.name == name && c.is_file())?;
                Some(self.children.remove(pos))
            }
            Some((head, rest)) => {
                let pos = self
                    .children
                    .iter()
                    .position(|c| c.name == *head && c.is_directory())?;
                let removed = self.children[pos].remove_file(rest, name)?;
                if self.children[pos].children.is_empty() {
                    self.children.remove(pos);
                }
                Some(removed)
            }
        }
    }
}

/// Iterator returned by [`TreeNode::files`].
#[derive(Debug)]
pub struct Files<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Files<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.is_file() {
                return Some(node);
            }
            self.stack.extend(node.children.iter().rev());
        }
        None
    }
}

/// Split a change path into directory segments and the file name.
///
/// Empty directory segments (`a//b`, a leading `/`) are dropped. Returns
/// `None` when the file name is empty (e.g. a trailing `/`).
#[must_use]
pub fn split_path(path: &str) -> Option<(Vec<&str>, &str)> {
    let (dir_part, name) = path.rsplit_once('/').unwrap_or(("", path));
    if name.is_empty() {
        return None;
    }
    let dirs = dir_part.split('/').filter(|s| !s.is_empty()).collect();
    Some((dirs, name))
}

/// Join a parent path and a child name the way tree paths are built.
#[must_use]
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        let mut root = TreeNode::root();
        root.file_entry(&["src", "ui"], "button.ts")
            .expect("create")
            .size = 40;
        root.file_entry(&["src"], "main.ts").expect("create").size = 10;
        root.file_entry(&[], "README").expect("create").size = 3;
        root
    }

    #[test]
    fn total_size_saturates() {
        let mut root = TreeNode::root();
        root.file_entry(&[], "a.bin").expect("create").size = u64::MAX;
        root.file_entry(&[], "b.bin").expect("create").size = 1;
        assert_eq!(root.total_size(), u64::MAX);
    }

    #[test]
    fn split_path_separates_directories_and_name() {
        assert_eq!(
            split_path("src/ui/button.ts"),
            Some((vec!["src", "ui"], "button.ts"))
        );
        assert_eq!(split_path("README"), Some((vec![], "README")));
        assert_eq!(split_path("/a//b.ts"), Some((vec!["a"], "b.ts")));
    }

    #[test]
    fn split_path_rejects_empty_file_name() {
        assert_eq!(split_path(""), None);
        assert_eq!(split_path("src/"), None);
    }

    #[test]
    fn file_entry_builds_paths_from_ancestors() {
        let root = sample();
        let button = root.find("src/ui/button.ts").expect("present");
        assert_eq!(button.path, "src/ui/button.ts");
        assert!(button.is_file());
        let ui = root.find("src/ui").expect("present");
        assert_eq!(ui.path, "src/ui");
        assert!(ui.is_directory());
        assert_eq!(root.find("").map(|n| n.path.as_str()), Some(""));
    }

    #[test]
    fn file_entry_reuses_existing_nodes() {
        let mut root = sample();
        root.file_entry(&["src"], "main.ts").expect("existing").size += 1;
        assert_eq!(root.find("src/main.ts").map(|n| n.size), Some(11));
        assert_eq!(root.child("src").map(|s| s.children.len()), Some(2));
    }

    #[test]
    fn name_conflicts_are_refused() {
        let mut root = sample();
        // `README` is a file, so it cannot become a directory.
        assert!(root.file_entry(&["README"], "x.ts").is_none());
        // `src/ui` is a directory, so it cannot become a file.
        assert!(root.file_entry(&["src"], "ui").is_none());
        assert_eq!(root.file_count(), 3);
    }

    #[test]
    fn remove_file_prunes_empty_ancestors() {
        let mut root = sample();
        let removed = root.remove_file(&["src", "ui"], "button.ts");
        assert_eq!(removed.map(|n| n.size), Some(40));
        assert!(root.find("src/ui").is_none());
        assert!(root.find("src").is_some(), "src still holds main.ts");

        root.remove_file(&["src"], "main.ts").expect("present");
        assert!(root.find("src").is_none());
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn remove_missing_file_is_a_no_op() {
        let mut root = sample();
        let before = root.clone();
        assert!(root.remove_file(&["nope"], "button.ts").is_none());
        assert!(root.remove_file(&["src"], "gone.ts").is_none());
        assert!(root.remove_file(&["src"], "ui").is_none(), "directories are not files");
        assert_eq!(root, before);
    }

    #[test]
    fn counts_and_sizes() {
        let root = sample();
        assert_eq!(root.file_count(), 3);
        assert_eq!(root.directory_count(), 2);
        assert_eq!(root.total_size(), 53);
        assert_eq!(root.find("src").map(TreeNode::total_size), Some(50));
    }

    #[test]
    fn serializes_with_type_tag_and_camel_case() {
        let root = sample();
        let json = serde_json::to_value(&root).expect("serialize");
        assert_eq!(json["type"], "directory");
        let readme = &json["children"][1];
        assert_eq!(readme["type"], "file");
        assert_eq!(readme["totalAdded"], 0);
        assert!(readme.get("children").is_none());

        let back: TreeNode = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, root);
    }
}
