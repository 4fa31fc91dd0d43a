//! Dependency map: file path to the paths it imports.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{InputKind, LoadError};
use crate::input;

/// Normalized dependency map.
///
/// Each target list is deduplicated (first occurrence wins) and never
/// contains its own source path. Targets may name files that do not exist
/// in a given snapshot; resolution happens in analytics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct DependencyIndex {
    map: BTreeMap<String, Vec<String>>,
}

impl DependencyIndex {
    /// Build from a raw map, normalizing every target list.
    #[must_use]
    pub fn from_map(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut dropped = 0_usize;
        let map = raw
            .into_iter()
            .map(|(source, targets)| {
                let before = targets.len();
                let mut seen = HashSet::with_capacity(before);
                let kept: Vec<String> = targets
                    .into_iter()
                    .filter(|target| *target != source && seen.insert(target.clone()))
                    .collect();
                dropped += before - kept.len();
                (source, kept)
            })
            .collect();
        if dropped > 0 {
            debug!(dropped, "dropped duplicate and self dependency edges");
        }
        Self { map }
    }

    /// Decode a dependency map from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Decode`] if the text is not a path-to-paths object.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        input::parse_json(raw, InputKind::DependencyMap).map(Self::from_map)
    }

    /// Read and decode a dependency map file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let index = Self::from_map(input::read_json_file(path, InputKind::DependencyMap)?);
        info!(path = %path.display(), sources = index.len(), "loaded dependency map");
        Ok(index)
    }

    /// Targets of `path`; empty when the path has no entry.
    #[must_use]
    pub fn targets(&self, path: &str) -> &[String] {
        self.map.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every `(from, to)` edge, sorted by source then declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |to| (from.as_str(), to.as_str()))
        })
    }

    /// Number of source paths with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for DependencyIndex {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        Self::from_map(raw)
    }
}

impl From<DependencyIndex> for BTreeMap<String, Vec<String>> {
    fn from(index: DependencyIndex) -> Self {
        index.map
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, Vec<T>)> for DependencyIndex {
    fn from_iter<I: IntoIterator<Item = (S, Vec<T>)>>(iter: I) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(source, targets)| {
                    (source.into(), targets.into_iter().map(Into::into).collect())
                })
                .collect(),
        )
    }
}
