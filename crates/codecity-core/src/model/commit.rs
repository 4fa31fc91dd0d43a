use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How a single file was touched by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
}

impl ChangeStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "A",
            Self::Modified => "M",
            Self::Deleted => "D",
            Self::Renamed => "R",
        }
    }

    /// Returns `true` for [`ChangeStatus::Deleted`].
    #[must_use]
    pub const fn is_deletion(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file-level entry of a commit: line counts plus status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    /// Lines added. A `null` in the input (binary files) reads as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub added: u64,
    /// Lines deleted. A `null` in the input reads as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub deleted: u64,
    pub status: ChangeStatus,
    /// Source path of a rename, when the extractor recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<String>,
}

impl FileChange {
    pub fn new(path: impl Into<String>, status: ChangeStatus, added: u64, deleted: u64) -> Self {
        Self {
            path: path.into(),
            added,
            deleted,
            status,
            previous_path: None,
        }
    }

    pub fn added(path: impl Into<String>, lines: u64) -> Self {
        Self::new(path, ChangeStatus::Added, lines, 0)
    }

    pub fn modified(path: impl Into<String>, added: u64, deleted: u64) -> Self {
        Self::new(path, ChangeStatus::Modified, added, deleted)
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self::new(path, ChangeStatus::Deleted, 0, 0)
    }

    pub fn renamed(
        from: impl Into<String>,
        to: impl Into<String>,
        added: u64,
        deleted: u64,
    ) -> Self {
        Self {
            previous_path: Some(from.into()),
            ..Self::new(to, ChangeStatus::Renamed, added, deleted)
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// A commit as emitted by the history extractor. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub files: Vec<FileChange>,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: hash.into(),
            timestamp,
            author_name: String::new(),
            author_email: String::new(),
            message: String::new(),
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_change(mut self, change: FileChange) -> Self {
        self.files.push(change);
        self
    }

    /// `Name <email>`, or whichever half is present.
    #[must_use]
    pub fn author(&self) -> String {
        match (self.author_name.is_empty(), self.author_email.is_empty()) {
            (false, false) => format!("{} <{}>", self.author_name, self.author_email),
            (false, true) => self.author_name.clone(),
            (true, false) => format!("<{}>", self.author_email),
            (true, true) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_uses_single_letter_codes() {
        assert_eq!(
            serde_json::to_string(&ChangeStatus::Deleted).expect("serialize"),
            "\"D\""
        );
        assert_eq!(
            serde_json::from_str::<ChangeStatus>("\"R\"").expect("parse"),
            ChangeStatus::Renamed
        );
        assert!(serde_json::from_str::<ChangeStatus>("\"X\"").is_err());
    }

    #[test]
    fn null_line_counts_read_as_zero() {
        let raw = r#"{"path": "img/logo.png", "added": null, "deleted": null, "status": "A"}"#;
        let change: FileChange = serde_json::from_str(raw).expect("parse");
        assert_eq!(change.added, 0);
        assert_eq!(change.deleted, 0);
        assert!(change.previous_path.is_none());
    }

    #[test]
    fn missing_line_counts_read_as_zero() {
        let raw = r#"{"path": "a.ts", "status": "M"}"#;
        let change: FileChange = serde_json::from_str(raw).expect("parse");
        assert_eq!((change.added, change.deleted), (0, 0));
    }

    #[test]
    fn commit_parses_iso_dates_with_offsets() {
        let raw = r#"{
            "hash": "abc123",
            "date": "2024-03-01T12:00:00+02:00",
            "author_name": "Sam",
            "author_email": "sam@example.com",
            "message": "init",
            "files": [{"path": "src/a.ts", "added": 10, "deleted": 0, "status": "A"}]
        }"#;
        let commit: CommitRecord = serde_json::from_str(raw).expect("parse");
        assert_eq!(
            commit.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).single().expect("valid")
        );
        assert_eq!(commit.files.len(), 1);
        assert_eq!(commit.author(), "Sam <sam@example.com>");
    }

    #[test]
    fn renamed_constructor_records_source() {
        let change = FileChange::renamed("old.ts", "new.ts", 1, 0);
        assert_eq!(change.status, ChangeStatus::Renamed);
        assert_eq!(change.previous_path.as_deref(), Some("old.ts"));
        assert_eq!(change.path, "new.ts");
    }
}
