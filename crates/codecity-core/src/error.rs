use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    ConfigParseError,
    CommitLogInvalid,
    DependencyMapInvalid,
    LayoutInvalid,
    InputReadFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InputNotFound => "E1001",
            Self::ConfigParseError => "E1002",
            Self::CommitLogInvalid => "E2001",
            Self::DependencyMapInvalid => "E2002",
            Self::LayoutInvalid => "E2003",
            Self::InputReadFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InputNotFound => "Input file not found",
            Self::ConfigParseError => "Config file parse error",
            Self::CommitLogInvalid => "Commit log is not valid JSON",
            Self::DependencyMapInvalid => "Dependency map is not valid JSON",
            Self::LayoutInvalid => "Layout snapshot is not valid JSON",
            Self::InputReadFailed => "Input file read failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InputNotFound => Some("Check the path passed on the command line."),
            Self::ConfigParseError => Some("Fix syntax in .codecity/config.toml and retry."),
            Self::CommitLogInvalid => Some(
                "Expected an array of {hash, date, author_name, author_email, message, files}.",
            ),
            Self::DependencyMapInvalid => {
                Some("Expected an object mapping each file path to an array of paths.")
            }
            Self::LayoutInvalid => {
                Some("Expected a tree node with x, y, width and height on every node.")
            }
            Self::InputReadFailed => Some("Check file permissions and retry."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The external inputs the core knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    CommitLog,
    DependencyMap,
    LayoutSnapshot,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CommitLog => "commit log",
            Self::DependencyMap => "dependency map",
            Self::LayoutSnapshot => "layout snapshot",
        })
    }
}

/// Failure reading or decoding one of the external inputs.
///
/// These are the only errors the core produces: replay and analytics are
/// total over any well-formed input.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {kind} at {}: {source}", path.display())]
    Io {
        kind: InputKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind}: {source}")]
    Decode {
        kind: InputKind,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// The stable [`ErrorCode`] for this failure.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorCode::InputNotFound
            }
            Self::Io { .. } => ErrorCode::InputReadFailed,
            Self::Decode { kind, .. } => match kind {
                InputKind::CommitLog => ErrorCode::CommitLogInvalid,
                InputKind::DependencyMap => ErrorCode::DependencyMapInvalid,
                InputKind::LayoutSnapshot => ErrorCode::LayoutInvalid,
            },
        }
    }

    /// Remediation text for operators.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or("Retry once. If persistent, report a bug with logs.")
            .to_string()
    }
}
