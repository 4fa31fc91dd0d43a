//! JSON decoding shared by the external input types.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{InputKind, LoadError};

pub(crate) fn parse_json<T: DeserializeOwned>(raw: &str, kind: InputKind) -> Result<T, LoadError> {
    serde_json::from_str(raw).map_err(|source| LoadError::Decode { kind, source })
}

pub(crate) fn read_json_file<T: DeserializeOwned>(
    path: &Path,
    kind: InputKind,
) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&raw, kind)
}
