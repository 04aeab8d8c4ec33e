//! Loading the raw export into memory.
//!
//! This is the only asynchronous step: the export is read once, before any
//! query runs, and everything after works on the in-memory posts.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::posts::RawPost;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse export file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and wrap every post in the export file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON. A
/// well-formed file whose top level is not an array yields no posts.
pub async fn load_posts(path: &Path) -> Result<Vec<RawPost>, LoadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read export file");

    let posts = parse_posts(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), count = posts.len(), "Loaded posts");

    Ok(posts)
}

/// Wrap every post in an export document.
///
/// # Errors
///
/// Returns an error if `bytes` is not valid JSON.
pub fn parse_posts(bytes: &[u8]) -> Result<Vec<RawPost>, serde_json::Error> {
    let document: Value = serde_json::from_slice(bytes)?;
    Ok(posts_from_value(document))
}

/// Wrap every element of an export array. Anything else yields no posts.
#[must_use]
pub fn posts_from_value(document: Value) -> Vec<RawPost> {
    match document {
        Value::Array(items) => items.into_iter().map(RawPost::from).collect(),
        other => {
            warn!(kind = json_kind(&other), "Export is not an array, treating as empty");
            Vec::new()
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let posts = parse_posts(br#"[{"title": "a"}, {}, "junk"]"#).unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].text(), "a");
        assert_eq!(posts[2].text(), "");
    }

    #[test]
    fn test_parse_non_array() {
        assert!(parse_posts(br#"{"posts": []}"#).unwrap().is_empty());
        assert!(parse_posts(b"null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_posts(b"[{").is_err());
    }
}
