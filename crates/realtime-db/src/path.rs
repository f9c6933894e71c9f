//! Paths into the store tree, written as `/`-separated keys.

use crate::{StoreError, StoreResult};

const FORBIDDEN: [char; 5] = ['.', '$', '#', '[', ']'];

/// Splits a path into its keys without validating them. Used for paths that
/// come from the server.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|key| !key.is_empty()).collect()
}

/// Splits a caller-supplied path, rejecting keys the store would refuse.
/// The empty path (or `/`) addresses the root.
pub fn segments(path: &str) -> StoreResult<Vec<&str>> {
    let keys = split(path);
    for key in &keys {
        check_key(path, key)?;
    }
    Ok(keys)
}

/// Joins `parent` and a single `key`, which may not itself contain `/`.
pub fn child(parent: &str, key: &str) -> StoreResult<String> {
    if key.contains('/') {
        return Err(StoreError::InvalidPath {
            path: key.to_owned(),
            reason: "key contains '/'",
        });
    }
    check_key(key, key)?;
    Ok(format!("{}/{key}", parent.trim_end_matches('/')))
}

fn check_key(path: &str, key: &str) -> StoreResult<()> {
    let reason = if key.is_empty() {
        Some("empty key")
    } else if key.contains(FORBIDDEN) {
        Some("key contains one of . $ # [ ]")
    } else if key.chars().any(char::is_control) {
        Some("key contains a control character")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidPath {
            path: path.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}
