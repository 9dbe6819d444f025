//! Utilities for expanding input path patterns.

use std::path::PathBuf;

use crate::{Result, error::BunIdxError};

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`. Literal paths pass through
/// unchanged (a path with no metacharacters is its own expansion).
/// Expansion preserves the order of the patterns; within a pattern, glob
/// yields paths in sorted order.
///
/// # Errors
///
/// Propagates glob parse errors and filesystem errors from the glob
/// iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();

    for pattern in patterns {
        resolved.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|err| BunIdxError::Other {
        message: format!("invalid pattern '{pattern}': {err}"),
    })?;

    let mut resolved = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| BunIdxError::Other {
            message: err.to_string(),
        })?;
        if path.is_file() {
            resolved.push(path);
        }
    }

    Ok(resolved)
}
