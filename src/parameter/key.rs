//! Dotted parameter key utilities.

use crate::error::{ParameterError, ParameterResult};

/// Validate a full dotted key: non-empty segments of lowercase ASCII
/// letters, digits and underscores.
pub fn validate_key(key: &str) -> ParameterResult<()> {
    if key.is_empty() {
        return Err(ParameterError::InvalidKey {
            key: key.to_string(),
            reason: "key is empty".into(),
        });
    }
    for segment in key.split('.') {
        if segment.is_empty() {
            return Err(ParameterError::InvalidKey {
                key: key.to_string(),
                reason: "empty path segment".into(),
            });
        }
        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        {
            return Err(ParameterError::InvalidKey {
                key: key.to_string(),
                reason: format!("illegal character '{}'", c),
            });
        }
    }
    Ok(())
}

/// Split `a.b.c` into (`Some("a.b")`, `"c"`).
pub fn split_parent(key: &str) -> (Option<&str>, &str) {
    match key.rfind('.') {
        Some(pos) => (Some(&key[..pos]), &key[pos + 1..]),
        None => (None, key),
    }
}

/// Last segment of a dotted key, with the separator itself stripped.
pub fn last_segment(key: &str) -> &str {
    split_parent(key).1
}

pub fn join(parent: &str, local: &str) -> String {
    if parent.is_empty() {
        local.to_string()
    } else {
        format!("{}.{}", parent, local)
    }
}
