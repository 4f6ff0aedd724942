use thiserror::Error;

use crate::parameter::ParameterType;

/// Configuration errors raised by the parameter tree.
///
/// Every variant is fatal to the call that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Unknown parameter key: {0}")]
    UnknownKey(String),
    #[error("Invalid parameter key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("Parameter key already exists: {0}")]
    DuplicateKey(String),
    #[error("Parameter '{0}' is not a group")]
    NotAGroup(String),
    #[error("Key '{key}' does not name a direct child of '{group}'")]
    NotDirectChild { group: String, key: String },
    #[error("Replacement key mismatch: expected '{expected}', got '{actual}'")]
    KeyMismatch { expected: String, actual: String },
    #[error("Parameter '{key}' expects {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: ParameterType,
    },
    #[error("Invalid value '{value}' for parameter '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("Parameter '{0}' has no value")]
    NoValue(String),
    #[error("Unsupported parameter kind: {0}")]
    UnsupportedKind(String),
    #[error("Proxy '{0}' points at a parameter tree that no longer exists")]
    DanglingProxy(String),
    #[error("Proxy chain through '{0}' does not terminate")]
    ProxyCycle(String),
    #[error("Parameter '{key}' has no choice '{choice}'")]
    UnknownChoice { key: String, choice: String },
}

impl ParameterError {
    pub(crate) fn type_mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: ParameterType,
    ) -> Self {
        ParameterError::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            actual,
        }
    }

    pub(crate) fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ParameterError::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
