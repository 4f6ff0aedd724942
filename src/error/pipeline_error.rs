use thiserror::Error;

/// Errors raised while updating or writing pipeline data objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Data object {0} has no content and no producer")]
    NoSource(u64),
    #[error("Process '{0}' was aborted")]
    Aborted(String),
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
    #[error("Expected {expected} data, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Process '{process}' failed: {message}")]
    Generate { process: String, message: String },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        PipelineError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
