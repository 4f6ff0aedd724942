//! Application-level error types.

use super::{ParameterError, PipelineError};
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Missing mandatory parameter(s): {}", .keys.join(", "))]
    MissingMandatory { keys: Vec<String> },
    #[error("Application '{application}' aborted: dependency '{dependency}' failed: {source}")]
    DependencyFailed {
        application: String,
        dependency: String,
        #[source]
        source: Box<ApplicationError>,
    },
    #[error("Dependency cycle detected through application(s): {}", .0.join(", "))]
    DependencyCycle(Vec<String>),
    #[error("Connection of '{key}' to '{target}.{target_key}' produced no data")]
    ConnectionUnresolved {
        key: String,
        target: String,
        target_key: String,
    },
    #[error("Application '{application}' cannot {operation} in stage {stage}")]
    InvalidState {
        application: String,
        operation: &'static str,
        stage: String,
    },
    #[error("Parameter document error: {0}")]
    Document(String),
    #[error("Application hook failed: {0}")]
    Hook(String),
    #[error("Unknown application: {0}")]
    UnknownApplication(String),
}

impl ApplicationError {
    /// Keys reported by a missing-mandatory failure, empty for other variants.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            ApplicationError::MissingMandatory { keys } => keys,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for ApplicationError {
    fn from(e: serde_json::Error) -> Self {
        ApplicationError::Document(e.to_string())
    }
}
