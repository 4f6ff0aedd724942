//! Error types for the application runtime.
//!
//! - [`ParameterError`]: configuration errors raised by the parameter tree.
//! - [`PipelineError`]: errors raised while updating data objects.
//! - [`ApplicationError`]: top-level errors for the lifecycle and composition.

pub mod application_error;
pub mod parameter_error;
pub mod pipeline_error;

pub use application_error::ApplicationError;
pub use parameter_error::ParameterError;
pub use pipeline_error::PipelineError;

/// Convenience alias for parameter-level results.
pub type ParameterResult<T> = Result<T, ParameterError>;
/// Convenience alias for pipeline-level results.
pub type PipelineResult<T> = Result<T, PipelineError>;
/// Convenience alias for application-level results.
pub type AppResult<T> = Result<T, ApplicationError>;
