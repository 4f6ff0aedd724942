//! Applications: a parameter tree, lifecycle hooks and the composition
//! engine that chains applications through connections.

pub mod api;
pub mod app;
pub mod connection;
pub mod doc;
pub mod document;
pub mod execute;
pub mod hooks;
pub mod registry;

pub use app::{Application, ApplicationBuilder, Stage};
pub use connection::Connection;
pub use doc::{ApplicationDoc, DocExample};
pub use document::{
    JsonParameterDocument, ParameterDocument, PersistedApplication, PersistedParameter,
    PersistedValue,
};
pub use hooks::{ApplicationHooks, ExecutionContext};
pub use registry::{ApplicationRegistry, HooksFactory};
