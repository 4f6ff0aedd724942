//! # XApplication: an application-hosting runtime
//!
//! `xapplication` hosts named processing units ("applications") that share a
//! uniform, string-keyed parameter model and can be chained into pipelines.
//!
//! - **Parameters**: a typed, hierarchical tree with groups, choices, list
//!   views and proxies forwarding to parameters of other applications.
//! - **Lifecycle**: `init` → `update_parameters` → `execute` → `write_output`,
//!   driven through [`ApplicationHooks`] supplied by each concrete application.
//! - **Composition**: an input image may be connected to another
//!   application's output image. Upstream applications run once, first, and
//!   hand data over in memory or through a file.
//! - **Memory reclamation**: after outputs are written, intermediate buffers
//!   upstream of the published outputs are released, sparing data received
//!   from other applications.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xapplication::io::MemoryIo;
//! use xapplication::{Application, ApplicationHooks, ExecutionContext, AppResult};
//! use xapplication::{MutationOrigin, ParameterType};
//!
//! struct Echo;
//!
//! impl ApplicationHooks for Echo {
//!     fn do_init(&mut self, app: &Application) -> AppResult<()> {
//!         app.add_parameter(ParameterType::String, "text", "Text")
//!     }
//!     fn do_update_parameters(&mut self, _app: &Application) -> AppResult<()> {
//!         Ok(())
//!     }
//!     fn do_execute(&mut self, app: &Application, _ctx: &mut ExecutionContext<'_>) -> AppResult<()> {
//!         println!("{}", app.get_parameter_string("text")?);
//!         Ok(())
//!     }
//! }
//!
//! let app = Application::builder("Echo", Echo).io(Arc::new(MemoryIo::new())).build();
//! app.set_parameter_string("text", "hello", MutationOrigin::User).unwrap();
//! app.execute_and_write_output().unwrap();
//! ```

pub mod application;
pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod parameter;
pub mod pipeline;

pub use application::{
    Application, ApplicationBuilder, ApplicationDoc, ApplicationHooks, ApplicationRegistry,
    Connection, DocExample, ExecutionContext, JsonParameterDocument, ParameterDocument, Stage,
};
pub use config::{ApplicationConfig, ConnectMode, SeedPolicy};
pub use error::{
    AppResult, ApplicationError, ParameterError, ParameterResult, PipelineError, PipelineResult,
};
pub use graph::DependencyGraph;
pub use io::{DataIo, JsonFileIo, MemoryIo};
pub use parameter::{MutationOrigin, ParameterType, Role, UserLevel};
pub use pipeline::{DataHandle, DataObject, ImageInfo, PixelType, ProcessObject};
