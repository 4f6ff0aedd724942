use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ApplicationConfig;
use crate::error::{AppResult, ApplicationError};
use crate::io::{DataIo, JsonFileIo};

use super::app::Application;
use super::document::{JsonParameterDocument, ParameterDocument};
use super::hooks::ApplicationHooks;

pub type HooksFactory = Box<dyn Fn() -> Box<dyn ApplicationHooks> + Send + Sync>;

struct Registered {
    description: String,
    factory: HooksFactory,
}

/// Named application factories sharing one configuration, reader/writer and
/// document format.
pub struct ApplicationRegistry {
    factories: BTreeMap<String, Registered>,
    config: ApplicationConfig,
    io: Arc<dyn DataIo>,
    document: Arc<dyn ParameterDocument>,
}

impl ApplicationRegistry {
    pub fn new(config: ApplicationConfig) -> Self {
        ApplicationRegistry {
            factories: BTreeMap::new(),
            config,
            io: Arc::new(JsonFileIo::new()),
            document: Arc::new(JsonParameterDocument::new()),
        }
    }

    pub fn with_io(mut self, io: Arc<dyn DataIo>) -> Self {
        self.io = io;
        self
    }

    pub fn with_document(mut self, document: Arc<dyn ParameterDocument>) -> Self {
        self.document = document;
        self
    }

    pub fn register<F, H>(&mut self, name: &str, description: &str, factory: F)
    where
        F: Fn() -> H + Send + Sync + 'static,
        H: ApplicationHooks + 'static,
    {
        self.factories.insert(
            name.to_string(),
            Registered {
                description: description.to_string(),
                factory: Box::new(move || Box::new(factory()) as Box<dyn ApplicationHooks>),
            },
        );
    }

    /// Registered names, sorted.
    pub fn available(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.factories.get(name).map(|r| r.description.as_str())
    }

    /// New, initialized instance of `name`.
    pub fn create(&self, name: &str) -> AppResult<Application> {
        let registered = self
            .factories
            .get(name)
            .ok_or_else(|| ApplicationError::UnknownApplication(name.to_string()))?;
        let app = Application::builder_boxed(name, (registered.factory)())
            .description(registered.description.clone())
            .config(self.config.clone())
            .io(self.io.clone())
            .document(self.document.clone())
            .build();
        app.init()?;
        Ok(app)
    }
}
