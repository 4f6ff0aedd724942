use parking_lot::{Mutex, MutexGuard, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::{ApplicationConfig, SeedPolicy};
use crate::error::{AppResult, ApplicationError, ParameterResult};
use crate::io::{DataIo, JsonFileIo};
use crate::parameter::{
    resolve, MutationOrigin, ParamId, ParameterHandle, ParameterTree, ParameterType, SharedTree,
};
use crate::pipeline::{DataId, ProcessObject};

use super::doc::ApplicationDoc;
use super::document::{JsonParameterDocument, ParameterDocument};
use super::hooks::ApplicationHooks;

static NEXT_APPLICATION_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) const INPUT_DOCUMENT_KEY: &str = "inparams";
pub(crate) const OUTPUT_DOCUMENT_KEY: &str = "outparams";

/// Lifecycle stage of an [`Application`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Uninitialized,
    Initialized,
    ParametersUpdated,
    Executed,
    OutputsWritten,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Uninitialized => "Uninitialized",
            Stage::Initialized => "Initialized",
            Stage::ParametersUpdated => "ParametersUpdated",
            Stage::Executed => "Executed",
            Stage::OutputsWritten => "OutputsWritten",
        };
        f.write_str(s)
    }
}

pub(crate) struct RunState {
    pub(crate) stage: Stage,
    pub(crate) initializing: bool,
    pub(crate) execute_done: bool,
    pub(crate) document_loaded: bool,
    pub(crate) inputs_to_keep: HashSet<DataId>,
    /// Outputs of this application handed to a downstream application in memory.
    pub(crate) consumed_outputs: HashSet<DataId>,
}

pub(crate) struct ApplicationInner {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) config: ApplicationConfig,
    pub(crate) tree: SharedTree,
    pub(crate) doc: RwLock<ApplicationDoc>,
    pub(crate) hooks: Mutex<Box<dyn ApplicationHooks>>,
    pub(crate) state: Mutex<RunState>,
    pub(crate) rng: Mutex<StdRng>,
    pub(crate) io: Arc<dyn DataIo>,
    pub(crate) document: Arc<dyn ParameterDocument>,
    pub(crate) progress_source: Mutex<Option<Arc<ProcessObject>>>,
}

/// A named processing unit: a parameter tree plus lifecycle hooks.
///
/// Cloning is cheap and every clone refers to the same application.
#[derive(Clone)]
pub struct Application {
    pub(crate) inner: Arc<ApplicationInner>,
}

impl Application {
    pub fn builder(name: impl Into<String>, hooks: impl ApplicationHooks + 'static) -> ApplicationBuilder {
        Self::builder_boxed(name, Box::new(hooks))
    }

    pub fn builder_boxed(name: impl Into<String>, hooks: Box<dyn ApplicationHooks>) -> ApplicationBuilder {
        ApplicationBuilder {
            name: name.into(),
            description: String::new(),
            hooks,
            config: ApplicationConfig::default(),
            io: None,
            document: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn description(&self) -> &str {
        &self.inner.description
    }

    pub fn config(&self) -> &ApplicationConfig {
        &self.inner.config
    }

    pub fn io(&self) -> &Arc<dyn DataIo> {
        &self.inner.io
    }

    /// Shared parameter tree, for installing proxies that point into it.
    pub fn tree(&self) -> &SharedTree {
        &self.inner.tree
    }

    pub fn stage(&self) -> Stage {
        self.inner.state.lock().stage
    }

    pub fn is_initialized(&self) -> bool {
        self.stage() != Stage::Uninitialized
    }

    pub fn is_execute_done(&self) -> bool {
        self.inner.state.lock().execute_done
    }

    pub fn same_as(&self, other: &Application) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ================================
    // Lifecycle
    // ================================

    /// Declare the parameter tree and documentation. Runs at most once;
    /// every parameter access triggers it lazily.
    pub fn init(&self) -> AppResult<()> {
        {
            let mut state = self.inner.state.lock();
            if state.stage != Stage::Uninitialized || state.initializing {
                return Ok(());
            }
            state.initializing = true;
        }
        let result = self.run_init();
        let mut state = self.inner.state.lock();
        state.initializing = false;
        if result.is_ok() {
            state.stage = Stage::Initialized;
            tracing::info!(application = %self.inner.name, "initialized");
        }
        result
    }

    fn run_init(&self) -> AppResult<()> {
        *self.inner.tree.write() = ParameterTree::new();
        *self.inner.doc.write() = ApplicationDoc::default();
        self.lock_hooks("init")?.do_init(self)?;
        if self.inner.config.parameter_document {
            let mut tree = self.inner.tree.write();
            let input = tree.add_parameter(
                ParameterType::InputParameterDocument,
                INPUT_DOCUMENT_KEY,
                "Load parameters from document",
            )?;
            let output = tree.add_parameter(
                ParameterType::OutputParameterDocument,
                OUTPUT_DOCUMENT_KEY,
                "Save parameters to document",
            )?;
            for id in [input, output] {
                tree.node_mut(id).mandatory = false;
            }
        }
        Ok(())
    }

    /// Hooks are not re-entrant: a lifecycle call made while one of this
    /// application's hooks is running fails instead of blocking.
    pub(crate) fn lock_hooks(
        &self,
        operation: &'static str,
    ) -> AppResult<MutexGuard<'_, Box<dyn ApplicationHooks>>> {
        self.inner
            .hooks
            .try_lock()
            .ok_or_else(|| ApplicationError::InvalidState {
                application: self.inner.name.clone(),
                operation,
                stage: format!("{} (hook running)", self.stage()),
            })
    }

    pub(crate) fn ensure_init(&self) -> AppResult<()> {
        self.init()
    }

    /// Consume a pending parameter document, run the update hook and reset
    /// the execution flag.
    pub fn update_parameters(&self) -> AppResult<()> {
        self.ensure_init()?;
        if let Some(path) = self.pending_document()? {
            tracing::debug!(application = %self.inner.name, path = %path, "loading parameter document");
            let document = self.inner.document.clone();
            document.read(self, &path)?;
        }
        self.lock_hooks("update parameters")?.do_update_parameters(self)?;
        let mut state = self.inner.state.lock();
        state.execute_done = false;
        state.stage = Stage::ParametersUpdated;
        Ok(())
    }

    fn pending_document(&self) -> AppResult<Option<String>> {
        if !self.inner.config.parameter_document {
            return Ok(None);
        }
        let path = {
            let tree = self.inner.tree.read();
            let id = tree.get_parameter_by_key(INPUT_DOCUMENT_KEY)?;
            let node = tree.node(id);
            if !node.is_active() || !node.has_value() {
                return Ok(None);
            }
            tree.get_string(id)?
        };
        let mut state = self.inner.state.lock();
        if state.document_loaded {
            return Ok(None);
        }
        state.document_loaded = true;
        Ok(Some(path))
    }

    /// Reseed the random source from the `rand` parameter, else from the
    /// configured policy.
    pub(crate) fn reseed(&self) -> AppResult<()> {
        let user_seed = match resolve(&self.inner.tree, "rand", true) {
            Ok(handle) => handle.read(|t, id| {
                if t.node(id).has_value() {
                    t.get_int(id).map(Some)
                } else {
                    Ok(None)
                }
            })?,
            Err(_) => None,
        };
        let rng = match (user_seed, self.inner.config.seed_policy) {
            (Some(seed), _) => StdRng::seed_from_u64(seed as u64),
            (None, SeedPolicy::Fixed(seed)) => StdRng::seed_from_u64(seed),
            (None, SeedPolicy::Entropy) => StdRng::from_entropy(),
        };
        *self.inner.rng.lock() = rng;
        Ok(())
    }

    // ================================
    // Documentation and progress
    // ================================

    pub fn doc(&self) -> AppResult<ApplicationDoc> {
        self.ensure_init()?;
        Ok(self.inner.doc.read().clone())
    }

    pub fn update_doc(&self, f: impl FnOnce(&mut ApplicationDoc)) {
        f(&mut self.inner.doc.write());
    }

    /// Register the process object currently reporting progress.
    pub fn add_process(&self, process: Arc<ProcessObject>, note: &str) {
        tracing::debug!(application = %self.inner.name, process = %process.name(), note, "progress source");
        *self.inner.progress_source.lock() = Some(process);
    }

    pub fn progress(&self) -> Option<f32> {
        self.inner.progress_source.lock().as_ref().map(|p| p.progress())
    }

    /// Ask the current progress source to stop early.
    pub fn abort_current_process(&self) -> bool {
        match self.inner.progress_source.lock().as_ref() {
            Some(process) => {
                process.abort();
                true
            }
            None => false,
        }
    }

    // ================================
    // Parameter access helpers
    // ================================

    pub(crate) fn handle(&self, key: &str) -> AppResult<ParameterHandle> {
        self.ensure_init()?;
        Ok(resolve(&self.inner.tree, key, true)?)
    }

    pub(crate) fn read_param<R>(
        &self,
        key: &str,
        f: impl FnOnce(&ParameterTree, ParamId) -> ParameterResult<R>,
    ) -> AppResult<R> {
        let handle = self.handle(key)?;
        Ok(handle.read(f)?)
    }

    pub(crate) fn write_param<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut ParameterTree, ParamId) -> ParameterResult<R>,
    ) -> AppResult<R> {
        let handle = self.handle(key)?;
        Ok(handle.write(f)?)
    }

    /// Every parameter listed by `get_parameters_keys(true)`, resolved
    /// through proxies.
    pub(crate) fn resolved_parameters(&self) -> AppResult<Vec<(String, ParameterHandle)>> {
        self.ensure_init()?;
        let keys = self.inner.tree.read().keys(true);
        let mut out = Vec::with_capacity(keys.len());
        for key in keys {
            let handle = resolve(&self.inner.tree, &key, true)?;
            out.push((key, handle));
        }
        Ok(out)
    }

    pub(crate) fn note_setter(&self, key: &str, origin: MutationOrigin) {
        if key == INPUT_DOCUMENT_KEY && self.inner.config.parameter_document {
            self.inner.state.lock().document_loaded = false;
        }
        tracing::trace!(application = %self.inner.name, key, ?origin, "parameter set");
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("stage", &self.stage())
            .finish()
    }
}

/// Builder for [`Application`]
pub struct ApplicationBuilder {
    name: String,
    description: String,
    hooks: Box<dyn ApplicationHooks>,
    config: ApplicationConfig,
    io: Option<Arc<dyn DataIo>>,
    document: Option<Arc<dyn ParameterDocument>>,
}

impl ApplicationBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn config(mut self, config: ApplicationConfig) -> Self {
        self.config = config;
        self
    }

    /// Format reader/writer used for file-backed images and vector data.
    pub fn io(mut self, io: Arc<dyn DataIo>) -> Self {
        self.io = Some(io);
        self
    }

    pub fn document(mut self, document: Arc<dyn ParameterDocument>) -> Self {
        self.document = Some(document);
        self
    }

    /// Build the application. Initialization stays lazy.
    pub fn build(self) -> Application {
        let seed_rng = match self.config.seed_policy {
            SeedPolicy::Fixed(seed) => StdRng::seed_from_u64(seed),
            SeedPolicy::Entropy => StdRng::from_entropy(),
        };
        Application {
            inner: Arc::new(ApplicationInner {
                id: NEXT_APPLICATION_ID.fetch_add(1, Ordering::Relaxed),
                name: self.name,
                description: self.description,
                config: self.config,
                tree: Arc::new(RwLock::new(ParameterTree::new())),
                doc: RwLock::new(ApplicationDoc::default()),
                hooks: Mutex::new(self.hooks),
                state: Mutex::new(RunState {
                    stage: Stage::Uninitialized,
                    initializing: false,
                    execute_done: false,
                    document_loaded: false,
                    inputs_to_keep: HashSet::new(),
                    consumed_outputs: HashSet::new(),
                }),
                rng: Mutex::new(seed_rng),
                io: self.io.unwrap_or_else(|| Arc::new(JsonFileIo::new())),
                document: self
                    .document
                    .unwrap_or_else(|| Arc::new(JsonParameterDocument::new())),
                progress_source: Mutex::new(None),
            }),
        }
    }
}
