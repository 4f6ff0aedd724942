use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use crate::error::{PipelineError, PipelineResult};

use super::data::{DataContent, DataHandle, DataInfo, DataKind, DataObject};

static NEXT_PROCESS_ID: AtomicU64 = AtomicU64::new(1);

/// Computational unit of a pipeline.
///
/// Implementations only compute; caching, abort and progress bookkeeping are
/// handled by the owning [`ProcessObject`].
pub trait Filter: Send + Sync {
    fn output_kind(&self) -> DataKind {
        DataKind::Image
    }

    fn output_information(&self, inputs: &[DataHandle]) -> PipelineResult<DataInfo>;

    fn generate(&self, inputs: &[DataHandle], process: &ProcessObject) -> PipelineResult<DataContent>;
}

/// A processing step producing one data object from its inputs.
pub struct ProcessObject {
    id: u64,
    name: String,
    inputs: Vec<DataHandle>,
    filter: Box<dyn Filter>,
    output: RwLock<Weak<DataObject>>,
    abort: AtomicBool,
    progress: Mutex<f32>,
    generations: AtomicUsize,
}

impl ProcessObject {
    /// Wire `filter` to `inputs` and return its (not yet generated) output.
    pub fn spawn(
        name: impl Into<String>,
        inputs: Vec<DataHandle>,
        filter: impl Filter + 'static,
    ) -> DataHandle {
        let kind = filter.output_kind();
        let process = Arc::new(ProcessObject {
            id: NEXT_PROCESS_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            inputs,
            filter: Box::new(filter),
            output: RwLock::new(Weak::new()),
            abort: AtomicBool::new(false),
            progress: Mutex::new(0.0),
            generations: AtomicUsize::new(0),
        });
        let output = DataObject::produced(kind, process.clone());
        *process.output.write() = Arc::downgrade(&output);
        output
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[DataHandle] {
        &self.inputs
    }

    pub fn output(&self) -> Option<DataHandle> {
        self.output.read().upgrade()
    }

    pub fn update_output_information(&self) -> PipelineResult<()> {
        for input in &self.inputs {
            input.update_output_information()?;
        }
        let info = self.filter.output_information(&self.inputs)?;
        if let Some(output) = self.output() {
            output.set_info(info);
        }
        Ok(())
    }

    /// Regenerate the output content, pulling inputs first.
    pub fn update(&self) -> PipelineResult<()> {
        if self.is_abort_requested() {
            return Err(PipelineError::Aborted(self.name.clone()));
        }
        self.update_output_information()?;
        for input in &self.inputs {
            input.update()?;
        }
        self.set_progress(0.0);
        let content = self.filter.generate(&self.inputs, self)?;
        if self.is_abort_requested() {
            return Err(PipelineError::Aborted(self.name.clone()));
        }
        if let Some(output) = self.output() {
            output.set_content(content);
        }
        self.generations.fetch_add(1, Ordering::Relaxed);
        self.set_progress(1.0);
        tracing::trace!(process = %self.name, "generated output");
        Ok(())
    }

    /// Request early termination of the running step.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn reset_abort(&self) {
        self.abort.store(false, Ordering::Relaxed);
    }

    pub fn is_abort_requested(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    pub fn progress(&self) -> f32 {
        *self.progress.lock()
    }

    pub fn set_progress(&self, value: f32) {
        *self.progress.lock() = value.clamp(0.0, 1.0);
    }

    /// How many times the output content has been generated.
    pub fn generation_count(&self) -> usize {
        self.generations.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for ProcessObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("inputs", &self.inputs.len())
            .finish()
    }
}

/// Per-sample functor applied to a single image input.
pub struct UnaryFunctor<F> {
    functor: F,
}

impl<F> UnaryFunctor<F>
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    pub fn new(functor: F) -> Self {
        UnaryFunctor { functor }
    }
}

impl<F> Filter for UnaryFunctor<F>
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn output_information(&self, inputs: &[DataHandle]) -> PipelineResult<DataInfo> {
        let input = single_input(inputs)?;
        Ok(DataInfo::Image(input.image_info()?))
    }

    fn generate(&self, inputs: &[DataHandle], process: &ProcessObject) -> PipelineResult<DataContent> {
        let pixels = single_input(inputs)?.pixels()?;
        let total = pixels.len().max(1);
        let mut out = Vec::with_capacity(pixels.len());
        for (i, v) in pixels.into_iter().enumerate() {
            if process.is_abort_requested() {
                return Err(PipelineError::Aborted(process.name().to_string()));
            }
            out.push((self.functor)(v));
            if i % 4096 == 0 {
                process.set_progress(i as f32 / total as f32);
            }
        }
        Ok(DataContent::Pixels(out))
    }
}

fn single_input(inputs: &[DataHandle]) -> PipelineResult<&DataHandle> {
    match inputs {
        [input] if input.kind() == DataKind::Image => Ok(input),
        [input] => Err(PipelineError::KindMismatch {
            expected: DataKind::Image.as_str(),
            actual: input.kind().as_str(),
        }),
        _ => Err(PipelineError::Generate {
            process: "unary functor".into(),
            message: format!("expected one input, got {}", inputs.len()),
        }),
    }
}
