//! Execution, output writing and resource reclamation.

use std::collections::HashSet;

use crate::error::{AppResult, ApplicationError};
use crate::graph::DependencyGraph;
use crate::parameter::{ParameterHandle, ParameterValue, Role};
use crate::pipeline::{release_upstream, DataHandle, DataId};

use super::app::{Application, Stage, OUTPUT_DOCUMENT_KEY};
use super::hooks::ExecutionContext;

/// What an output parameter publishes, read under the tree lock.
enum Published {
    Image {
        key: String,
        file: Option<String>,
        data: Option<DataHandle>,
        pixel_type: crate::pipeline::PixelType,
    },
    Vector {
        key: String,
        file: Option<String>,
        data: Option<DataHandle>,
    },
}

impl Application {
    /// Run upstream applications, materialize connected inputs, then run
    /// this application's processing.
    pub fn execute(&self) -> AppResult<()> {
        self.ensure_init()?;
        DependencyGraph::build(self)?.validate()?;
        self.execute_connected()
    }

    /// Applications in the order a top-level `execute` runs them: upstream
    /// first, this application last.
    pub fn execution_order(&self) -> AppResult<Vec<Application>> {
        DependencyGraph::build(self)?.execution_order()
    }

    fn execute_connected(&self) -> AppResult<()> {
        self.ensure_init()?;
        let name = self.name().to_string();
        tracing::info!(application = %name, "executing");

        let connected = self.connected_inputs()?;

        let mut failure = None;
        let mut started = HashSet::new();
        for input in &connected {
            let target = &input.connection.target;
            if !started.insert(target.id()) || target.is_execute_done() {
                continue;
            }
            if let Err(e) = target.execute_connected() {
                tracing::warn!(application = %name, dependency = %target.name(), error = %e, "dependency failed");
                if failure.is_none() {
                    failure = Some(ApplicationError::DependencyFailed {
                        application: name.clone(),
                        dependency: target.name().to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let mut keep: HashSet<DataId> = HashSet::new();
        let mut to_write: Vec<Application> = Vec::new();
        for input in &connected {
            let target = &input.connection.target;
            let target_key = &input.connection.target_key;
            let (file, data) = target.read_param(target_key, |t, id| {
                let slot = t.output_image_slot(id)?;
                Ok((
                    slot.file.clone().filter(|f| !f.is_empty()),
                    slot.data.clone(),
                ))
            })?;
            match file {
                Some(file) if !input.connection.memory => {
                    tracing::debug!(application = %name, key = %input.key, target = %target.name(), file = %file, "file handoff");
                    input.assign_file(file)?;
                    target.enable_parameter(target_key)?;
                    if !to_write.iter().any(|a| a.same_as(target)) {
                        to_write.push(target.clone());
                    }
                }
                _ => {
                    let data = data.ok_or_else(|| ApplicationError::ConnectionUnresolved {
                        key: input.key.clone(),
                        target: target.name().to_string(),
                        target_key: target_key.clone(),
                    })?;
                    tracing::debug!(application = %name, key = %input.key, target = %target.name(), "memory handoff");
                    keep.insert(data.id());
                    target.inner.state.lock().consumed_outputs.insert(data.id());
                    input.assign_data(data)?;
                    target.disable_parameter(target_key)?;
                }
            }
        }
        for target in to_write {
            target.write_output()?;
        }

        self.update_parameters()?;
        let missing = self.missing_parameters()?;
        if !missing.is_empty() {
            return Err(ApplicationError::MissingMandatory { keys: missing });
        }
        keep.extend(self.input_data_ids()?);
        self.inner.state.lock().inputs_to_keep = keep;

        self.reseed()?;
        self.inner.state.lock().consumed_outputs.clear();
        {
            let mut hooks = self.lock_hooks("execute")?;
            let mut rng = self.inner.rng.lock();
            let mut ctx = ExecutionContext::new(&mut *rng);
            hooks.do_execute(self, &mut ctx)?;
        }

        {
            let mut state = self.inner.state.lock();
            state.execute_done = true;
            state.stage = Stage::Executed;
        }
        for published in self.published_outputs()? {
            if let Published::Image { data: Some(data), .. } = published {
                data.update_output_information()?;
            }
        }
        tracing::info!(application = %name, "executed");
        Ok(())
    }

    /// Write every enabled output that names a file, then the output
    /// parameter document, then release intermediate buffers.
    pub fn write_output(&self) -> AppResult<()> {
        let stage = self.stage();
        if !matches!(stage, Stage::Executed | Stage::OutputsWritten) {
            return Err(ApplicationError::InvalidState {
                application: self.name().to_string(),
                operation: "write outputs",
                stage: stage.to_string(),
            });
        }
        let io = self.inner.io.clone();
        for published in self.published_outputs()? {
            match published {
                Published::Image {
                    key,
                    file: Some(file),
                    data,
                    pixel_type,
                } => {
                    let data = data.ok_or_else(|| missing_output(&key))?;
                    let mut info = data.image_info()?;
                    info.pixel_type = pixel_type;
                    let pixels = data.pixels()?;
                    io.write_image(&file, &info, &pixels)?;
                    tracing::info!(application = %self.name(), key = %key, file = %file, "wrote image");
                }
                Published::Vector {
                    key,
                    file: Some(file),
                    data,
                } => {
                    let data = data.ok_or_else(|| missing_output(&key))?;
                    io.write_vector_data(&file, &data.features()?)?;
                    tracing::info!(application = %self.name(), key = %key, file = %file, "wrote vector data");
                }
                _ => {}
            }
        }

        if let Some(path) = self.output_document_path()? {
            let document = self.inner.document.clone();
            document.write(self, &path)?;
        }

        self.inner.state.lock().stage = Stage::OutputsWritten;
        self.lock_hooks("write outputs")?
            .after_execute_and_write_outputs(self)?;
        self.free_resources()?;
        Ok(())
    }

    pub fn execute_and_write_output(&self) -> AppResult<()> {
        self.execute()?;
        self.write_output()
    }

    /// Release every intermediate buffer upstream of the published outputs,
    /// sparing data received from other applications or the caller.
    ///
    /// Inputs held by any application upstream of this one are kept too, as
    /// are outputs this application or its upstream handed to a downstream
    /// application in memory.
    pub fn free_resources(&self) -> AppResult<usize> {
        let seeds: Vec<DataHandle> = self
            .published_outputs()?
            .into_iter()
            .filter_map(|p| match p {
                Published::Image { data, .. } | Published::Vector { data, .. } => data,
            })
            .collect();
        let mut keep: HashSet<DataId> = HashSet::new();
        for app in DependencyGraph::build(self)?.execution_order()? {
            let state = app.inner.state.lock();
            keep.extend(state.inputs_to_keep.iter().copied());
            keep.extend(state.consumed_outputs.iter().copied());
        }
        let released = release_upstream(&seeds, &keep);
        tracing::debug!(application = %self.name(), released, "released intermediate data");
        self.lock_hooks("free resources")?.do_free_resources(self);
        Ok(released)
    }

    /// Active output images and vector datasets that carry a value.
    fn published_outputs(&self) -> AppResult<Vec<Published>> {
        let mut out = Vec::new();
        for (key, handle) in self.output_parameters()? {
            let published = handle.read(|t, id| {
                let node = t.node(id);
                if !node.is_active() || !node.has_value() {
                    return None;
                }
                match node.value() {
                    ParameterValue::OutputImage(slot) => Some(Published::Image {
                        key: key.clone(),
                        file: slot.file.clone().filter(|f| !f.is_empty()),
                        data: slot.data.clone(),
                        pixel_type: slot.pixel_type,
                    }),
                    ParameterValue::OutputVectorData(slot) => Some(Published::Vector {
                        key: key.clone(),
                        file: slot.file.clone().filter(|f| !f.is_empty()),
                        data: slot.data.clone(),
                    }),
                    _ => None,
                }
            });
            out.extend(published);
        }
        Ok(out)
    }

    fn output_parameters(&self) -> AppResult<Vec<(String, ParameterHandle)>> {
        Ok(self
            .resolved_parameters()?
            .into_iter()
            .filter(|(_, h)| h.read(|t, id| t.node(id).role() == Role::Output))
            .collect())
    }

    fn input_data_ids(&self) -> AppResult<Vec<DataId>> {
        let mut ids = Vec::new();
        for (_, handle) in self.resolved_parameters()? {
            handle.read(|t, id| match t.node(id).value() {
                ParameterValue::InputImage(slot) => ids.extend(slot.data.as_ref().map(|d| d.id())),
                ParameterValue::InputImageList(slots) => {
                    ids.extend(slots.iter().filter_map(|s| s.data.as_ref().map(|d| d.id())))
                }
                ParameterValue::InputVectorData(slot) => {
                    ids.extend(slot.data.as_ref().map(|d| d.id()))
                }
                ParameterValue::InputVectorDataList(slots) => {
                    ids.extend(slots.iter().filter_map(|s| s.data.as_ref().map(|d| d.id())))
                }
                _ => {}
            });
        }
        Ok(ids)
    }

    fn output_document_path(&self) -> AppResult<Option<String>> {
        if !self.inner.config.parameter_document {
            return Ok(None);
        }
        self.read_param(OUTPUT_DOCUMENT_KEY, |t, id| {
            let node = t.node(id);
            if node.is_active() && node.has_value() {
                t.get_string(id).map(Some)
            } else {
                Ok(None)
            }
        })
    }
}

fn missing_output(key: &str) -> ApplicationError {
    ApplicationError::Hook(format!("output '{}' was not produced", key))
}
