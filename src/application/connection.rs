use std::collections::HashSet;
use std::fmt;

use crate::error::{AppResult, ParameterError};
use crate::parameter::{InputImageSlot, MutationOrigin, ParameterHandle, ParameterType};
use crate::pipeline::DataHandle;

use super::app::Application;

/// Link from an input image to another application's output image.
#[derive(Clone)]
pub struct Connection {
    pub target: Application,
    pub target_key: String,
    pub memory: bool,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("target", &self.target.name())
            .field("target_key", &self.target_key)
            .field("memory", &self.memory)
            .finish()
    }
}

/// A connected input slot found in an application's tree.
#[derive(Debug, Clone)]
pub(crate) struct ConnectedInput {
    pub(crate) key: String,
    pub(crate) handle: ParameterHandle,
    /// Index in an image list; `None` for a single input image.
    pub(crate) slot: Option<usize>,
    pub(crate) connection: Connection,
}

impl ConnectedInput {
    fn with_slot<R>(
        &self,
        f: impl FnOnce(&mut InputImageSlot) -> R,
    ) -> AppResult<R> {
        let slot = self.slot;
        Ok(self.handle.write(|t, id| -> Result<R, ParameterError> {
            match slot {
                None => Ok(f(t.input_image_slot_mut(id)?)),
                Some(index) => {
                    let key = t.full_key(id);
                    let slots = t.input_image_slots_mut(id)?;
                    let entry = slots
                        .get_mut(index)
                        .ok_or(ParameterError::NoValue(key))?;
                    Ok(f(entry))
                }
            }
        })?)
    }

    /// Hand the target's in-memory output to this slot.
    pub(crate) fn assign_data(&self, data: DataHandle) -> AppResult<()> {
        self.with_slot(|slot| {
            slot.data = Some(data);
            slot.file = None;
        })
    }

    /// Point this slot at the file the target writes.
    pub(crate) fn assign_file(&self, file: String) -> AppResult<()> {
        self.with_slot(|slot| {
            slot.file = Some(file);
            slot.data = None;
        })
    }
}

impl Application {
    /// Feed input image (or image list) `key` from output image `target_key`
    /// of `target`. Image lists gain a new connected entry.
    pub fn connect_image(&self, key: &str, target: &Application, target_key: &str) -> AppResult<()> {
        let target_kind = target.get_parameter_type(target_key)?;
        if target_kind != ParameterType::OutputImage {
            return Err(ParameterError::type_mismatch(target_key, "OutputImage", target_kind).into());
        }
        let connection = Connection {
            target: target.clone(),
            target_key: target_key.to_string(),
            memory: self.inner.config.connect_mode.is_memory(),
        };
        self.write_param(key, |t, id| {
            let kind = t.node(id).kind();
            match kind {
                ParameterType::InputImage => {
                    *t.input_image_slot_mut(id)? = InputImageSlot {
                        connection: Some(connection),
                        ..Default::default()
                    };
                }
                ParameterType::InputImageList => {
                    t.input_image_slots_mut(id)?.push(InputImageSlot {
                        connection: Some(connection),
                        ..Default::default()
                    });
                }
                other => {
                    return Err(ParameterError::type_mismatch(
                        t.full_key(id),
                        "InputImage or InputImageList",
                        other,
                    ))
                }
            }
            t.touch(id, MutationOrigin::User);
            Ok(())
        })?;
        tracing::debug!(
            application = %self.name(),
            key,
            target = %target.name(),
            target_key,
            "connected image"
        );
        Ok(())
    }

    /// Switch every connection reachable from this application between
    /// memory and file handoff.
    pub fn propagate_connect_mode(&self, memory: bool) -> AppResult<()> {
        let mut visited = HashSet::new();
        self.propagate_connect_mode_inner(memory, &mut visited)
    }

    fn propagate_connect_mode_inner(&self, memory: bool, visited: &mut HashSet<u64>) -> AppResult<()> {
        if !visited.insert(self.id()) {
            return Ok(());
        }
        let inputs = self.connected_inputs()?;
        for input in &inputs {
            input.handle.write(|t, id| match t.node(id).kind() {
                ParameterType::InputImage => {
                    if let Ok(slot) = t.input_image_slot_mut(id) {
                        if let Some(c) = slot.connection.as_mut() {
                            c.memory = memory;
                        }
                    }
                }
                _ => {
                    if let Ok(slots) = t.input_image_slots_mut(id) {
                        for c in slots.iter_mut().filter_map(|s| s.connection.as_mut()) {
                            c.memory = memory;
                        }
                    }
                }
            });
        }
        for input in inputs {
            input.connection.target.propagate_connect_mode_inner(memory, visited)?;
        }
        Ok(())
    }

    /// Connected input slots, in parameter declaration order.
    pub(crate) fn connected_inputs(&self) -> AppResult<Vec<ConnectedInput>> {
        let mut out = Vec::new();
        for (key, handle) in self.resolved_parameters()? {
            let found: Vec<(Option<usize>, Connection)> = handle.read(|t, id| {
                if let Ok(slot) = t.input_image_slot(id) {
                    return slot.connection.clone().map(|c| (None, c)).into_iter().collect();
                }
                if let Ok(slots) = t.input_image_slots(id) {
                    return slots
                        .iter()
                        .enumerate()
                        .filter_map(|(i, s)| s.connection.clone().map(|c| (Some(i), c)))
                        .collect();
                }
                Vec::new()
            });
            for (slot, connection) in found {
                out.push(ConnectedInput {
                    key: key.clone(),
                    handle: handle.clone(),
                    slot,
                    connection,
                });
            }
        }
        Ok(out)
    }

    /// Distinct applications this one reads from, first-connection order.
    pub fn upstream_applications(&self) -> AppResult<Vec<Application>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for input in self.connected_inputs()? {
            if seen.insert(input.connection.target.id()) {
                out.push(input.connection.target);
            }
        }
        Ok(out)
    }

    /// Connection mode of each connected slot of `key`.
    pub fn connection_modes(&self, key: &str) -> AppResult<Vec<bool>> {
        Ok(self
            .connected_inputs()?
            .into_iter()
            .filter(|c| c.key == key)
            .map(|c| c.connection.memory)
            .collect())
    }
}
