//! Generic key-based parameter API.
//!
//! Every accessor resolves its key through proxies, so a driving layer (CLI,
//! parameter document, bindings) can work with any application uniformly.

use std::sync::Arc;

use crate::error::{AppResult, ParameterError};
use crate::io::DataIo;
use crate::parameter::key::{last_segment, split_parent};
use crate::parameter::{
    resolve, InputImageSlot, InputVectorSlot, MutationOrigin, Parameter, ParameterHandle,
    ParameterType, ProxyTarget, Role, UserLevel,
};
use crate::pipeline::{DataHandle, DataObject, ImageFileReader, PixelType, VectorFileReader};

use super::app::Application;

impl Application {
    // ================================
    // Declaration
    // ================================

    pub fn add_parameter(&self, kind: ParameterType, key: &str, name: &str) -> AppResult<()> {
        self.ensure_init()?;
        self.inner.tree.write().add_parameter(kind, key, name)?;
        Ok(())
    }

    /// Add a branch to a choice or an item to a list view.
    pub fn add_choice(&self, key: &str, name: &str) -> AppResult<()> {
        self.ensure_init()?;
        self.inner.tree.write().add_choice(key, name)?;
        Ok(())
    }

    /// Optional integer parameter `rand` used to seed the random source.
    pub fn add_rand_parameter(&self) -> AppResult<()> {
        self.add_parameter(ParameterType::Int, "rand", "Random seed")?;
        self.write_param("rand", |t, id| {
            let node = t.node_mut(id);
            node.mandatory = false;
            node.description = "Set a specific random seed with integer value.".into();
            node.user_level = UserLevel::Advanced;
            Ok(())
        })
    }

    /// Optional `ram` parameter defaulting to the configured memory budget.
    pub fn add_ram_parameter(&self) -> AppResult<()> {
        self.add_parameter(ParameterType::Ram, "ram", "Available RAM (MB)")?;
        let default = self.inner.config.default_ram_mb;
        self.write_param("ram", |t, id| {
            t.int_value_mut(id)?.set_default(default);
            let node = t.node_mut(id);
            node.mandatory = false;
            node.description = "Available memory for processing (in MB).".into();
            node.user_level = UserLevel::Advanced;
            Ok(())
        })
    }

    /// Swap the parameter at `key` for `replacement`, which must carry the
    /// same local key.
    pub fn replace_parameter(&self, key: &str, replacement: Parameter) -> AppResult<()> {
        self.ensure_init()?;
        let (parent, local) = split_parent(key);
        let mut tree = self.inner.tree.write();
        let group = match parent {
            Some(parent) => tree.get_parameter_by_key(parent)?,
            None => tree.root(),
        };
        tree.replace_parameter(group, local, replacement)?;
        Ok(())
    }

    /// Replace the parameter at `key` by a proxy forwarding to `target_key`
    /// of `target`.
    pub fn install_proxy(&self, key: &str, target: &Application, target_key: &str) -> AppResult<()> {
        target.ensure_init()?;
        target.get_parameter_by_key(target_key, true)?;
        let proxy = Parameter::proxy(last_segment(key), ProxyTarget::new(target.tree(), target_key));
        self.replace_parameter(key, proxy)
    }

    pub fn get_parameter_by_key(&self, key: &str, follow_proxy: bool) -> AppResult<ParameterHandle> {
        self.ensure_init()?;
        Ok(resolve(&self.inner.tree, key, follow_proxy)?)
    }

    // ================================
    // Introspection and flags
    // ================================

    pub fn get_parameters_keys(&self, recursive: bool) -> AppResult<Vec<String>> {
        self.ensure_init()?;
        Ok(self.inner.tree.read().keys(recursive))
    }

    pub fn get_parameter_type(&self, key: &str) -> AppResult<ParameterType> {
        self.read_param(key, |t, id| Ok(t.node(id).kind()))
    }

    pub fn get_parameter_role(&self, key: &str) -> AppResult<Role> {
        self.read_param(key, |t, id| Ok(t.node(id).role()))
    }

    pub fn get_parameter_name(&self, key: &str) -> AppResult<String> {
        self.read_param(key, |t, id| Ok(t.node(id).name().to_string()))
    }

    pub fn get_parameter_description(&self, key: &str) -> AppResult<String> {
        self.read_param(key, |t, id| Ok(t.node(id).description().to_string()))
    }

    pub fn set_parameter_description(&self, key: &str, description: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).description = description.to_string();
            Ok(())
        })
    }

    pub fn get_parameter_user_level(&self, key: &str) -> AppResult<UserLevel> {
        self.read_param(key, |t, id| Ok(t.node(id).user_level()))
    }

    pub fn set_parameter_user_level(&self, key: &str, level: UserLevel) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).user_level = level;
            Ok(())
        })
    }

    pub fn set_parameter_role(&self, key: &str, role: Role) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).role = role;
            Ok(())
        })
    }

    pub fn has_value(&self, key: &str) -> AppResult<bool> {
        self.read_param(key, |t, id| Ok(t.node(id).has_value()))
    }

    pub fn is_parameter_enabled(&self, key: &str) -> AppResult<bool> {
        self.read_param(key, |t, id| Ok(t.node(id).is_active()))
    }

    pub fn enable_parameter(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).active = true;
            Ok(())
        })
    }

    pub fn disable_parameter(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).active = false;
            Ok(())
        })
    }

    pub fn is_mandatory(&self, key: &str) -> AppResult<bool> {
        self.read_param(key, |t, id| Ok(t.node(id).is_mandatory()))
    }

    pub fn mandatory_on(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).mandatory = true;
            Ok(())
        })
    }

    pub fn mandatory_off(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).mandatory = false;
            Ok(())
        })
    }

    pub fn has_automatic_value(&self, key: &str) -> AppResult<bool> {
        self.read_param(key, |t, id| Ok(t.node(id).has_automatic_value()))
    }

    pub fn automatic_value_on(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).automatic_value = true;
            Ok(())
        })
    }

    pub fn automatic_value_off(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).automatic_value = false;
            Ok(())
        })
    }

    pub fn has_user_value(&self, key: &str) -> AppResult<bool> {
        self.read_param(key, |t, id| Ok(t.node(id).has_user_value()))
    }

    pub fn set_parameter_user_value(&self, key: &str, user_value: bool) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.node_mut(id).user_value = user_value;
            Ok(())
        })
    }

    pub fn clear_value(&self, key: &str) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.clear_value(id);
            Ok(())
        })
    }

    pub fn is_parameter_missing(&self, key: &str) -> AppResult<bool> {
        self.read_param(key, |t, id| Ok(t.is_parameter_missing(id)))
    }

    /// Keys of every missing mandatory parameter, in declaration order.
    pub fn missing_parameters(&self) -> AppResult<Vec<String>> {
        let mut missing = Vec::new();
        for (key, handle) in self.resolved_parameters()? {
            if handle.read(|t, id| t.is_parameter_missing(id)) {
                missing.push(key);
            }
        }
        Ok(missing)
    }

    pub fn is_application_ready(&self) -> AppResult<bool> {
        Ok(self.missing_parameters()?.is_empty())
    }

    // ================================
    // Choices
    // ================================

    pub fn get_choice_keys(&self, key: &str) -> AppResult<Vec<String>> {
        self.read_param(key, |t, id| t.choice_keys(id))
    }

    pub fn get_choice_names(&self, key: &str) -> AppResult<Vec<String>> {
        self.read_param(key, |t, id| t.choice_names(id))
    }

    // ================================
    // Scalar and string values
    // ================================

    pub fn set_parameter_int(&self, key: &str, value: i64, origin: MutationOrigin) -> AppResult<()> {
        self.write_param(key, |t, id| t.set_int(id, value, origin))?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_int(&self, key: &str) -> AppResult<i64> {
        self.read_param(key, |t, id| t.get_int(id))
    }

    pub fn set_parameter_float(&self, key: &str, value: f64, origin: MutationOrigin) -> AppResult<()> {
        self.write_param(key, |t, id| t.set_float(id, value, origin))?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_float(&self, key: &str) -> AppResult<f64> {
        self.read_param(key, |t, id| t.get_float(id))
    }

    pub fn set_parameter_string(&self, key: &str, value: &str, origin: MutationOrigin) -> AppResult<()> {
        self.write_param(key, |t, id| t.set_string(id, value, origin))?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_string(&self, key: &str) -> AppResult<String> {
        self.read_param(key, |t, id| t.get_string(id))
    }

    pub fn set_parameter_string_list(
        &self,
        key: &str,
        values: &[String],
        origin: MutationOrigin,
    ) -> AppResult<()> {
        self.write_param(key, |t, id| t.set_string_list(id, values, origin))?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_string_list(&self, key: &str) -> AppResult<Vec<String>> {
        self.read_param(key, |t, id| t.get_string_list(id))
    }

    pub fn get_parameter_as_string(&self, key: &str) -> AppResult<String> {
        self.read_param(key, |t, id| t.get_as_string(id))
    }

    pub fn set_default_parameter_int(&self, key: &str, value: i64) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.int_value_mut(id)?.set_default(value);
            Ok(())
        })
    }

    pub fn set_default_parameter_float(&self, key: &str, value: f64) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.float_value_mut(id)?.set_default(value);
            Ok(())
        })
    }

    pub fn set_minimum_parameter_int(&self, key: &str, value: i64) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.int_value_mut(id)?.min = Some(value);
            Ok(())
        })
    }

    pub fn set_maximum_parameter_int(&self, key: &str, value: i64) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.int_value_mut(id)?.max = Some(value);
            Ok(())
        })
    }

    pub fn set_minimum_parameter_float(&self, key: &str, value: f64) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.float_value_mut(id)?.min = Some(value);
            Ok(())
        })
    }

    pub fn set_maximum_parameter_float(&self, key: &str, value: f64) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.float_value_mut(id)?.max = Some(value);
            Ok(())
        })
    }

    // ================================
    // Images
    // ================================

    pub fn set_parameter_input_image(
        &self,
        key: &str,
        image: DataHandle,
        origin: MutationOrigin,
    ) -> AppResult<()> {
        self.write_param(key, |t, id| {
            *t.input_image_slot_mut(id)? = InputImageSlot::from_data(image);
            t.touch(id, origin);
            Ok(())
        })?;
        self.note_setter(key, origin);
        Ok(())
    }

    /// Input image at `key`; a file path is opened lazily through the
    /// application's reader.
    pub fn get_parameter_image(&self, key: &str) -> AppResult<DataHandle> {
        let io = self.inner.io.clone();
        self.write_param(key, |t, id| {
            let full_key = t.full_key(id);
            let slot = t.input_image_slot_mut(id)?;
            open_image_slot(slot, &io, &full_key)
        })
    }

    pub fn add_image_to_list(&self, key: &str, image: DataHandle, origin: MutationOrigin) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.input_image_slots_mut(id)?.push(InputImageSlot::from_data(image));
            t.touch(id, origin);
            Ok(())
        })?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn add_file_to_image_list(&self, key: &str, file: &str, origin: MutationOrigin) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.input_image_slots_mut(id)?.push(InputImageSlot::from_file(file));
            t.touch(id, origin);
            Ok(())
        })?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_image_list(&self, key: &str) -> AppResult<Vec<DataHandle>> {
        let io = self.inner.io.clone();
        self.write_param(key, |t, id| {
            let full_key = t.full_key(id);
            let slots = t.input_image_slots_mut(id)?;
            slots
                .iter_mut()
                .map(|slot| open_image_slot(slot, &io, &full_key))
                .collect()
        })
    }

    /// Publish `image` as the content of output parameter `key`.
    pub fn set_parameter_output_image(&self, key: &str, image: DataHandle) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.output_image_slot_mut(id)?.data = Some(image);
            Ok(())
        })
    }

    pub fn get_parameter_output_image(&self, key: &str) -> AppResult<Option<DataHandle>> {
        self.read_param(key, |t, id| Ok(t.output_image_slot(id)?.data.clone()))
    }

    pub fn set_parameter_output_image_pixel_type(&self, key: &str, pixel_type: PixelType) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.output_image_slot_mut(id)?.pixel_type = pixel_type;
            Ok(())
        })
    }

    pub fn get_parameter_output_image_pixel_type(&self, key: &str) -> AppResult<PixelType> {
        self.read_param(key, |t, id| Ok(t.output_image_slot(id)?.pixel_type))
    }

    // ================================
    // Vector data
    // ================================

    pub fn set_parameter_input_vector_data(
        &self,
        key: &str,
        data: DataHandle,
        origin: MutationOrigin,
    ) -> AppResult<()> {
        self.write_param(key, |t, id| {
            *t.input_vector_slot_mut(id)? = InputVectorSlot {
                file: None,
                data: Some(data),
            };
            t.touch(id, origin);
            Ok(())
        })?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_vector_data(&self, key: &str) -> AppResult<DataHandle> {
        let io = self.inner.io.clone();
        self.write_param(key, |t, id| {
            let full_key = t.full_key(id);
            let slot = t.input_vector_slot_mut(id)?;
            open_vector_slot(slot, &io, &full_key)
        })
    }

    pub fn add_vector_data_to_list(&self, key: &str, data: DataHandle, origin: MutationOrigin) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.input_vector_slots_mut(id)?.push(InputVectorSlot {
                file: None,
                data: Some(data),
            });
            t.touch(id, origin);
            Ok(())
        })?;
        self.note_setter(key, origin);
        Ok(())
    }

    pub fn get_parameter_vector_data_list(&self, key: &str) -> AppResult<Vec<DataHandle>> {
        let io = self.inner.io.clone();
        self.write_param(key, |t, id| {
            let full_key = t.full_key(id);
            let slots = t.input_vector_slots_mut(id)?;
            slots
                .iter_mut()
                .map(|slot| open_vector_slot(slot, &io, &full_key))
                .collect()
        })
    }

    pub fn set_parameter_output_vector_data(&self, key: &str, data: DataHandle) -> AppResult<()> {
        self.write_param(key, |t, id| {
            t.output_vector_slot_mut(id)?.data = Some(data);
            Ok(())
        })
    }

    pub fn get_parameter_output_vector_data(&self, key: &str) -> AppResult<Option<DataHandle>> {
        self.read_param(key, |t, id| Ok(t.output_vector_slot(id)?.data.clone()))
    }

    /// Wrap several images into a list data object, e.g. as one filter input.
    pub fn image_list_as_data(&self, key: &str) -> AppResult<DataHandle> {
        Ok(DataObject::list(self.get_parameter_image_list(key)?))
    }
}

fn open_image_slot(
    slot: &mut InputImageSlot,
    io: &Arc<dyn DataIo>,
    key: &str,
) -> Result<DataHandle, ParameterError> {
    if let Some(data) = &slot.data {
        return Ok(data.clone());
    }
    match slot.file.as_deref() {
        Some(file) if !file.is_empty() => {
            let data = ImageFileReader::open(io.clone(), file);
            slot.data = Some(data.clone());
            Ok(data)
        }
        _ => Err(ParameterError::NoValue(key.to_string())),
    }
}

fn open_vector_slot(
    slot: &mut InputVectorSlot,
    io: &Arc<dyn DataIo>,
    key: &str,
) -> Result<DataHandle, ParameterError> {
    if let Some(data) = &slot.data {
        return Ok(data.clone());
    }
    match slot.file.as_deref() {
        Some(file) if !file.is_empty() => {
            let data = VectorFileReader::open(io.clone(), file);
            slot.data = Some(data.clone());
            Ok(data)
        }
        _ => Err(ParameterError::NoValue(key.to_string())),
    }
}
