//! Persisted parameter documents.
//!
//! A document records an application's name and, for every enabled parameter
//! with a value, its key, declared type and value. Reading applies each
//! entry through the typed setters and runs `update_parameters` after each
//! one, since later defaults may depend on earlier values.

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{AppResult, ApplicationError, ParameterError};
use crate::parameter::{MutationOrigin, ParameterType};

use super::app::{Application, INPUT_DOCUMENT_KEY, OUTPUT_DOCUMENT_KEY};

pub trait ParameterDocument: Send + Sync {
    fn read(&self, app: &Application, path: &str) -> AppResult<()>;

    fn write(&self, app: &Application, path: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedParameter {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: PersistedValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedApplication {
    pub application: String,
    #[serde(default)]
    pub parameters: Vec<PersistedParameter>,
}

impl PersistedApplication {
    /// Snapshot of `app`'s enabled, valued parameters.
    pub fn capture(app: &Application) -> AppResult<Self> {
        let mut parameters = Vec::new();
        for key in app.get_parameters_keys(true)? {
            if key == INPUT_DOCUMENT_KEY || key == OUTPUT_DOCUMENT_KEY {
                continue;
            }
            let kind = app.get_parameter_type(&key)?;
            if matches!(kind, ParameterType::Group | ParameterType::Proxy) {
                continue;
            }
            if !app.is_parameter_enabled(&key)? || !app.has_value(&key)? {
                continue;
            }
            let value = match kind {
                ParameterType::Bool => PersistedValue::Bool(app.get_parameter_as_string(&key)? == "true"),
                k if k.is_integer() => PersistedValue::Int(app.get_parameter_int(&key)?),
                ParameterType::Float => PersistedValue::Float(app.get_parameter_float(&key)?),
                k if k.is_list() || k.is_list_view() => {
                    PersistedValue::List(app.get_parameter_string_list(&key)?)
                }
                _ => PersistedValue::Text(app.get_parameter_as_string(&key)?),
            };
            if matches!(&value, PersistedValue::Text(t) if t.is_empty()) {
                continue;
            }
            if matches!(&value, PersistedValue::List(l) if l.iter().any(|s| s.is_empty())) {
                continue;
            }
            parameters.push(PersistedParameter {
                key,
                kind: kind.as_str().to_string(),
                value,
            });
        }
        Ok(PersistedApplication {
            application: app.name().to_string(),
            parameters,
        })
    }

    /// Apply every entry to `app`, checking the application name and each
    /// entry's declared type.
    pub fn apply(&self, app: &Application) -> AppResult<()> {
        if self.application != app.name() {
            return Err(ApplicationError::Document(format!(
                "document targets application '{}', not '{}'",
                self.application,
                app.name()
            )));
        }
        for entry in &self.parameters {
            let persisted_kind: ParameterType = entry.kind.parse()?;
            let declared = app.get_parameter_type(&entry.key)?;
            if declared != persisted_kind {
                return Err(ParameterError::type_mismatch(&entry.key, declared.as_str(), persisted_kind).into());
            }
            let origin = MutationOrigin::User;
            match &entry.value {
                PersistedValue::Bool(b) => app.set_parameter_string(&entry.key, &b.to_string(), origin)?,
                PersistedValue::Int(v) => app.set_parameter_int(&entry.key, *v, origin)?,
                PersistedValue::Float(v) if declared.is_integer() => {
                    app.set_parameter_int(&entry.key, *v as i64, origin)?
                }
                PersistedValue::Float(v) => app.set_parameter_float(&entry.key, *v, origin)?,
                PersistedValue::Text(s) => app.set_parameter_string(&entry.key, s, origin)?,
                PersistedValue::List(items) => app.set_parameter_string_list(&entry.key, items, origin)?,
            }
            app.update_parameters()?;
        }
        Ok(())
    }
}

/// JSON parameter documents on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct JsonParameterDocument;

impl JsonParameterDocument {
    pub fn new() -> Self {
        JsonParameterDocument
    }
}

impl ParameterDocument for JsonParameterDocument {
    fn read(&self, app: &Application, path: &str) -> AppResult<()> {
        let text = fs::read_to_string(path)
            .map_err(|e| ApplicationError::Document(format!("cannot read '{}': {}", path, e)))?;
        let document: PersistedApplication = serde_json::from_str(&text)?;
        document.apply(app)?;
        tracing::info!(application = %app.name(), path, entries = document.parameters.len(), "parameters loaded");
        Ok(())
    }

    fn write(&self, app: &Application, path: &str) -> AppResult<()> {
        let document = PersistedApplication::capture(app)?;
        let text = serde_json::to_string_pretty(&document)?;
        fs::write(path, text)
            .map_err(|e| ApplicationError::Document(format!("cannot write '{}': {}", path, e)))?;
        tracing::info!(application = %app.name(), path, entries = document.parameters.len(), "parameters saved");
        Ok(())
    }
}
