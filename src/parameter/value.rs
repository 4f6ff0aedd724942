use std::fmt::Display;

use crate::application::Connection;
use crate::error::{ParameterError, ParameterResult};
use crate::pipeline::{DataHandle, PixelType};

use super::kind::ParameterType;
use super::proxy::ProxyTarget;

// ================================
// Kind-specific payloads
// ================================

/// Numeric value with optional default and inclusive bounds.
#[derive(Debug, Clone, Default)]
pub struct NumericValue<T> {
    pub value: Option<T>,
    pub default: Option<T>,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy + Display> NumericValue<T> {
    pub fn assign(&mut self, key: &str, v: T) -> ParameterResult<()> {
        if let Some(min) = self.min {
            if v < min {
                return Err(ParameterError::invalid_value(
                    key,
                    v.to_string(),
                    format!("below minimum {}", min),
                ));
            }
        }
        if let Some(max) = self.max {
            if v > max {
                return Err(ParameterError::invalid_value(
                    key,
                    v.to_string(),
                    format!("above maximum {}", max),
                ));
            }
        }
        self.value = Some(v);
        Ok(())
    }

    /// Record a default; it becomes the value when none is set yet.
    pub fn set_default(&mut self, v: T) {
        self.default = Some(v);
        if self.value.is_none() {
            self.value = Some(v);
        }
    }

    pub fn reset(&mut self) {
        self.value = self.default;
    }
}

/// Selection state of a choice; the branches themselves are the node's children.
#[derive(Debug, Clone, Default)]
pub struct ChoiceState {
    pub selected: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ListViewItem {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    pub items: Vec<ListViewItem>,
    pub selected: Vec<usize>,
}

impl ListViewState {
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    pub fn selected_keys(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|i| self.items.get(*i).map(|item| item.key.clone()))
            .collect()
    }
}

/// One input image: a file to read, an in-memory data object, or a link to
/// another application's output.
#[derive(Debug, Clone, Default)]
pub struct InputImageSlot {
    pub file: Option<String>,
    pub data: Option<DataHandle>,
    pub connection: Option<Connection>,
}

impl InputImageSlot {
    pub fn from_file(file: impl Into<String>) -> Self {
        InputImageSlot {
            file: Some(file.into()),
            ..Default::default()
        }
    }

    pub fn from_data(data: DataHandle) -> Self {
        InputImageSlot {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn has_value(&self) -> bool {
        self.file.as_deref().is_some_and(|f| !f.is_empty())
            || self.data.is_some()
            || self.connection.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputVectorSlot {
    pub file: Option<String>,
    pub data: Option<DataHandle>,
}

impl InputVectorSlot {
    pub fn has_value(&self) -> bool {
        self.file.as_deref().is_some_and(|f| !f.is_empty()) || self.data.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutputImageSlot {
    pub file: Option<String>,
    pub data: Option<DataHandle>,
    pub pixel_type: PixelType,
}

#[derive(Debug, Clone, Default)]
pub struct OutputVectorSlot {
    pub file: Option<String>,
    pub data: Option<DataHandle>,
}

// ================================
// ParameterValue: tagged variant over every kind
// ================================

#[derive(Debug, Clone)]
pub enum ParameterValue {
    Group,
    Bool(bool),
    Int(NumericValue<i64>),
    Float(NumericValue<f64>),
    Text(Option<String>),
    TextList(Vec<String>),
    Choice(ChoiceState),
    ListView(ListViewState),
    InputImage(InputImageSlot),
    InputImageList(Vec<InputImageSlot>),
    OutputImage(OutputImageSlot),
    InputVectorData(InputVectorSlot),
    InputVectorDataList(Vec<InputVectorSlot>),
    OutputVectorData(OutputVectorSlot),
    Proxy(ProxyTarget),
}

impl ParameterValue {
    /// Empty payload for a freshly declared parameter of `kind`.
    pub fn for_kind(kind: ParameterType) -> ParameterResult<Self> {
        let value = match kind {
            ParameterType::Group => ParameterValue::Group,
            ParameterType::Bool => ParameterValue::Bool(false),
            ParameterType::Int | ParameterType::Radius | ParameterType::Ram => {
                ParameterValue::Int(NumericValue::default())
            }
            ParameterType::Float => ParameterValue::Float(NumericValue::default()),
            ParameterType::String
            | ParameterType::InputFilename
            | ParameterType::OutputFilename
            | ParameterType::Directory
            | ParameterType::InputParameterDocument
            | ParameterType::OutputParameterDocument => ParameterValue::Text(None),
            ParameterType::StringList | ParameterType::InputFilenameList => {
                ParameterValue::TextList(Vec::new())
            }
            ParameterType::Choice => ParameterValue::Choice(ChoiceState::default()),
            ParameterType::ListView | ParameterType::Band | ParameterType::Field => {
                ParameterValue::ListView(ListViewState::default())
            }
            ParameterType::InputImage => ParameterValue::InputImage(InputImageSlot::default()),
            ParameterType::InputImageList => ParameterValue::InputImageList(Vec::new()),
            ParameterType::OutputImage => {
                ParameterValue::OutputImage(OutputImageSlot::default())
            }
            ParameterType::InputVectorData => {
                ParameterValue::InputVectorData(InputVectorSlot::default())
            }
            ParameterType::InputVectorDataList => ParameterValue::InputVectorDataList(Vec::new()),
            ParameterType::OutputVectorData => {
                ParameterValue::OutputVectorData(OutputVectorSlot::default())
            }
            ParameterType::Proxy => {
                return Err(ParameterError::UnsupportedKind(
                    "Proxy parameters are installed with ReplaceParameter".into(),
                ))
            }
        };
        Ok(value)
    }

    pub fn has_value(&self) -> bool {
        match self {
            ParameterValue::Group | ParameterValue::Proxy(_) => false,
            ParameterValue::Bool(_) => true,
            ParameterValue::Int(n) => n.value.is_some(),
            ParameterValue::Float(n) => n.value.is_some(),
            ParameterValue::Text(s) => s.as_deref().is_some_and(|s| !s.is_empty()),
            ParameterValue::TextList(items) => {
                !items.is_empty() && items.iter().all(|s| !s.is_empty())
            }
            ParameterValue::Choice(c) => c.selected.is_some(),
            ParameterValue::ListView(lv) => !lv.selected.is_empty(),
            ParameterValue::InputImage(slot) => slot.has_value(),
            ParameterValue::InputImageList(slots) => {
                !slots.is_empty() && slots.iter().all(InputImageSlot::has_value)
            }
            ParameterValue::OutputImage(slot) => {
                slot.file.as_deref().is_some_and(|f| !f.is_empty()) || slot.data.is_some()
            }
            ParameterValue::InputVectorData(slot) => slot.has_value(),
            ParameterValue::InputVectorDataList(slots) => {
                !slots.is_empty() && slots.iter().all(InputVectorSlot::has_value)
            }
            ParameterValue::OutputVectorData(slot) => {
                slot.file.as_deref().is_some_and(|f| !f.is_empty()) || slot.data.is_some()
            }
        }
    }

    /// Drop the value, keeping declared defaults, bounds and choice items.
    pub fn clear(&mut self) {
        match self {
            ParameterValue::Group | ParameterValue::Proxy(_) | ParameterValue::Choice(_) => {}
            ParameterValue::Bool(b) => *b = false,
            ParameterValue::Int(n) => n.value = None,
            ParameterValue::Float(n) => n.value = None,
            ParameterValue::Text(s) => *s = None,
            ParameterValue::TextList(items) => items.clear(),
            ParameterValue::ListView(lv) => lv.selected.clear(),
            ParameterValue::InputImage(slot) => *slot = InputImageSlot::default(),
            ParameterValue::InputImageList(slots) => slots.clear(),
            ParameterValue::OutputImage(slot) => {
                slot.file = None;
                slot.data = None;
            }
            ParameterValue::InputVectorData(slot) => *slot = InputVectorSlot::default(),
            ParameterValue::InputVectorDataList(slots) => slots.clear(),
            ParameterValue::OutputVectorData(slot) => *slot = OutputVectorSlot::default(),
        }
    }
}

pub(crate) fn parse_bool(key: &str, value: &str) -> ParameterResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(ParameterError::invalid_value(key, other, "expected a boolean")),
    }
}
