use crate::error::ParameterResult;

use super::kind::{ParameterType, Role, UserLevel};
use super::proxy::ProxyTarget;
use super::tree::ParamId;
use super::value::ParameterValue;

/// A single named, typed configuration slot stored in a [`ParameterTree`](super::ParameterTree).
#[derive(Debug, Clone)]
pub struct Parameter {
    pub(crate) key: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) kind: ParameterType,
    pub(crate) role: Role,
    pub(crate) mandatory: bool,
    pub(crate) active: bool,
    pub(crate) automatic_value: bool,
    pub(crate) user_value: bool,
    pub(crate) user_level: UserLevel,
    pub(crate) root: Option<ParamId>,
    pub(crate) children: Vec<ParamId>,
    pub(crate) value: ParameterValue,
}

impl Parameter {
    /// New parameter with the kind's default role. Value kinds start
    /// mandatory; groups start optional. Everything starts active.
    pub fn new(
        kind: ParameterType,
        key: impl Into<String>,
        name: impl Into<String>,
    ) -> ParameterResult<Self> {
        Ok(Parameter {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            kind,
            role: kind.default_role(),
            mandatory: kind != ParameterType::Group,
            active: true,
            automatic_value: false,
            user_value: false,
            user_level: UserLevel::Basic,
            root: None,
            children: Vec::new(),
            value: ParameterValue::for_kind(kind)?,
        })
    }

    /// Unnamed root group of a tree.
    pub(crate) fn root_group() -> Self {
        Parameter {
            key: String::new(),
            name: String::new(),
            description: String::new(),
            kind: ParameterType::Group,
            role: Role::Input,
            mandatory: false,
            active: true,
            automatic_value: false,
            user_value: false,
            user_level: UserLevel::Basic,
            root: None,
            children: Vec::new(),
            value: ParameterValue::Group,
        }
    }

    /// Proxy forwarding every operation to `target`.
    pub fn proxy(key: impl Into<String>, target: ProxyTarget) -> Self {
        let key = key.into();
        Parameter {
            name: key.clone(),
            key,
            description: String::new(),
            kind: ParameterType::Proxy,
            role: Role::Input,
            mandatory: false,
            active: true,
            automatic_value: false,
            user_value: false,
            user_level: UserLevel::Basic,
            root: None,
            children: Vec::new(),
            value: ParameterValue::Proxy(target),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_automatic_value(&self) -> bool {
        self.automatic_value
    }

    pub fn has_user_value(&self) -> bool {
        self.user_value
    }

    pub fn user_level(&self) -> UserLevel {
        self.user_level
    }

    pub fn root(&self) -> Option<ParamId> {
        self.root
    }

    pub fn children(&self) -> &[ParamId] {
        &self.children
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    pub fn has_value(&self) -> bool {
        self.value.has_value()
    }

    pub fn proxy_target(&self) -> Option<&ProxyTarget> {
        match &self.value {
            ParameterValue::Proxy(target) => Some(target),
            _ => None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
