//! Arena-backed parameter tree.
//!
//! Every [`Parameter`] lives in one `Vec` and is addressed by a [`ParamId`].
//! Ownership is the `children` list of each container node; the `root`
//! back-reference is a plain handle, so re-parenting never touches pointers.
//!
//! Choice parameters own one anonymous-looking [`ParameterType::Group`] child
//! per branch. Path resolution treats a choice exactly like a group whose
//! children are the branches, so `mode.fit.size` walks `mode` → branch `fit`
//! → `size` whether or not `fit` is selected. Exclusivity is expressed through
//! the branch groups' `active` flag instead.

use crate::error::{ParameterError, ParameterResult};

use super::key::{last_segment, split_parent, validate_key};
use super::kind::{MutationOrigin, ParameterType};
use super::node::Parameter;
use super::proxy::ProxyTarget;
use super::value::{
    parse_bool, InputImageSlot, InputVectorSlot, ListViewItem, NumericValue, OutputImageSlot,
    OutputVectorSlot, ParameterValue,
};

/// Stable handle of a node inside one [`ParameterTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub(crate) usize);

impl ParamId {
    pub fn index(&self) -> usize {
        self.0
    }
}

const ROOT: ParamId = ParamId(0);

/// Outcome of walking a dotted key inside one tree.
#[derive(Debug)]
pub(crate) enum Walk {
    Found(ParamId),
    /// The path reached a proxy; continue in the target tree.
    Redirect {
        target: ProxyTarget,
        rest: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ParameterTree {
    nodes: Vec<Parameter>,
}

impl ParameterTree {
    pub fn new() -> Self {
        ParameterTree {
            nodes: vec![Parameter::root_group()],
        }
    }

    pub fn root(&self) -> ParamId {
        ROOT
    }

    pub fn node(&self, id: ParamId) -> &Parameter {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: ParamId) -> &mut Parameter {
        &mut self.nodes[id.0]
    }

    /// Dotted key of `id` from the tree root.
    pub fn full_key(&self, id: ParamId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ROOT {
                break;
            }
            let node = &self.nodes[cid.0];
            segments.push(node.key.as_str());
            current = node.root;
        }
        segments.reverse();
        segments.join(".")
    }

    fn child_by_key(&self, parent: ParamId, key: &str) -> Option<ParamId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].key == key)
    }

    fn push_child(&mut self, parent: ParamId, mut node: Parameter) -> ParamId {
        let id = ParamId(self.nodes.len());
        node.root = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn parent_of_new_key(&self, key: &str) -> ParameterResult<(ParamId, String)> {
        validate_key(key)?;
        let (parent_key, local) = split_parent(key);
        let parent = match parent_key {
            Some(pk) => self.get_parameter_by_key(pk)?,
            None => ROOT,
        };
        Ok((parent, local.to_string()))
    }

    // ================================
    // Structure
    // ================================

    /// Declare a parameter. The parent segment of `key` must name an existing
    /// group or choice branch.
    pub fn add_parameter(
        &mut self,
        kind: ParameterType,
        key: &str,
        name: &str,
    ) -> ParameterResult<ParamId> {
        let (parent, local) = self.parent_of_new_key(key)?;
        if self.nodes[parent.0].kind != ParameterType::Group {
            return Err(ParameterError::NotAGroup(self.full_key(parent)));
        }
        if self.child_by_key(parent, &local).is_some() {
            return Err(ParameterError::DuplicateKey(key.to_string()));
        }
        let node = Parameter::new(kind, local, name)?;
        Ok(self.push_child(parent, node))
    }

    /// Add a branch to a choice (returns the branch group) or an item to a
    /// list view (returns `None`). The parent segment of `key` names the
    /// choice; the last segment names the new entry.
    pub fn add_choice(&mut self, key: &str, name: &str) -> ParameterResult<Option<ParamId>> {
        let (parent, local) = self.parent_of_new_key(key)?;
        let parent_kind = self.nodes[parent.0].kind;
        match parent_kind {
            ParameterType::Choice => {
                if self.child_by_key(parent, &local).is_some() {
                    return Err(ParameterError::DuplicateKey(key.to_string()));
                }
                let mut branch = Parameter::new(ParameterType::Group, local, name)?;
                branch.mandatory = false;
                let first = self.nodes[parent.0].children.is_empty();
                branch.active = first;
                let id = self.push_child(parent, branch);
                if first {
                    if let ParameterValue::Choice(state) = &mut self.nodes[parent.0].value {
                        state.selected = Some(0);
                    }
                }
                Ok(Some(id))
            }
            t if t.is_list_view() => {
                let full = self.full_key(parent);
                if let ParameterValue::ListView(lv) = &mut self.nodes[parent.0].value {
                    if lv.index_of(&local).is_some() {
                        return Err(ParameterError::DuplicateKey(key.to_string()));
                    }
                    lv.items.push(ListViewItem {
                        key: local,
                        name: name.to_string(),
                    });
                    Ok(None)
                } else {
                    Err(ParameterError::type_mismatch(full, "Choice or ListView", t))
                }
            }
            other => Err(ParameterError::type_mismatch(
                self.full_key(parent),
                "Choice or ListView",
                other,
            )),
        }
    }

    pub(crate) fn walk(&self, key: &str, follow_proxy: bool) -> ParameterResult<Walk> {
        validate_key(key)?;
        let segments: Vec<&str> = key.split('.').collect();
        let mut current = ROOT;
        for (i, segment) in segments.iter().enumerate() {
            if !self.nodes[current.0].kind.is_container() {
                return Err(ParameterError::NotAGroup(segments[..i].join(".")));
            }
            let child = self
                .child_by_key(current, segment)
                .ok_or_else(|| ParameterError::UnknownKey(key.to_string()))?;
            let is_last = i + 1 == segments.len();
            if let ParameterValue::Proxy(target) = &self.nodes[child.0].value {
                if !is_last {
                    return Ok(Walk::Redirect {
                        target: target.clone(),
                        rest: Some(segments[i + 1..].join(".")),
                    });
                }
                if follow_proxy {
                    return Ok(Walk::Redirect {
                        target: target.clone(),
                        rest: None,
                    });
                }
            }
            current = child;
        }
        Ok(Walk::Found(current))
    }

    /// Resolve a dotted key inside this tree without following proxies.
    /// A path that has to cross a proxy cannot be resolved locally.
    pub fn get_parameter_by_key(&self, key: &str) -> ParameterResult<ParamId> {
        match self.walk(key, false)? {
            Walk::Found(id) => Ok(id),
            Walk::Redirect { .. } => Err(ParameterError::UnknownKey(key.to_string())),
        }
    }

    /// Swap the direct child `key` of `group` for `replacement`, in place.
    ///
    /// The replaced node's descendants stay in the arena but are detached:
    /// their `root` is cleared and no key resolves to them any more.
    pub fn replace_parameter(
        &mut self,
        group: ParamId,
        key: &str,
        mut replacement: Parameter,
    ) -> ParameterResult<ParamId> {
        let group_key = self.full_key(group);
        if !self.nodes[group.0].kind.is_container() {
            return Err(ParameterError::NotAGroup(group_key));
        }
        if key.contains('.') {
            return Err(ParameterError::NotDirectChild {
                group: group_key,
                key: key.to_string(),
            });
        }
        let existing = self
            .child_by_key(group, key)
            .ok_or_else(|| ParameterError::NotDirectChild {
                group: group_key,
                key: key.to_string(),
            })?;
        if replacement.key != key {
            return Err(ParameterError::KeyMismatch {
                expected: key.to_string(),
                actual: replacement.key,
            });
        }
        for orphan in self.descendants(existing) {
            self.nodes[orphan.0].root = None;
        }
        replacement.root = Some(group);
        self.nodes[existing.0] = replacement;
        Ok(existing)
    }

    /// Every node reachable from `id`, depth first, in declaration order,
    /// `id` excluded.
    pub fn descendants(&self, id: ParamId) -> Vec<ParamId> {
        let mut out = Vec::new();
        let mut stack: Vec<ParamId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// Full keys of the root's children; with `recursive`, of every
    /// parameter below them. Choice branch groups are traversed but not
    /// listed themselves.
    pub fn keys(&self, recursive: bool) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_keys(ROOT, recursive, &mut out);
        out
    }

    fn collect_keys(&self, parent: ParamId, recursive: bool, out: &mut Vec<String>) {
        for child in &self.nodes[parent.0].children {
            let node = &self.nodes[child.0];
            out.push(self.full_key(*child));
            if !recursive {
                continue;
            }
            match node.kind {
                ParameterType::Group => self.collect_keys(*child, true, out),
                ParameterType::Choice => {
                    for branch in &node.children {
                        self.collect_keys(*branch, true, out);
                    }
                }
                _ => {}
            }
        }
    }

    /// True iff `id` is a mandatory, valueless, non-output, non-group
    /// parameter and no ancestor below the root is both inactive and
    /// optional.
    pub fn is_parameter_missing(&self, id: ParamId) -> bool {
        let node = &self.nodes[id.0];
        if node.role == super::Role::Output
            || node.kind == ParameterType::Group
            || node.kind == ParameterType::Proxy
            || !node.mandatory
            || node.has_value()
        {
            return false;
        }
        let mut current = node.root;
        while let Some(pid) = current {
            if pid == ROOT {
                break;
            }
            let ancestor = &self.nodes[pid.0];
            if !ancestor.active && !ancestor.mandatory {
                return false;
            }
            current = ancestor.root;
        }
        true
    }

    // ================================
    // Choices
    // ================================

    pub fn select_choice(&mut self, id: ParamId, index: usize) -> ParameterResult<()> {
        let key = self.full_key(id);
        let kind = self.nodes[id.0].kind;
        if kind != ParameterType::Choice {
            return Err(ParameterError::type_mismatch(key, "Choice", kind));
        }
        let branches = self.nodes[id.0].children.clone();
        if index >= branches.len() {
            return Err(ParameterError::UnknownChoice {
                key,
                choice: index.to_string(),
            });
        }
        for (i, branch) in branches.iter().enumerate() {
            self.nodes[branch.0].active = i == index;
        }
        if let ParameterValue::Choice(state) = &mut self.nodes[id.0].value {
            state.selected = Some(index);
        }
        Ok(())
    }

    fn choice_index(&self, id: ParamId, value: &str) -> ParameterResult<usize> {
        let wanted = last_segment(value.trim());
        self.nodes[id.0]
            .children
            .iter()
            .position(|c| self.nodes[c.0].key == wanted)
            .ok_or_else(|| ParameterError::UnknownChoice {
                key: self.full_key(id),
                choice: value.to_string(),
            })
    }

    /// Key of the selected branch, without any parent prefix.
    pub fn choice_value(&self, id: ParamId) -> Option<String> {
        let ParameterValue::Choice(state) = &self.nodes[id.0].value else {
            return None;
        };
        let branch = self.nodes[id.0].children.get(state.selected?)?;
        Some(last_segment(&self.full_key(*branch)).to_string())
    }

    pub fn choice_keys(&self, id: ParamId) -> ParameterResult<Vec<String>> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::Choice(_) => Ok(node
                .children
                .iter()
                .map(|c| self.nodes[c.0].key.clone())
                .collect()),
            ParameterValue::ListView(lv) => Ok(lv.items.iter().map(|i| i.key.clone()).collect()),
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "Choice or ListView",
                node.kind,
            )),
        }
    }

    pub fn choice_names(&self, id: ParamId) -> ParameterResult<Vec<String>> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::Choice(_) => Ok(node
                .children
                .iter()
                .map(|c| self.nodes[c.0].name.clone())
                .collect()),
            ParameterValue::ListView(lv) => {
                Ok(lv.items.iter().map(|i| i.name.clone()).collect())
            }
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "Choice or ListView",
                node.kind,
            )),
        }
    }

    // ================================
    // Typed values
    // ================================

    fn finish_set(&mut self, id: ParamId, origin: MutationOrigin) {
        let node = &mut self.nodes[id.0];
        node.active = true;
        if origin == MutationOrigin::User {
            node.user_value = true;
        }
    }

    pub fn set_string(
        &mut self,
        id: ParamId,
        value: &str,
        origin: MutationOrigin,
    ) -> ParameterResult<()> {
        let key = self.full_key(id);
        let kind = self.nodes[id.0].kind;
        if kind == ParameterType::Choice {
            let index = self.choice_index(id, value)?;
            self.select_choice(id, index)?;
            self.finish_set(id, origin);
            return Ok(());
        }
        match &mut self.nodes[id.0].value {
            ParameterValue::Bool(b) => *b = parse_bool(&key, value)?,
            ParameterValue::Int(n) => {
                let v = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ParameterError::invalid_value(&key, value, "expected an integer"))?;
                n.assign(&key, v)?;
            }
            ParameterValue::Float(n) => {
                let v = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ParameterError::invalid_value(&key, value, "expected a number"))?;
                n.assign(&key, v)?;
            }
            ParameterValue::Text(s) => *s = Some(value.to_string()),
            ParameterValue::TextList(items) => *items = vec![value.to_string()],
            ParameterValue::ListView(lv) => {
                let index = lv.index_of(value).ok_or_else(|| ParameterError::UnknownChoice {
                    key: key.clone(),
                    choice: value.to_string(),
                })?;
                lv.selected = vec![index];
            }
            ParameterValue::InputImage(slot) => *slot = InputImageSlot::from_file(value),
            ParameterValue::InputImageList(slots) => {
                *slots = vec![InputImageSlot::from_file(value)]
            }
            ParameterValue::OutputImage(slot) => slot.file = Some(value.to_string()),
            ParameterValue::InputVectorData(slot) => {
                *slot = InputVectorSlot {
                    file: Some(value.to_string()),
                    data: None,
                }
            }
            ParameterValue::InputVectorDataList(slots) => {
                *slots = vec![InputVectorSlot {
                    file: Some(value.to_string()),
                    data: None,
                }]
            }
            ParameterValue::OutputVectorData(slot) => slot.file = Some(value.to_string()),
            ParameterValue::Group | ParameterValue::Proxy(_) | ParameterValue::Choice(_) => {
                return Err(ParameterError::type_mismatch(key, "a value-carrying kind", kind))
            }
        }
        self.finish_set(id, origin);
        Ok(())
    }

    pub fn set_string_list(
        &mut self,
        id: ParamId,
        values: &[String],
        origin: MutationOrigin,
    ) -> ParameterResult<()> {
        let key = self.full_key(id);
        let kind = self.nodes[id.0].kind;
        match &mut self.nodes[id.0].value {
            ParameterValue::TextList(items) => *items = values.to_vec(),
            ParameterValue::InputImageList(slots) => {
                *slots = values.iter().map(InputImageSlot::from_file).collect()
            }
            ParameterValue::InputVectorDataList(slots) => {
                *slots = values
                    .iter()
                    .map(|f| InputVectorSlot {
                        file: Some(f.clone()),
                        data: None,
                    })
                    .collect()
            }
            ParameterValue::ListView(lv) => {
                let mut selected = Vec::with_capacity(values.len());
                for v in values {
                    let index = lv.index_of(v).ok_or_else(|| ParameterError::UnknownChoice {
                        key: key.clone(),
                        choice: v.clone(),
                    })?;
                    selected.push(index);
                }
                lv.selected = selected;
            }
            _ => return Err(ParameterError::type_mismatch(key, "a list kind", kind)),
        }
        self.finish_set(id, origin);
        Ok(())
    }

    pub fn set_int(&mut self, id: ParamId, value: i64, origin: MutationOrigin) -> ParameterResult<()> {
        let key = self.full_key(id);
        let kind = self.nodes[id.0].kind;
        if kind == ParameterType::Choice {
            let index = usize::try_from(value).map_err(|_| ParameterError::UnknownChoice {
                key: key.clone(),
                choice: value.to_string(),
            })?;
            self.select_choice(id, index)?;
            self.finish_set(id, origin);
            return Ok(());
        }
        match &mut self.nodes[id.0].value {
            ParameterValue::Int(n) => n.assign(&key, value)?,
            ParameterValue::Float(n) => n.assign(&key, value as f64)?,
            ParameterValue::Bool(b) => *b = value != 0,
            ParameterValue::ListView(lv) => {
                let index = usize::try_from(value)
                    .ok()
                    .filter(|i| *i < lv.items.len())
                    .ok_or_else(|| ParameterError::UnknownChoice {
                        key: key.clone(),
                        choice: value.to_string(),
                    })?;
                lv.selected = vec![index];
            }
            _ => return Err(ParameterError::type_mismatch(key, "a numeric kind", kind)),
        }
        self.finish_set(id, origin);
        Ok(())
    }

    pub fn set_float(
        &mut self,
        id: ParamId,
        value: f64,
        origin: MutationOrigin,
    ) -> ParameterResult<()> {
        let key = self.full_key(id);
        let kind = self.nodes[id.0].kind;
        match &mut self.nodes[id.0].value {
            ParameterValue::Float(n) => n.assign(&key, value)?,
            _ => return Err(ParameterError::type_mismatch(key, "Float", kind)),
        }
        self.finish_set(id, origin);
        Ok(())
    }

    pub fn get_int(&self, id: ParamId) -> ParameterResult<i64> {
        let node = &self.nodes[id.0];
        let key = || self.full_key(id);
        match &node.value {
            ParameterValue::Int(n) => n.value.ok_or_else(|| ParameterError::NoValue(key())),
            ParameterValue::Bool(b) => Ok(i64::from(*b)),
            ParameterValue::Choice(c) => c
                .selected
                .map(|s| s as i64)
                .ok_or_else(|| ParameterError::NoValue(key())),
            ParameterValue::ListView(lv) => lv
                .selected
                .first()
                .map(|s| *s as i64)
                .ok_or_else(|| ParameterError::NoValue(key())),
            _ => Err(ParameterError::type_mismatch(key(), "an integer kind", node.kind)),
        }
    }

    pub fn get_float(&self, id: ParamId) -> ParameterResult<f64> {
        let node = &self.nodes[id.0];
        let key = || self.full_key(id);
        match &node.value {
            ParameterValue::Float(n) => n.value.ok_or_else(|| ParameterError::NoValue(key())),
            ParameterValue::Int(n) => n
                .value
                .map(|v| v as f64)
                .ok_or_else(|| ParameterError::NoValue(key())),
            _ => Err(ParameterError::type_mismatch(key(), "Float", node.kind)),
        }
    }

    pub fn get_bool(&self, id: ParamId) -> ParameterResult<bool> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::Bool(b) => Ok(*b),
            _ => Err(ParameterError::type_mismatch(self.full_key(id), "Bool", node.kind)),
        }
    }

    pub fn get_string(&self, id: ParamId) -> ParameterResult<String> {
        let node = &self.nodes[id.0];
        let key = || self.full_key(id);
        let value = match &node.value {
            ParameterValue::Text(s) => s.clone(),
            ParameterValue::Choice(_) => self.choice_value(id),
            ParameterValue::ListView(lv) => lv.selected_keys().into_iter().next(),
            ParameterValue::InputImage(slot) => slot.file.clone(),
            ParameterValue::OutputImage(slot) => slot.file.clone(),
            ParameterValue::InputVectorData(slot) => slot.file.clone(),
            ParameterValue::OutputVectorData(slot) => slot.file.clone(),
            _ => return Err(ParameterError::type_mismatch(key(), "a string kind", node.kind)),
        };
        value.ok_or_else(|| ParameterError::NoValue(key()))
    }

    pub fn get_string_list(&self, id: ParamId) -> ParameterResult<Vec<String>> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::TextList(items) => Ok(items.clone()),
            ParameterValue::InputImageList(slots) => Ok(slots
                .iter()
                .map(|s| s.file.clone().unwrap_or_default())
                .collect()),
            ParameterValue::InputVectorDataList(slots) => Ok(slots
                .iter()
                .map(|s| s.file.clone().unwrap_or_default())
                .collect()),
            ParameterValue::ListView(lv) => Ok(lv.selected_keys()),
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "a list kind",
                node.kind,
            )),
        }
    }

    /// Textual form of any value-carrying kind; empty when unset.
    pub fn get_as_string(&self, id: ParamId) -> ParameterResult<String> {
        let node = &self.nodes[id.0];
        let text = match &node.value {
            ParameterValue::Group | ParameterValue::Proxy(_) => {
                return Err(ParameterError::type_mismatch(
                    self.full_key(id),
                    "a value-carrying kind",
                    node.kind,
                ))
            }
            ParameterValue::Bool(b) => b.to_string(),
            ParameterValue::Int(n) => n.value.map(|v| v.to_string()).unwrap_or_default(),
            ParameterValue::Float(n) => n.value.map(|v| v.to_string()).unwrap_or_default(),
            ParameterValue::Text(s) => s.clone().unwrap_or_default(),
            ParameterValue::TextList(items) => items.join(" "),
            ParameterValue::Choice(_) => self.choice_value(id).unwrap_or_default(),
            ParameterValue::ListView(lv) => lv.selected_keys().join(" "),
            ParameterValue::InputImage(slot) => slot.file.clone().unwrap_or_default(),
            ParameterValue::InputImageList(slots) => slots
                .iter()
                .filter_map(|s| s.file.clone())
                .collect::<Vec<_>>()
                .join(" "),
            ParameterValue::OutputImage(slot) => slot.file.clone().unwrap_or_default(),
            ParameterValue::InputVectorData(slot) => slot.file.clone().unwrap_or_default(),
            ParameterValue::InputVectorDataList(slots) => slots
                .iter()
                .filter_map(|s| s.file.clone())
                .collect::<Vec<_>>()
                .join(" "),
            ParameterValue::OutputVectorData(slot) => slot.file.clone().unwrap_or_default(),
        };
        Ok(text)
    }

    pub fn clear_value(&mut self, id: ParamId) {
        let node = &mut self.nodes[id.0];
        node.value.clear();
        node.user_value = false;
    }

    // ================================
    // Kind-specific payload access
    // ================================

    pub(crate) fn int_value_mut(&mut self, id: ParamId) -> ParameterResult<&mut NumericValue<i64>> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::Int(n) => Ok(n),
            _ => Err(ParameterError::type_mismatch(key, "an integer kind", node.kind)),
        }
    }

    pub(crate) fn float_value_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut NumericValue<f64>> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::Float(n) => Ok(n),
            _ => Err(ParameterError::type_mismatch(key, "Float", node.kind)),
        }
    }

    pub fn input_image_slot(&self, id: ParamId) -> ParameterResult<&InputImageSlot> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::InputImage(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(self.full_key(id), "InputImage", node.kind)),
        }
    }

    pub(crate) fn input_image_slot_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut InputImageSlot> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::InputImage(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(key, "InputImage", node.kind)),
        }
    }

    pub fn input_image_slots(&self, id: ParamId) -> ParameterResult<&[InputImageSlot]> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::InputImageList(slots) => Ok(slots),
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "InputImageList",
                node.kind,
            )),
        }
    }

    pub(crate) fn input_image_slots_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut Vec<InputImageSlot>> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::InputImageList(slots) => Ok(slots),
            _ => Err(ParameterError::type_mismatch(key, "InputImageList", node.kind)),
        }
    }

    pub fn output_image_slot(&self, id: ParamId) -> ParameterResult<&OutputImageSlot> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::OutputImage(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(self.full_key(id), "OutputImage", node.kind)),
        }
    }

    pub(crate) fn output_image_slot_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut OutputImageSlot> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::OutputImage(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(key, "OutputImage", node.kind)),
        }
    }

    pub fn input_vector_slot(&self, id: ParamId) -> ParameterResult<&InputVectorSlot> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::InputVectorData(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "InputVectorData",
                node.kind,
            )),
        }
    }

    pub(crate) fn input_vector_slot_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut InputVectorSlot> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::InputVectorData(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(key, "InputVectorData", node.kind)),
        }
    }

    pub fn input_vector_slots(&self, id: ParamId) -> ParameterResult<&[InputVectorSlot]> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::InputVectorDataList(slots) => Ok(slots),
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "InputVectorDataList",
                node.kind,
            )),
        }
    }

    pub(crate) fn input_vector_slots_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut Vec<InputVectorSlot>> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::InputVectorDataList(slots) => Ok(slots),
            _ => Err(ParameterError::type_mismatch(key, "InputVectorDataList", node.kind)),
        }
    }

    pub fn output_vector_slot(&self, id: ParamId) -> ParameterResult<&OutputVectorSlot> {
        let node = &self.nodes[id.0];
        match &node.value {
            ParameterValue::OutputVectorData(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(
                self.full_key(id),
                "OutputVectorData",
                node.kind,
            )),
        }
    }

    pub(crate) fn output_vector_slot_mut(
        &mut self,
        id: ParamId,
    ) -> ParameterResult<&mut OutputVectorSlot> {
        let key = self.full_key(id);
        let node = &mut self.nodes[id.0];
        match &mut node.value {
            ParameterValue::OutputVectorData(slot) => Ok(slot),
            _ => Err(ParameterError::type_mismatch(key, "OutputVectorData", node.kind)),
        }
    }

    /// Mark a parameter as freshly assigned by `origin` after a direct
    /// payload mutation.
    pub(crate) fn touch(&mut self, id: ParamId, origin: MutationOrigin) {
        self.finish_set(id, origin);
    }
}

impl Default for ParameterTree {
    fn default() -> Self {
        Self::new()
    }
}
