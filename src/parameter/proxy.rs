//! Proxy parameters and cross-tree key resolution.
//!
//! A tree is shared as [`SharedTree`]. A proxy keeps only a weak reference to
//! the tree owning its target, so resolution releases each tree's lock before
//! moving on to the next one and never holds two tree locks at once.

use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{ParameterError, ParameterResult};

use super::key;
use super::kind::ParameterType;
use super::tree::{ParamId, ParameterTree, Walk};

pub type SharedTree = Arc<RwLock<ParameterTree>>;

const MAX_PROXY_DEPTH: usize = 32;

/// `(owning tree, key)` of the parameter a proxy forwards to.
#[derive(Clone)]
pub struct ProxyTarget {
    tree: Weak<RwLock<ParameterTree>>,
    key: String,
}

impl ProxyTarget {
    pub fn new(tree: &SharedTree, key: impl Into<String>) -> Self {
        ProxyTarget {
            tree: Arc::downgrade(tree),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn tree(&self) -> Option<SharedTree> {
        self.tree.upgrade()
    }
}

impl fmt::Debug for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyTarget")
            .field("key", &self.key)
            .field("alive", &(self.tree.strong_count() > 0))
            .finish()
    }
}

/// A resolved parameter: the tree that owns it and its handle there.
#[derive(Clone)]
pub struct ParameterHandle {
    tree: SharedTree,
    id: ParamId,
}

impl ParameterHandle {
    pub fn new(tree: SharedTree, id: ParamId) -> Self {
        ParameterHandle { tree, id }
    }

    pub fn id(&self) -> ParamId {
        self.id
    }

    pub fn tree(&self) -> &SharedTree {
        &self.tree
    }

    pub fn read<R>(&self, f: impl FnOnce(&ParameterTree, ParamId) -> R) -> R {
        let guard = self.tree.read();
        f(&guard, self.id)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut ParameterTree, ParamId) -> R) -> R {
        let mut guard = self.tree.write();
        f(&mut guard, self.id)
    }

    pub fn kind(&self) -> ParameterType {
        self.read(|t, id| t.node(id).kind())
    }

    pub fn full_key(&self) -> String {
        self.read(|t, id| t.full_key(id))
    }
}

impl PartialEq for ParameterHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl Eq for ParameterHandle {}

impl fmt::Debug for ParameterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterHandle")
            .field("tree", &Arc::as_ptr(&self.tree))
            .field("id", &self.id)
            .finish()
    }
}

/// Resolve `key` starting at `tree`. Proxies met in the middle of a path are
/// always crossed; a proxy at the end of the path is followed only when
/// `follow_proxy` is set, recursively for proxy-of-proxy chains.
pub fn resolve(tree: &SharedTree, key: &str, follow_proxy: bool) -> ParameterResult<ParameterHandle> {
    let mut current = tree.clone();
    let mut current_key = key.to_string();
    for _ in 0..MAX_PROXY_DEPTH {
        let step = {
            let guard = current.read();
            guard.walk(&current_key, follow_proxy)?
        };
        match step {
            Walk::Found(id) => return Ok(ParameterHandle::new(current, id)),
            Walk::Redirect { target, rest } => {
                let next = target
                    .tree()
                    .ok_or_else(|| ParameterError::DanglingProxy(current_key.clone()))?;
                current_key = match rest {
                    Some(rest) => key::join(target.key(), &rest),
                    None => target.key().to_string(),
                };
                current = next;
            }
        }
    }
    Err(ParameterError::ProxyCycle(key.to_string()))
}
