//! Typed, hierarchical parameter model.
//!
//! - [`ParameterTree`]: arena of [`Parameter`] nodes addressed by [`ParamId`].
//! - [`ParameterValue`]: closed tagged variant carrying each kind's payload.
//! - [`ProxyTarget`] / [`resolve`]: forwarding to parameters owned by another tree.

pub mod key;
pub mod kind;
pub mod node;
pub mod proxy;
pub mod tree;
pub mod value;

pub use kind::{MutationOrigin, ParameterType, Role, UserLevel};
pub use node::Parameter;
pub use proxy::{resolve, ParameterHandle, ProxyTarget, SharedTree};
pub use tree::{ParamId, ParameterTree};
pub use value::{
    ChoiceState, InputImageSlot, InputVectorSlot, ListViewItem, ListViewState, NumericValue,
    OutputImageSlot, OutputVectorSlot, ParameterValue,
};
