//! Cross-application dependency graph.
//!
//! Nodes are applications, edges run from an upstream application to the
//! application whose input it feeds. The graph is rebuilt from the current
//! connections before every top-level execution.

pub mod dependency;

pub use dependency::DependencyGraph;
