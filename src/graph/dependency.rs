use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::application::Application;
use crate::error::{AppResult, ApplicationError};

#[derive(Debug)]
pub struct DependencyGraph {
    graph: StableDiGraph<Application, ()>,
    index_map: HashMap<u64, NodeIndex>,
    root: NodeIndex,
}

impl DependencyGraph {
    /// Collect every application reachable upstream of `root` through
    /// image connections.
    pub fn build(root: &Application) -> AppResult<Self> {
        let mut graph = StableDiGraph::new();
        let mut index_map = HashMap::new();
        let root_idx = graph.add_node(root.clone());
        index_map.insert(root.id(), root_idx);

        let mut stack = vec![root.clone()];
        while let Some(app) = stack.pop() {
            let app_idx = index_map[&app.id()];
            for upstream in app.upstream_applications()? {
                let upstream_idx = match index_map.get(&upstream.id()) {
                    Some(idx) => *idx,
                    None => {
                        let idx = graph.add_node(upstream.clone());
                        index_map.insert(upstream.id(), idx);
                        stack.push(upstream);
                        idx
                    }
                };
                graph.update_edge(upstream_idx, app_idx, ());
            }
        }

        Ok(DependencyGraph {
            graph,
            index_map,
            root: root_idx,
        })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, app: &Application) -> bool {
        self.index_map.contains_key(&app.id())
    }

    pub fn root(&self) -> &Application {
        &self.graph[self.root]
    }

    /// Applications feeding `app` directly.
    pub fn upstream_of(&self, app: &Application) -> Vec<Application> {
        let Some(idx) = self.index_map.get(&app.id()) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(*idx, petgraph::Direction::Incoming)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect()
    }

    /// Reject connection cycles, naming the applications involved.
    pub fn validate(&self) -> AppResult<()> {
        if !petgraph::algo::is_cyclic_directed(&self.graph) {
            return Ok(());
        }
        let mut names: Vec<String> = petgraph::algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .filter_map(|idx| self.graph.node_weight(idx).map(|a| a.name().to_string()))
            .collect();
        names.sort();
        Err(ApplicationError::DependencyCycle(names))
    }

    /// Topological order, upstream first.
    pub fn execution_order(&self) -> AppResult<Vec<Application>> {
        let sorted = petgraph::algo::toposort(&self.graph, None).map_err(|cycle| {
            let name = self
                .graph
                .node_weight(cycle.node_id())
                .map(|a| a.name().to_string())
                .unwrap_or_default();
            ApplicationError::DependencyCycle(vec![name])
        })?;
        Ok(sorted
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect())
    }
}
