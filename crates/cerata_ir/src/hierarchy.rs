//! Component hierarchy traversal.

use crate::error::GraphError;
use crate::ids::GraphId;
use crate::pool::Pool;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

impl Pool {
    /// Distinct components instantiated directly by `graph`, in first-use order.
    pub fn instantiated_components(&self, graph: GraphId) -> Vec<GraphId> {
        let mut out = Vec::new();
        for inst in self.instances(graph) {
            if let Some(comp) = self.graph(inst).component() {
                if !out.contains(&comp) {
                    out.push(comp);
                }
            }
        }
        out
    }

    /// Every component reachable from `root` through instances, deduplicated
    /// in first-visit order. `root` itself is not included.
    pub fn unique_components(&self, root: GraphId) -> Vec<GraphId> {
        let mut out = Vec::new();
        self.collect_components(root, root, &mut out);
        out
    }

    fn collect_components(&self, graph: GraphId, root: GraphId, out: &mut Vec<GraphId>) {
        for comp in self.instantiated_components(graph) {
            if comp != root && !out.contains(&comp) {
                out.push(comp);
                self.collect_components(comp, root, out);
            }
        }
    }

    /// `root` and every component it reaches, ordered so that a component
    /// comes after all components it instantiates.
    pub fn component_order(&self, root: GraphId) -> Result<Vec<GraphId>, GraphError> {
        let mut graph: DiGraph<GraphId, ()> = DiGraph::new();
        let mut index: HashMap<GraphId, NodeIndex> = HashMap::new();
        let mut reachable = vec![root];
        reachable.extend(self.unique_components(root));
        for comp in &reachable {
            index.insert(*comp, graph.add_node(*comp));
        }
        for comp in &reachable {
            for child in self.instantiated_components(*comp) {
                graph.add_edge(index[&child], index[comp], ());
            }
        }
        let order = algo::toposort(&graph, None).map_err(|cycle| {
            GraphError::InstantiationCycle {
                component: self.graph_name(graph[cycle.node_id()]).to_string(),
            }
        })?;
        Ok(order.into_iter().map(|n| graph[n]).collect())
    }
}
