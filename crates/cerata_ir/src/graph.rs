//! Components, instances and lookup of their nodes.
//!
//! A component is a template: its ports and parameters describe the
//! interface, its signals and child instances the implementation. An
//! instance is a copy of a component's interface placed inside another
//! component.

use crate::error::GraphError;
use crate::ids::{GraphId, NodeId};
use crate::node::{ArraySide, NodeClass, NodeKind};
use crate::pool::Pool;
use crate::tag::{self, Tag};
use cerata_common::Ident;
use std::collections::HashMap;

/// Whether a graph is a component or an instance of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// A component definition.
    Component,
    /// An instance of `component`.
    Instance {
        /// The instantiated component.
        component: GraphId,
    },
}

/// A component or instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Graph name.
    pub name: Ident,
    /// Component or instance.
    pub kind: GraphKind,
    /// Owned nodes in insertion order.
    pub nodes: Vec<NodeId>,
    /// Child instances in insertion order.
    pub children: Vec<GraphId>,
    /// The component an instance was placed in.
    pub parent: Option<GraphId>,
    /// Capability tags.
    pub tags: Vec<Tag>,
}

impl Graph {
    /// Whether this is a component.
    pub fn is_component(&self) -> bool {
        self.kind == GraphKind::Component
    }

    /// Whether this is an instance.
    pub fn is_instance(&self) -> bool {
        matches!(self.kind, GraphKind::Instance { .. })
    }

    /// The instantiated component, for instances.
    pub fn component(&self) -> Option<GraphId> {
        match self.kind {
            GraphKind::Instance { component } => Some(component),
            GraphKind::Component => None,
        }
    }

    /// Library and package, for primitive components.
    pub fn primitive(&self) -> Option<(&str, &str)> {
        tag::primitive_of(&self.tags)
    }
}

impl Pool {
    /// An empty component.
    pub fn component(&mut self, name: &str) -> GraphId {
        let name = self.intern(name);
        self.graphs.alloc(Graph {
            name,
            kind: GraphKind::Component,
            nodes: Vec::new(),
            children: Vec::new(),
            parent: None,
            tags: Vec::new(),
        })
    }

    /// A component owning the given parameters, ports and signals.
    ///
    /// Parameters with a default are driven by it.
    pub fn make_component(
        &mut self,
        name: &str,
        params: &[NodeId],
        ports: &[NodeId],
        signals: &[NodeId],
    ) -> Result<GraphId, GraphError> {
        let comp = self.component(name);
        for node in params.iter().chain(ports).chain(signals) {
            self.add_node(comp, *node)?;
        }
        Ok(comp)
    }

    /// Adds a node to a graph.
    ///
    /// Each node has at most one owner and instances own no signals. A
    /// parameter with a default is driven by its default. An array port
    /// added to a component collects its elements on the inside: an output
    /// array port is driven by many nodes and an input array port drives many.
    pub fn add_node(&mut self, graph: GraphId, node: NodeId) -> Result<(), GraphError> {
        if let Some(owner) = self.node(node).parent {
            if owner == graph {
                return Ok(());
            }
            return Err(GraphError::AlreadyOwned {
                node: self.node_name(node).to_string(),
                owner: self.graph_name(owner).to_string(),
            });
        }
        let is_instance = self.graph(graph).is_instance();
        if is_instance && self.node(node).is_signal() {
            return Err(GraphError::SignalOnInstance {
                node: self.node_name(node).to_string(),
                instance: self.graph_name(graph).to_string(),
            });
        }

        let n = self.nodes.get_mut(node);
        n.parent = Some(graph);
        if let NodeKind::ArrayPort { dir, array, .. } = &mut n.kind {
            if !is_instance && array.elements.is_empty() {
                array.side = ArraySide::from(dir.reverse());
            }
        }
        self.graphs[graph].nodes.push(node);

        if let NodeKind::Parameter { default: Some(default) } = self.node(node).kind {
            if self.node(node).input.is_none() {
                self.drive(node, default)?;
            }
        }
        Ok(())
    }

    /// Places an instance inside a component.
    pub fn add_child(&mut self, graph: GraphId, child: GraphId) -> Result<(), GraphError> {
        if !self.graph(graph).is_component() {
            return Err(GraphError::NotAComponent {
                graph: self.graph_name(graph).to_string(),
            });
        }
        if let Some(owner) = self.graph(child).parent {
            if owner == graph {
                return Ok(());
            }
            return Err(GraphError::AlreadyOwned {
                node: self.graph_name(child).to_string(),
                owner: self.graph_name(owner).to_string(),
            });
        }
        self.graphs[child].parent = Some(graph);
        self.graphs[graph].children.push(child);
        Ok(())
    }

    /// Creates an unplaced instance of `component`, named `<component>_inst`
    /// unless a name is given.
    ///
    /// Ports, array ports and parameters are copied. Array sizes that refer
    /// to a parameter of the component are rebound to the instance's copy.
    pub fn make_instance(
        &mut self,
        component: GraphId,
        name: Option<&str>,
    ) -> Result<GraphId, GraphError> {
        if !self.graph(component).is_component() {
            return Err(GraphError::NotAComponent {
                graph: self.graph_name(component).to_string(),
            });
        }
        let name = match name {
            Some(n) => n.to_string(),
            None => format!("{}_inst", self.graph_name(component)),
        };
        let ident = self.intern(&name);
        let inst = self.graphs.alloc(Graph {
            name: ident,
            kind: GraphKind::Instance { component },
            nodes: Vec::new(),
            children: Vec::new(),
            parent: None,
            tags: Vec::new(),
        });

        let template = self.graph(component).nodes.clone();
        let mut rebound: HashMap<NodeId, NodeId> = HashMap::new();
        for &orig in &template {
            let node = self.node(orig);
            let (name, ty) = (node.name, node.ty);
            let kind = match &node.kind {
                NodeKind::Parameter { default } => NodeKind::Parameter { default: *default },
                NodeKind::Port { dir, domain } => NodeKind::Port {
                    dir: *dir,
                    domain: *domain,
                },
                _ => continue,
            };
            let copy = self.nodes.alloc(crate::node::Node::new(name, ty, kind));
            self.add_node(inst, copy)?;
            rebound.insert(orig, copy);
        }
        for &orig in &template {
            let NodeKind::ArrayPort { dir, domain, .. } = self.node(orig).kind else {
                continue;
            };
            let size = self.array_size(orig)?;
            let size = rebound.get(&size).copied().unwrap_or(size);
            let node_name = self.node_name(orig).to_string();
            let ty = self.node(orig).ty;
            let copy = self.array_port_in_domain(&node_name, ty, size, dir, domain);
            self.add_node(inst, copy)?;
        }
        log::trace!("instantiated `{}` as `{name}`", self.graph_name(component));
        Ok(inst)
    }

    /// Instantiates `component` inside `parent`.
    pub fn instantiate(
        &mut self,
        parent: GraphId,
        component: GraphId,
        name: Option<&str>,
    ) -> Result<GraphId, GraphError> {
        let inst = self.make_instance(component, name)?;
        self.add_child(parent, inst)?;
        Ok(inst)
    }

    /// Tags a graph.
    pub fn add_graph_tag(&mut self, graph: GraphId, tag: Tag) {
        let tags = &mut self.graphs[graph].tags;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    /// The node of class `class` named `name`.
    pub fn get(&self, graph: GraphId, class: NodeClass, name: &str) -> Result<NodeId, GraphError> {
        self.find(graph, |n| n == class, name)
            .ok_or_else(|| GraphError::NodeNotFound {
                graph: self.graph_name(graph).to_string(),
                class,
                name: name.to_string(),
            })
    }

    fn find(&self, graph: GraphId, class: impl Fn(NodeClass) -> bool, name: &str) -> Option<NodeId> {
        let ident = self.interner().get(name)?;
        self.graph(graph)
            .nodes
            .iter()
            .copied()
            .find(|id| {
                let n = self.node(*id);
                n.name == ident && class(n.class())
            })
    }

    /// A port or array port named `name`.
    pub fn port_of(&self, graph: GraphId, name: &str) -> Result<NodeId, GraphError> {
        self.find(
            graph,
            |c| matches!(c, NodeClass::Port | NodeClass::ArrayPort),
            name,
        )
        .ok_or_else(|| GraphError::NodeNotFound {
            graph: self.graph_name(graph).to_string(),
            class: NodeClass::Port,
            name: name.to_string(),
        })
    }

    /// A parameter named `name`.
    pub fn parameter_of(&self, graph: GraphId, name: &str) -> Result<NodeId, GraphError> {
        self.get(graph, NodeClass::Parameter, name)
    }

    /// A port, array port, signal or array signal named `name`.
    pub fn wire_of(&self, graph: GraphId, name: &str) -> Result<NodeId, GraphError> {
        self.find(
            graph,
            |c| {
                matches!(
                    c,
                    NodeClass::Port | NodeClass::ArrayPort | NodeClass::Signal | NodeClass::ArraySignal
                )
            },
            name,
        )
        .ok_or_else(|| GraphError::NodeNotFound {
            graph: self.graph_name(graph).to_string(),
            class: NodeClass::Signal,
            name: name.to_string(),
        })
    }

    /// Number of owned nodes of class `class`.
    pub fn count_nodes(&self, graph: GraphId, class: NodeClass) -> usize {
        self.nodes_of(graph, class).len()
    }

    /// Owned nodes of class `class`, in insertion order.
    pub fn nodes_of(&self, graph: GraphId, class: NodeClass) -> Vec<NodeId> {
        self.graph(graph)
            .nodes
            .iter()
            .copied()
            .filter(|n| self.node(*n).class() == class)
            .collect()
    }

    /// Ports and array ports, in insertion order.
    pub fn ports(&self, graph: GraphId) -> Vec<NodeId> {
        self.graph(graph)
            .nodes
            .iter()
            .copied()
            .filter(|n| self.node(*n).is_port())
            .collect()
    }

    /// Signals and array signals, in insertion order.
    pub fn signals(&self, graph: GraphId) -> Vec<NodeId> {
        self.graph(graph)
            .nodes
            .iter()
            .copied()
            .filter(|n| self.node(*n).is_signal())
            .collect()
    }

    /// Child instances, in insertion order.
    pub fn instances(&self, graph: GraphId) -> Vec<GraphId> {
        self.graph(graph)
            .children
            .iter()
            .copied()
            .filter(|g| self.graph(*g).is_instance())
            .collect()
    }

    /// The instance named `name` inside `graph`.
    pub fn instance_of(&self, graph: GraphId, name: &str) -> Option<GraphId> {
        let ident = self.interner().get(name)?;
        self.instances(graph)
            .into_iter()
            .find(|g| self.graph(*g).name == ident)
    }

    /// The component named `name`.
    pub fn find_component(&self, name: &str) -> Option<GraphId> {
        let ident = self.interner().get(name)?;
        self.graphs()
            .find(|(_, g)| g.is_component() && g.name == ident)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{LiteralValue, PortDir};

    fn child_component(pool: &mut Pool) -> GraphId {
        let width = pool.parameter("WIDTH", pool.natural(), Some(LiteralValue::Int(8)));
        let vec = pool.vector("vecw", width);
        let i = pool.port("i", vec, PortDir::In);
        let o = pool.port("o", vec, PortDir::Out);
        let n = pool.parameter("N", pool.natural(), Some(LiteralValue::Int(0)));
        let arr = pool.array_port("a", pool.bit(), n, PortDir::In);
        pool.make_component("child", &[width, n], &[i, o, arr], &[])
            .unwrap()
    }

    #[test]
    fn make_component_drives_defaults() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let width = pool.parameter_of(comp, "WIDTH").unwrap();
        assert!(pool.node(width).input.is_some());
        assert_eq!(pool.resolve_int(width), Some(8));
        assert_eq!(pool.count_nodes(comp, NodeClass::Port), 2);
        assert_eq!(pool.count_nodes(comp, NodeClass::ArrayPort), 1);
        assert_eq!(pool.ports(comp).len(), 3);
    }

    #[test]
    fn nodes_have_one_owner() {
        let mut pool = Pool::new();
        let p = pool.port("p", pool.bit(), PortDir::In);
        let a = pool.make_component("a", &[], &[p], &[]).unwrap();
        let b = pool.component("b");
        assert_eq!(
            pool.add_node(b, p).unwrap_err(),
            GraphError::AlreadyOwned {
                node: "p".into(),
                owner: "a".into()
            }
        );
        assert!(pool.add_node(a, p).is_ok());
    }

    #[test]
    fn instance_copies_interface() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let top = pool.component("top");
        let inst = pool.instantiate(top, comp, None).unwrap();
        assert_eq!(pool.graph_name(inst), "child_inst");
        assert_eq!(pool.graph(inst).component(), Some(comp));
        assert_eq!(pool.graph(inst).parent, Some(top));
        assert_eq!(pool.instances(top), vec![inst]);
        assert_eq!(pool.ports(inst).len(), 3);
        assert_eq!(pool.count_nodes(inst, NodeClass::Parameter), 2);

        let i_comp = pool.port_of(comp, "i").unwrap();
        let i_inst = pool.port_of(inst, "i").unwrap();
        assert_ne!(i_comp, i_inst);
        assert_eq!(pool.node(i_comp).ty, pool.node(i_inst).ty);
        assert_eq!(pool.node(i_inst).parent, Some(inst));
    }

    #[test]
    fn instance_array_size_is_rebound() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let inst = pool.make_instance(comp, Some("c0")).unwrap();
        let arr = pool.port_of(inst, "a").unwrap();
        let n_inst = pool.parameter_of(inst, "N").unwrap();
        assert_eq!(pool.array_size(arr).unwrap(), n_inst);
        assert_eq!(pool.node(arr).array().unwrap().side, ArraySide::In);

        // appending on the instance leaves the component's parameter alone
        let s = pool.signal("s", pool.bit());
        pool.connect(arr, s).unwrap();
        assert_eq!(pool.resolve_int(n_inst), Some(1));
        let n_comp = pool.parameter_of(comp, "N").unwrap();
        assert_eq!(pool.resolve_int(n_comp), Some(0));
    }

    #[test]
    fn component_array_ports_collect_inside() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let arr = pool.port_of(comp, "a").unwrap();
        assert_eq!(pool.node(arr).array().unwrap().side, ArraySide::Out);
    }

    #[test]
    fn no_signals_on_instances() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let inst = pool.make_instance(comp, None).unwrap();
        let s = pool.signal("s", pool.bit());
        assert!(matches!(
            pool.add_node(inst, s),
            Err(GraphError::SignalOnInstance { .. })
        ));
    }

    #[test]
    fn lookup_errors() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let err = pool.get(comp, NodeClass::Signal, "i").unwrap_err();
        assert_eq!(err.to_string(), "signal `i` not found in `child`");
        assert!(pool.get(comp, NodeClass::Port, "i").is_ok());
        assert!(pool.wire_of(comp, "o").is_ok());
        assert!(pool.port_of(comp, "missing").is_err());
    }

    #[test]
    fn instances_only_in_components() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let inst = pool.make_instance(comp, None).unwrap();
        assert!(matches!(
            pool.make_instance(inst, None),
            Err(GraphError::NotAComponent { .. })
        ));
        let other = pool.make_instance(comp, Some("x")).unwrap();
        assert!(matches!(
            pool.add_child(inst, other),
            Err(GraphError::NotAComponent { .. })
        ));
    }

    #[test]
    fn instance_port_directions_are_enforced() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let top = pool.component("top");
        let inst = pool.instantiate(top, comp, None).unwrap();
        let o = pool.port_of(inst, "o").unwrap();
        let i = pool.port_of(inst, "i").unwrap();
        let s = pool.signal("s", pool.node(o).ty);
        pool.add_node(top, s).unwrap();
        assert!(matches!(
            pool.connect(o, s),
            Err(GraphError::IllegalDirection { .. })
        ));
        assert!(matches!(
            pool.connect(s, i),
            Err(GraphError::IllegalDirection { .. })
        ));
        assert!(pool.connect(i, s).is_ok());
        assert!(pool.connect(s, o).is_ok());
    }

    #[test]
    fn finds_components_and_instances() {
        let mut pool = Pool::new();
        let comp = child_component(&mut pool);
        let top = pool.component("top");
        let inst = pool.instantiate(top, comp, Some("c0")).unwrap();
        assert_eq!(pool.find_component("child"), Some(comp));
        assert_eq!(pool.find_component("c0"), None);
        assert_eq!(pool.instance_of(top, "c0"), Some(inst));
    }
}
