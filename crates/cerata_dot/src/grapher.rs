//! Graph to DOT text.
//!
//! Components and instances become clusters, nodes are grouped per kind
//! inside their cluster and every edge is drawn once, after all nodes.
//! Literals and expressions have no owner; they are drawn next to the first
//! node they drive.

use crate::error::DotError;
use crate::style::{Config, Style};
use cerata_ir::{EdgeId, GraphId, NodeClass, NodeId, NodeKind, Pool};
use std::collections::HashSet;
use std::fmt::Write;
use std::fs;
use std::path::Path;

const GROUPS: [NodeClass; 5] = [
    NodeClass::Parameter,
    NodeClass::Port,
    NodeClass::ArrayPort,
    NodeClass::Signal,
    NodeClass::ArraySignal,
];

/// DOT generator.
#[derive(Debug, Clone, Default)]
pub struct Grapher {
    /// Visual style.
    pub style: Style,
    /// Content switches.
    pub config: Config,
    drawn_nodes: HashSet<NodeId>,
    drawn_edges: HashSet<EdgeId>,
}

impl Grapher {
    /// A grapher with the given style and configuration.
    pub fn new(style: Style, config: Config) -> Self {
        Self {
            style,
            config,
            drawn_nodes: HashSet::new(),
            drawn_edges: HashSet::new(),
        }
    }

    /// Writes the DOT text of `graph` to `path` and returns it.
    pub fn gen_file(&mut self, pool: &Pool, graph: GraphId, path: &Path) -> Result<String, DotError> {
        let text = self.gen_dot(pool, graph);
        fs::write(path, &text).map_err(|source| DotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
        Ok(text)
    }

    /// The complete `digraph { ... }` text of `graph`.
    pub fn gen_dot(&mut self, pool: &Pool, graph: GraphId) -> String {
        self.drawn_nodes.clear();
        self.drawn_edges.clear();
        let mut out = String::from("digraph {\n");
        out.push_str("  graph [rankdir=LR, compound=true];\n");
        out.push_str(&self.gen_graph(pool, graph, 1));
        out.push_str(&self.gen_edges(pool, graph, 1));
        out.push_str("}\n");
        out
    }

    /// A cluster for `graph` holding its nodes and a nested cluster per
    /// child instance.
    pub fn gen_graph(&mut self, pool: &Pool, graph: GraphId, level: usize) -> String {
        let ind = indent(level);
        let g = pool.graph(graph);
        let (label, color) = match g.component() {
            Some(comp) => (
                format!("{} : {}", pool.graph_name(graph), pool.graph_name(comp)),
                self.style.instance_color,
            ),
            None => (pool.graph_name(graph).to_string(), self.style.component_color),
        };
        let mut out = String::new();
        let _ = writeln!(out, "{ind}subgraph cluster_{graph} {{");
        let _ = writeln!(out, "{ind}  label=\"{}\";", escape(&label));
        let _ = writeln!(out, "{ind}  color=\"{color}\";");
        for class in GROUPS {
            out.push_str(&self.gen_nodes(pool, graph, class, level + 1));
        }
        out.push_str(&self.gen_drivers(pool, graph, level + 1));
        for child in g.children.clone() {
            out.push_str(&self.gen_graph(pool, child, level + 1));
        }
        let _ = writeln!(out, "{ind}}}");
        out
    }

    /// The nodes of `graph` of one kind, as an unlabelled group.
    pub fn gen_nodes(&mut self, pool: &Pool, graph: GraphId, class: NodeClass, level: usize) -> String {
        if class == NodeClass::Parameter && !self.config.parameters {
            return String::new();
        }
        let nodes = pool.nodes_of(graph, class);
        if nodes.is_empty() {
            return String::new();
        }
        let ind = indent(level);
        let key = class.to_string().replace(' ', "_");
        let mut out = String::new();
        let _ = writeln!(out, "{ind}subgraph {graph}_{key} {{");
        for node in nodes {
            out.push_str(&self.gen_node(pool, node, level + 1));
        }
        let _ = writeln!(out, "{ind}}}");
        out
    }

    /// A single node statement.
    pub fn gen_node(&mut self, pool: &Pool, node: NodeId, level: usize) -> String {
        self.drawn_nodes.insert(node);
        let attrs = self.style.node(pool.node(node).class()).attributes();
        format!(
            "{}{node} [label=\"{}\", {attrs}];\n",
            indent(level),
            self.label(pool, node)
        )
    }

    /// An expression as a cluster of operator and operand nodes.
    pub fn gen_expr(&mut self, pool: &Pool, expr: NodeId, level: usize) -> String {
        let NodeKind::Expression { op, lhs, rhs } = pool.node(expr).kind else {
            return self.gen_node(pool, expr, level);
        };
        self.drawn_nodes.insert(expr);
        let ind = indent(level);
        let mut out = String::new();
        let _ = writeln!(out, "{ind}subgraph cluster_{expr} {{");
        let _ = writeln!(out, "{ind}  label=\"\";");
        let _ = writeln!(out, "{ind}  style=dotted;");
        let _ = writeln!(
            out,
            "{ind}  {expr} [label=\"{}\", {}];",
            op.symbol(),
            self.style.expression.attributes()
        );
        for (side, operand) in [("l", lhs), ("r", rhs)] {
            let from = match pool.node(operand).kind {
                NodeKind::Expression { .. } => {
                    out.push_str(&self.gen_expr(pool, operand, level + 1));
                    operand.to_string()
                }
                NodeKind::Parameter { .. } if self.drawn_nodes.contains(&operand) => {
                    operand.to_string()
                }
                _ => {
                    // literals are shared between expressions; draw a private copy
                    let id = format!("{expr}_{side}");
                    let _ = writeln!(
                        out,
                        "{ind}  {id} [label=\"{}\", {}];",
                        self.label(pool, operand),
                        self.style.node(pool.node(operand).class()).attributes()
                    );
                    id
                }
            };
            let _ = writeln!(out, "{ind}  {from} -> {expr} [arrowsize=0.5];");
        }
        let _ = writeln!(out, "{ind}}}");
        out
    }

    fn gen_drivers(&mut self, pool: &Pool, graph: GraphId, level: usize) -> String {
        let mut out = String::new();
        for node in pool.graph(graph).nodes.clone() {
            for edge in pool.node(node).inputs() {
                let Some(src) = pool.edge(edge).src else {
                    continue;
                };
                let n = pool.node(src);
                if n.parent.is_some() || self.drawn_nodes.contains(&src) {
                    continue;
                }
                if n.is_literal() && self.config.literals {
                    out.push_str(&self.gen_node(pool, src, level));
                } else if n.is_expression() && self.config.expressions {
                    out.push_str(&self.gen_expr(pool, src, level));
                }
            }
        }
        out
    }

    /// Every edge between drawn nodes of `graph` and its descendants,
    /// each at most once.
    pub fn gen_edges(&mut self, pool: &Pool, graph: GraphId, level: usize) -> String {
        let ind = indent(level);
        let mut out = String::new();
        let mut stack = vec![graph];
        while let Some(g) = stack.pop() {
            let g = pool.graph(g);
            stack.extend(g.children.iter().rev());
            for &node in &g.nodes {
                let size = pool.node(node).array().and_then(|a| a.size);
                for edge in pool.node(node).inputs() {
                    let Some(src) = pool.edge(edge).src else {
                        continue;
                    };
                    if !self.drawn_nodes.contains(&src) || !self.drawn_edges.insert(edge) {
                        continue;
                    }
                    let style = if Some(edge) == size { ", style=dashed" } else { "" };
                    let _ = writeln!(
                        out,
                        "{ind}{src} -> {node} [color=\"{}\"{style}];",
                        self.style.edge_color
                    );
                }
            }
        }
        out
    }

    fn label(&self, pool: &Pool, node: NodeId) -> String {
        let n = pool.node(node);
        if n.is_literal() || n.is_expression() {
            return escape(&pool.node_string(node));
        }
        let mut label = escape(pool.node_name(node));
        if let Ok(size) = pool.array_size(node) {
            let _ = write!(label, " [{}]", escape(&pool.node_string(size)));
        }
        if self.config.types {
            let _ = write!(label, "\\n{}", escape(pool.type_name(n.ty)));
        }
        label
    }
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
