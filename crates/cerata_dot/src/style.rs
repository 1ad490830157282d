//! Visual style and content switches for DOT output.

use cerata_ir::NodeClass;

/// Shape and colours of one kind of node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStyle {
    /// Graphviz shape.
    pub shape: &'static str,
    /// Outline colour.
    pub color: &'static str,
    /// Fill colour.
    pub fill: &'static str,
}

impl NodeStyle {
    const fn new(shape: &'static str, color: &'static str, fill: &'static str) -> Self {
        Self { shape, color, fill }
    }

    /// Graphviz attribute list, without brackets.
    pub fn attributes(&self) -> String {
        format!(
            "shape={}, style=filled, color=\"{}\", fillcolor=\"{}\"",
            self.shape, self.color, self.fill
        )
    }
}

/// Node styles per kind plus cluster and edge colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Ports.
    pub port: NodeStyle,
    /// Signals.
    pub signal: NodeStyle,
    /// Parameters.
    pub parameter: NodeStyle,
    /// Literals.
    pub literal: NodeStyle,
    /// Expression operators.
    pub expression: NodeStyle,
    /// Array ports and array signals.
    pub array: NodeStyle,
    /// Outline of component clusters.
    pub component_color: &'static str,
    /// Outline of instance clusters.
    pub instance_color: &'static str,
    /// Edge colour.
    pub edge_color: &'static str,
}

impl Style {
    /// The default palette.
    pub fn normal() -> Self {
        Self {
            port: NodeStyle::new("box", "#4e79a7", "#d6e4f0"),
            signal: NodeStyle::new("box", "#59a14f", "#d9efd5"),
            parameter: NodeStyle::new("note", "#b07aa1", "#eedcea"),
            literal: NodeStyle::new("plaintext", "#79706e", "#ffffff"),
            expression: NodeStyle::new("circle", "#f28e2b", "#fde3c8"),
            array: NodeStyle::new("box3d", "#4e79a7", "#d6e4f0"),
            component_color: "#303030",
            instance_color: "#a0a0a0",
            edge_color: "#303030",
        }
    }

    /// Black outlines on white.
    pub fn plain() -> Self {
        let plain = |shape| NodeStyle::new(shape, "black", "white");
        Self {
            port: plain("box"),
            signal: plain("box"),
            parameter: plain("note"),
            literal: plain("plaintext"),
            expression: plain("circle"),
            array: plain("box3d"),
            component_color: "black",
            instance_color: "black",
            edge_color: "black",
        }
    }

    /// The style of nodes of `class`.
    pub fn node(&self, class: NodeClass) -> &NodeStyle {
        match class {
            NodeClass::Port => &self.port,
            NodeClass::Signal => &self.signal,
            NodeClass::Parameter => &self.parameter,
            NodeClass::Literal => &self.literal,
            NodeClass::Expression => &self.expression,
            NodeClass::ArrayPort | NodeClass::ArraySignal => &self.array,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::normal()
    }
}

/// What to include in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Append type names to node labels.
    pub types: bool,
    /// Draw parameters.
    pub parameters: bool,
    /// Draw literals.
    pub literals: bool,
    /// Draw expressions as operator trees.
    pub expressions: bool,
}

impl Config {
    /// Everything.
    pub fn all() -> Self {
        Self {
            types: true,
            parameters: true,
            literals: true,
            expressions: true,
        }
    }

    /// Ports and signals only.
    pub fn wires_only() -> Self {
        Self {
            types: false,
            parameters: false,
            literals: false,
            expressions: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_share_a_style() {
        let style = Style::normal();
        assert_eq!(style.node(NodeClass::ArrayPort), style.node(NodeClass::ArraySignal));
        assert_ne!(style.node(NodeClass::Port), style.node(NodeClass::Literal));
    }

    #[test]
    fn attributes_are_quoted() {
        let style = Style::plain();
        assert_eq!(
            style.port.attributes(),
            "shape=box, style=filled, color=\"black\", fillcolor=\"white\""
        );
    }
}
