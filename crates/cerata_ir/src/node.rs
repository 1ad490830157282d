//! Graph nodes: ports, signals, parameters, literals, expressions and arrays.

use crate::ids::{DomainId, EdgeId, GraphId, NodeId, TypeId};
use crate::tag::Tag;
use cerata_common::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDir {
    /// Driven from outside the component.
    In,
    /// Driven from inside the component.
    Out,
}

impl PortDir {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            PortDir::In => PortDir::Out,
            PortDir::Out => PortDir::In,
        }
    }
}

impl fmt::Display for PortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortDir::In => "in",
            PortDir::Out => "out",
        })
    }
}

/// The side of an array node that holds its element edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArraySide {
    /// Elements are inputs: many nodes drive the array.
    In,
    /// Elements are outputs: the array drives many nodes.
    Out,
}

impl From<PortDir> for ArraySide {
    fn from(dir: PortDir) -> Self {
        match dir {
            PortDir::In => ArraySide::In,
            PortDir::Out => ArraySide::Out,
        }
    }
}

/// Array bookkeeping shared by array ports and array signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInfo {
    /// Which side holds the elements.
    pub side: ArraySide,
    /// Edge from the size node.
    pub size: Option<EdgeId>,
    /// Element edges in append order.
    pub elements: Vec<EdgeId>,
}

/// Value of a literal node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralValue {
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
    /// Boolean literal.
    Bool(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::Str(s) => f.write_str(s),
            LiteralValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Binary operator of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Integer division.
    Div,
}

impl BinOp {
    /// Operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// `+` and `-`.
    pub fn is_additive(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub)
    }

    /// Applies the operator with overflow and division checks.
    pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            BinOp::Add => lhs.checked_add(rhs),
            BinOp::Sub => lhs.checked_sub(rhs),
            BinOp::Mul => lhs.checked_mul(rhs),
            BinOp::Div => lhs.checked_div(rhs),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The kind of a node and its kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A port of a component or instance.
    Port {
        /// Direction as seen from inside the component.
        dir: PortDir,
        /// Clock domain.
        domain: DomainId,
    },
    /// An internal signal of a component.
    Signal {
        /// Clock domain.
        domain: DomainId,
    },
    /// A generic parameter.
    Parameter {
        /// Default value, a literal node.
        default: Option<NodeId>,
    },
    /// A constant.
    Literal(LiteralValue),
    /// A binary integer expression over other nodes.
    Expression {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: NodeId,
        /// Right operand.
        rhs: NodeId,
    },
    /// A port holding a variable number of elements.
    ArrayPort {
        /// Direction as seen from inside the component.
        dir: PortDir,
        /// Clock domain.
        domain: DomainId,
        /// Elements and size.
        array: ArrayInfo,
    },
    /// A signal holding a variable number of elements.
    ArraySignal {
        /// Clock domain.
        domain: DomainId,
        /// Elements and size.
        array: ArrayInfo,
    },
}

/// Payload-less node kind, used for lookups and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    /// [`NodeKind::Port`].
    Port,
    /// [`NodeKind::Signal`].
    Signal,
    /// [`NodeKind::Parameter`].
    Parameter,
    /// [`NodeKind::Literal`].
    Literal,
    /// [`NodeKind::Expression`].
    Expression,
    /// [`NodeKind::ArrayPort`].
    ArrayPort,
    /// [`NodeKind::ArraySignal`].
    ArraySignal,
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeClass::Port => "port",
            NodeClass::Signal => "signal",
            NodeClass::Parameter => "parameter",
            NodeClass::Literal => "literal",
            NodeClass::Expression => "expression",
            NodeClass::ArrayPort => "array port",
            NodeClass::ArraySignal => "array signal",
        })
    }
}

/// A typed vertex of the hardware graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node name.
    pub name: Ident,
    /// Node type; for arrays, the element type.
    pub ty: TypeId,
    /// Kind and kind-specific data.
    pub kind: NodeKind,
    /// Owning component or instance.
    pub parent: Option<GraphId>,
    /// The single driving edge of a normal node, or of an output-side array.
    pub input: Option<EdgeId>,
    /// Driven edges of a normal node, or the single output of an input-side array.
    pub outputs: Vec<EdgeId>,
    /// Capability tags.
    pub tags: Vec<Tag>,
}

impl Node {
    pub(crate) fn new(name: Ident, ty: TypeId, kind: NodeKind) -> Self {
        Self {
            name,
            ty,
            kind,
            parent: None,
            input: None,
            outputs: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// The payload-less kind.
    pub fn class(&self) -> NodeClass {
        match self.kind {
            NodeKind::Port { .. } => NodeClass::Port,
            NodeKind::Signal { .. } => NodeClass::Signal,
            NodeKind::Parameter { .. } => NodeClass::Parameter,
            NodeKind::Literal(_) => NodeClass::Literal,
            NodeKind::Expression { .. } => NodeClass::Expression,
            NodeKind::ArrayPort { .. } => NodeClass::ArrayPort,
            NodeKind::ArraySignal { .. } => NodeClass::ArraySignal,
        }
    }

    /// Ports and array ports.
    pub fn is_port(&self) -> bool {
        matches!(self.kind, NodeKind::Port { .. } | NodeKind::ArrayPort { .. })
    }

    /// Signals and array signals.
    pub fn is_signal(&self) -> bool {
        matches!(self.kind, NodeKind::Signal { .. } | NodeKind::ArraySignal { .. })
    }

    /// Parameters.
    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, NodeKind::Parameter { .. })
    }

    /// Literals.
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal(_))
    }

    /// Expressions.
    pub fn is_expression(&self) -> bool {
        matches!(self.kind, NodeKind::Expression { .. })
    }

    /// Array ports and array signals.
    pub fn is_array(&self) -> bool {
        self.array().is_some()
    }

    /// Port direction, `None` for non-ports.
    pub fn dir(&self) -> Option<PortDir> {
        match self.kind {
            NodeKind::Port { dir, .. } | NodeKind::ArrayPort { dir, .. } => Some(dir),
            _ => None,
        }
    }

    /// Clock domain of ports and signals.
    pub fn domain(&self) -> Option<DomainId> {
        match self.kind {
            NodeKind::Port { domain, .. }
            | NodeKind::Signal { domain }
            | NodeKind::ArrayPort { domain, .. }
            | NodeKind::ArraySignal { domain, .. } => Some(domain),
            _ => None,
        }
    }

    /// Array bookkeeping of array nodes.
    pub fn array(&self) -> Option<&ArrayInfo> {
        match &self.kind {
            NodeKind::ArrayPort { array, .. } | NodeKind::ArraySignal { array, .. } => Some(array),
            _ => None,
        }
    }

    pub(crate) fn array_mut(&mut self) -> Option<&mut ArrayInfo> {
        match &mut self.kind {
            NodeKind::ArrayPort { array, .. } | NodeKind::ArraySignal { array, .. } => Some(array),
            _ => None,
        }
    }

    /// Literal value of literal nodes.
    pub fn literal(&self) -> Option<&LiteralValue> {
        match &self.kind {
            NodeKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Literals and expressions are never driven.
    pub fn accepts_inputs(&self) -> bool {
        !matches!(self.kind, NodeKind::Literal(_) | NodeKind::Expression { .. })
    }

    /// Whether the node carries `tag`.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Every edge driving this node, including the size edge of arrays.
    pub fn inputs(&self) -> Vec<EdgeId> {
        let mut out = Vec::new();
        match self.array() {
            Some(array) if array.side == ArraySide::In => out.extend(&array.elements),
            _ => out.extend(self.input),
        }
        if let Some(array) = self.array() {
            out.extend(array.size);
        }
        out
    }

    /// Every edge this node drives.
    pub fn outputs(&self) -> Vec<EdgeId> {
        match self.array() {
            Some(array) if array.side == ArraySide::Out => array.elements.clone(),
            _ => self.outputs.clone(),
        }
    }

    /// Inputs followed by outputs.
    pub fn edges(&self) -> Vec<EdgeId> {
        let mut out = self.inputs();
        out.extend(self.outputs());
        out
    }
}
