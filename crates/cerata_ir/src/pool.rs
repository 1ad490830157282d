//! The pool: the arena container of one design.
//!
//! A [`Pool`] owns every type, node, edge, graph and clock domain of a design
//! together with the interner their names live in. Objects reference each
//! other by id only. Cloning a pool yields an independent design in which all
//! ids remain valid; transformations clone, mutate the copy and return it.

use crate::arena::Arena;
use crate::edge::Edge;
use crate::error::GraphError;
use crate::flat::{self, FlatType};
use crate::graph::Graph;
use crate::ids::{DomainId, EdgeId, GraphId, NodeId, TypeId};
use crate::node::{ArrayInfo, ArraySide, BinOp, LiteralValue, Node, NodeKind, PortDir};
use crate::types::{RecordField, Type, TypeDb, TypeKind};
use cerata_common::{Ident, Interner};
use std::collections::HashMap;
use std::sync::Arc;

/// A named clock domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDomain {
    /// Domain name.
    pub name: Ident,
}

/// Owner of all objects of a design.
#[derive(Debug, Clone)]
pub struct Pool {
    interner: Arc<Interner>,
    pub(crate) types: TypeDb,
    pub(crate) nodes: Arena<NodeId, Node>,
    pub(crate) edges: Arena<EdgeId, Edge>,
    pub(crate) graphs: Arena<GraphId, Graph>,
    domains: Arena<DomainId, ClockDomain>,
    default_domain: DomainId,
    int_literals: HashMap<i64, NodeId>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Creates an empty pool with its own interner.
    pub fn new() -> Self {
        Self::with_interner(Arc::new(Interner::new()))
    }

    /// Creates an empty pool that shares `interner`.
    pub fn with_interner(interner: Arc<Interner>) -> Self {
        let types = TypeDb::new(&interner);
        let mut domains = Arena::new();
        let default_domain = domains.alloc(ClockDomain {
            name: interner.get_or_intern("default"),
        });
        Self {
            interner,
            types,
            nodes: Arena::new(),
            edges: Arena::new(),
            graphs: Arena::new(),
            domains,
            default_domain,
            int_literals: HashMap::new(),
        }
    }

    // ---- names ----

    /// The interner holding every name of this pool.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Interns a name.
    pub fn intern(&self, s: &str) -> Ident {
        self.interner.get_or_intern(s)
    }

    /// Resolves a name.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    // ---- access ----

    /// The type database.
    pub fn types(&self) -> &TypeDb {
        &self.types
    }

    /// Returns a type.
    pub fn ty(&self, id: TypeId) -> &Type {
        self.types.get(id)
    }

    /// Returns a node.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id)
    }

    /// Returns a node mutably.
    ///
    /// Wiring must go through the pool's connection methods; this is meant
    /// for tags and similar annotations.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(id)
    }

    /// Returns an edge.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        self.edges.get(id)
    }

    /// Returns a graph.
    pub fn graph(&self, id: GraphId) -> &Graph {
        self.graphs.get(id)
    }

    /// Iterates over all graphs in creation order.
    pub fn graphs(&self) -> impl Iterator<Item = (GraphId, &Graph)> {
        self.graphs.iter()
    }

    /// Iterates over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Name of a node.
    pub fn node_name(&self, id: NodeId) -> &str {
        self.resolve(self.node(id).name)
    }

    /// Name of an edge.
    pub fn edge_name(&self, id: EdgeId) -> &str {
        self.resolve(self.edge(id).name)
    }

    /// Name of a graph.
    pub fn graph_name(&self, id: GraphId) -> &str {
        self.resolve(self.graph(id).name)
    }

    /// Name of a type.
    pub fn type_name(&self, id: TypeId) -> &str {
        self.resolve(self.ty(id).name)
    }

    /// Name of a node's owner, or `<none>`.
    pub(crate) fn owner_name(&self, id: NodeId) -> String {
        match self.node(id).parent {
            Some(g) => self.graph_name(g).to_string(),
            None => "<none>".to_string(),
        }
    }

    // ---- clock domains ----

    /// The implicit `default` clock domain.
    pub fn default_domain(&self) -> DomainId {
        self.default_domain
    }

    /// Returns the domain named `name`, creating it if necessary.
    pub fn clock_domain(&mut self, name: &str) -> DomainId {
        let ident = self.intern(name);
        if let Some((id, _)) = self.domains.iter().find(|(_, d)| d.name == ident) {
            return id;
        }
        self.domains.alloc(ClockDomain { name: ident })
    }

    /// Returns the domain named `name` if it exists.
    pub fn find_domain(&self, name: &str) -> Option<DomainId> {
        let ident = self.interner.get(name)?;
        self.domains
            .iter()
            .find(|(_, d)| d.name == ident)
            .map(|(id, _)| id)
    }

    /// Name of a clock domain.
    pub fn domain_name(&self, id: DomainId) -> &str {
        self.resolve(self.domains.get(id).name)
    }

    // ---- types ----

    /// The built-in `bit`.
    pub fn bit(&self) -> TypeId {
        self.types.bit()
    }

    /// The built-in `integer`.
    pub fn integer(&self) -> TypeId {
        self.types.integer()
    }

    /// The built-in `natural`.
    pub fn natural(&self) -> TypeId {
        self.types.natural()
    }

    /// The built-in `string`.
    pub fn string(&self) -> TypeId {
        self.types.string()
    }

    /// The built-in `boolean`.
    pub fn boolean(&self) -> TypeId {
        self.types.boolean()
    }

    /// Adds a named type of any kind.
    pub fn add_type(&mut self, name: &str, kind: TypeKind) -> TypeId {
        let name = self.intern(name);
        self.types.add(name, kind)
    }

    /// The first type named `name`.
    pub fn find_type(&self, name: &str) -> Option<TypeId> {
        self.types.find(self.interner.get(name)?)
    }

    /// A clock in `domain`.
    pub fn clock(&mut self, name: &str, domain: DomainId) -> TypeId {
        self.add_type(name, TypeKind::Clock { domain })
    }

    /// A reset in `domain`.
    pub fn reset(&mut self, name: &str, domain: DomainId) -> TypeId {
        self.add_type(name, TypeKind::Reset { domain })
    }

    /// A vector whose width is the node `width`.
    pub fn vector(&mut self, name: &str, width: NodeId) -> TypeId {
        self.add_type(name, TypeKind::Vector { width: Some(width) })
    }

    /// A vector of literal width, named `vec<width>`.
    pub fn vector_of(&mut self, width: i64) -> TypeId {
        let w = self.intl(width);
        self.vector(&format!("vec{width}"), w)
    }

    /// A record with the given fields, none reversed.
    pub fn record(&mut self, name: &str, fields: &[(&str, TypeId)]) -> TypeId {
        let fields = fields
            .iter()
            .map(|(field, ty)| RecordField {
                name: self.intern(field),
                ty: *ty,
                reverse: false,
            })
            .collect();
        self.add_type(name, TypeKind::Record { fields })
    }

    /// Appends a field to a record.
    pub fn add_field(
        &mut self,
        record: TypeId,
        name: &str,
        ty: TypeId,
        reverse: bool,
    ) -> Result<(), GraphError> {
        let name = self.intern(name);
        let type_name = self.type_name(record).to_string();
        match &mut self.types.get_mut(record).kind {
            TypeKind::Record { fields } => {
                fields.push(RecordField { name, ty, reverse });
                Ok(())
            }
            _ => Err(GraphError::NotARecord { ty: type_name }),
        }
    }

    /// A stream of `element`.
    pub fn stream(
        &mut self,
        name: &str,
        element: TypeId,
        element_name: &str,
        epc: u32,
    ) -> Result<TypeId, GraphError> {
        if epc == 0 {
            return Err(GraphError::ZeroEpc {
                ty: name.to_string(),
            });
        }
        let element_name = self.intern(element_name);
        Ok(self.add_type(
            name,
            TypeKind::Stream {
                element,
                element_name,
                epc,
            },
        ))
    }

    /// Flattens a type.
    pub fn flatten(&self, ty: TypeId) -> Vec<FlatType> {
        flat::flatten(&self.types, ty)
    }

    /// Whether two types flatten to the same shape.
    pub fn weakly_equal(&self, a: TypeId, b: TypeId) -> bool {
        flat::weakly_equal(&self.types, a, b)
    }

    /// Width of a single-level type: 1 for clocks, resets and bits, the
    /// width node for vectors.
    pub fn width(&mut self, ty: TypeId) -> Result<NodeId, GraphError> {
        match self.ty(ty).kind {
            TypeKind::Clock { .. } | TypeKind::Reset { .. } | TypeKind::Bit => {}
            TypeKind::Vector { width: Some(w) } => return Ok(w),
            ref kind => {
                return Err(GraphError::NoWidth {
                    ty: self.type_name(ty).to_string(),
                    tag: kind.tag(),
                })
            }
        }
        Ok(self.intl(1))
    }

    /// Total width of the concrete leaves of a type, minimized.
    pub fn flat_width(&mut self, ty: TypeId) -> Result<NodeId, GraphError> {
        let leaves: Vec<TypeId> = self
            .flatten(ty)
            .into_iter()
            .map(|f| f.ty)
            .filter(|t| !self.types.is_nested(*t))
            .collect();
        let mut total = self.intl(0);
        for leaf in leaves {
            let w = self.width(leaf)?;
            total = self.add(total, w);
        }
        self.minimize(total)
    }

    // ---- nodes ----

    pub(crate) fn alloc_node(&mut self, name: &str, ty: TypeId, kind: NodeKind) -> NodeId {
        let name = self.intern(name);
        self.nodes.alloc(Node::new(name, ty, kind))
    }

    /// A port in the default clock domain.
    pub fn port(&mut self, name: &str, ty: TypeId, dir: PortDir) -> NodeId {
        let domain = self.default_domain;
        self.port_in_domain(name, ty, dir, domain)
    }

    /// A port in `domain`.
    pub fn port_in_domain(
        &mut self,
        name: &str,
        ty: TypeId,
        dir: PortDir,
        domain: DomainId,
    ) -> NodeId {
        self.alloc_node(name, ty, NodeKind::Port { dir, domain })
    }

    /// A port named after its type.
    pub fn port_of_type(&mut self, ty: TypeId, dir: PortDir) -> NodeId {
        let name = self.type_name(ty).to_string();
        self.port(&name, ty, dir)
    }

    /// A signal in the default clock domain.
    pub fn signal(&mut self, name: &str, ty: TypeId) -> NodeId {
        let domain = self.default_domain;
        self.signal_in_domain(name, ty, domain)
    }

    /// A signal in `domain`.
    pub fn signal_in_domain(&mut self, name: &str, ty: TypeId, domain: DomainId) -> NodeId {
        self.alloc_node(name, ty, NodeKind::Signal { domain })
    }

    /// A signal named `<type>_signal`.
    pub fn signal_of_type(&mut self, ty: TypeId) -> NodeId {
        let name = format!("{}_signal", self.type_name(ty));
        self.signal(&name, ty)
    }

    /// A parameter with an optional default value.
    pub fn parameter(&mut self, name: &str, ty: TypeId, default: Option<LiteralValue>) -> NodeId {
        let default = default.map(|v| self.literal(v));
        self.alloc_node(name, ty, NodeKind::Parameter { default })
    }

    /// A literal node. Integer literals are shared per value.
    pub fn literal(&mut self, value: LiteralValue) -> NodeId {
        match value {
            LiteralValue::Int(v) => self.intl(v),
            LiteralValue::Str(s) => self.strl(&s),
            LiteralValue::Bool(b) => self.booll(b),
        }
    }

    /// The integer literal `v`.
    pub fn intl(&mut self, v: i64) -> NodeId {
        if let Some(id) = self.int_literals.get(&v) {
            return *id;
        }
        let ty = self.types.integer();
        let id = self.alloc_node(&v.to_string(), ty, NodeKind::Literal(LiteralValue::Int(v)));
        self.int_literals.insert(v, id);
        id
    }

    /// A string literal.
    pub fn strl(&mut self, s: &str) -> NodeId {
        let ty = self.types.string();
        self.alloc_node(s, ty, NodeKind::Literal(LiteralValue::Str(s.to_string())))
    }

    /// A boolean literal.
    pub fn booll(&mut self, b: bool) -> NodeId {
        let ty = self.types.boolean();
        self.alloc_node(&b.to_string(), ty, NodeKind::Literal(LiteralValue::Bool(b)))
    }

    /// `true`.
    pub fn bool_true(&mut self) -> NodeId {
        self.booll(true)
    }

    /// `false`.
    pub fn bool_false(&mut self) -> NodeId {
        self.booll(false)
    }

    /// A binary expression node.
    pub fn expression(&mut self, op: BinOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let ty = self.types.integer();
        self.alloc_node(op.symbol(), ty, NodeKind::Expression { op, lhs, rhs })
    }

    /// `lhs + rhs`.
    pub fn add(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expression(BinOp::Add, lhs, rhs)
    }

    /// `lhs - rhs`.
    pub fn sub(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expression(BinOp::Sub, lhs, rhs)
    }

    /// `lhs * rhs`.
    pub fn mul(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expression(BinOp::Mul, lhs, rhs)
    }

    /// `lhs / rhs`.
    pub fn div(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expression(BinOp::Div, lhs, rhs)
    }

    /// An array port of `ty` elements with initial size `size`.
    ///
    /// An input array port takes its elements on the input side.
    pub fn array_port(&mut self, name: &str, ty: TypeId, size: NodeId, dir: PortDir) -> NodeId {
        let domain = self.default_domain;
        self.array_port_in_domain(name, ty, size, dir, domain)
    }

    /// An array port in `domain`.
    pub fn array_port_in_domain(
        &mut self,
        name: &str,
        ty: TypeId,
        size: NodeId,
        dir: PortDir,
        domain: DomainId,
    ) -> NodeId {
        let array = ArrayInfo {
            side: ArraySide::from(dir),
            size: None,
            elements: Vec::new(),
        };
        let id = self.alloc_node(name, ty, NodeKind::ArrayPort { dir, domain, array });
        self.attach_size(id, size);
        id
    }

    /// An array signal of `ty` elements with initial size `size`.
    ///
    /// Array signals collect their elements from the nodes driving them.
    pub fn array_signal(&mut self, name: &str, ty: TypeId, size: NodeId) -> NodeId {
        let domain = self.default_domain;
        let array = ArrayInfo {
            side: ArraySide::In,
            size: None,
            elements: Vec::new(),
        };
        let id = self.alloc_node(name, ty, NodeKind::ArraySignal { domain, array });
        self.attach_size(id, size);
        id
    }
}
