//! Edge bookkeeping: single-driver wiring, connections and array growth.

use crate::edge::Edge;
use crate::error::GraphError;
use crate::graph::GraphKind;
use crate::ids::{EdgeId, NodeId, TypeId};
use crate::node::{ArraySide, LiteralValue, NodeKind, PortDir};
use crate::pool::Pool;

impl Pool {
    pub(crate) fn new_edge(&mut self, name: &str, src: Option<NodeId>, dst: Option<NodeId>) -> EdgeId {
        let name = self.intern(name);
        self.edges.alloc(Edge { name, src, dst })
    }

    /// Makes `node` the destination of `edge`.
    ///
    /// A normal node has a single driver: a previous input edge loses its
    /// destination but stays in its source's output list. Input-side arrays
    /// collect the edge as an element instead.
    pub fn add_input(&mut self, node: NodeId, edge: EdgeId) -> Result<(), GraphError> {
        let n = self.node(node);
        if !n.accepts_inputs() {
            return Err(GraphError::NoInputs {
                node: self.node_name(node).to_string(),
                class: n.class(),
            });
        }
        if let Some(other) = self.edge(edge).dst.filter(|d| *d != node) {
            return Err(GraphError::EdgeHasOtherDestination {
                edge: self.edge_name(edge).to_string(),
                node: self.node_name(node).to_string(),
                other: self.node_name(other).to_string(),
            });
        }
        self.edges[edge].dst = Some(node);

        let n = self.nodes.get_mut(node);
        if let Some(array) = n.array_mut().filter(|a| a.side == ArraySide::In) {
            push_unique(&mut array.elements, edge);
        } else if let Some(previous) = n.input.replace(edge) {
            if previous != edge {
                self.edges[previous].dst = None;
            }
        }
        Ok(())
    }

    /// Makes `node` the source of `edge`.
    pub fn add_output(&mut self, node: NodeId, edge: EdgeId) -> Result<(), GraphError> {
        if let Some(other) = self.edge(edge).src.filter(|s| *s != node) {
            return Err(GraphError::EdgeHasOtherSource {
                edge: self.edge_name(edge).to_string(),
                node: self.node_name(node).to_string(),
                other: self.node_name(other).to_string(),
            });
        }
        self.edges[edge].src = Some(node);

        let n = self.nodes.get_mut(node);
        match n.array_mut() {
            Some(array) if array.side == ArraySide::Out => push_unique(&mut array.elements, edge),
            _ => push_unique(&mut n.outputs, edge),
        }
        Ok(())
    }

    /// Detaches `edge` from `node`, clearing the corresponding end of the
    /// edge. Returns whether anything changed.
    pub fn remove_edge(&mut self, node: NodeId, edge: EdgeId) -> bool {
        let n = self.nodes.get_mut(node);
        let mut changed = false;
        if n.input == Some(edge) {
            n.input = None;
            changed = true;
        }
        let before = n.outputs.len();
        n.outputs.retain(|e| *e != edge);
        changed |= n.outputs.len() != before;
        if let Some(array) = n.array_mut() {
            let before = array.elements.len();
            array.elements.retain(|e| *e != edge);
            changed |= array.elements.len() != before;
            if array.size == Some(edge) {
                array.size = None;
                changed = true;
            }
        }
        if changed {
            let e = &mut self.edges[edge];
            if e.src == Some(node) {
                e.src = None;
            }
            if e.dst == Some(node) {
                e.dst = None;
            }
        }
        changed
    }

    /// Connects `src` to `dst` and returns the new edge, named `<src>_to_<dst>`.
    ///
    /// Connecting to or from an array node appends to the array.
    pub fn connect(&mut self, dst: NodeId, src: NodeId) -> Result<EdgeId, GraphError> {
        self.check_types(dst, src)?;
        self.check_directions(dst, src)?;

        let dst_side = self.node(dst).array().map(|a| a.side);
        let src_side = self.node(src).array().map(|a| a.side);
        match (dst_side, src_side) {
            (None, None) => {
                if !self.node(dst).accepts_inputs() {
                    return Err(GraphError::NoInputs {
                        node: self.node_name(dst).to_string(),
                        class: self.node(dst).class(),
                    });
                }
                let name = format!("{}_to_{}", self.node_name(src), self.node_name(dst));
                let edge = self.new_edge(&name, None, None);
                self.add_output(src, edge)?;
                self.add_input(dst, edge)?;
                Ok(edge)
            }
            (Some(ArraySide::In), None) => self.append(dst, src),
            (None, Some(ArraySide::Out)) => self.append(src, dst),
            (Some(ArraySide::In), Some(ArraySide::Out)) => {
                let name = format!("{}_to_{}", self.node_name(src), self.node_name(dst));
                let edge = self.new_edge(&name, None, None);
                self.add_output(src, edge)?;
                self.add_input(dst, edge)?;
                self.grow(src)?;
                self.grow(dst)?;
                Ok(edge)
            }
            (Some(ArraySide::Out), _) => Err(GraphError::ArraySideMismatch {
                array: self.node_name(dst).to_string(),
                side: "input",
            }),
            (_, Some(ArraySide::In)) => Err(GraphError::ArraySideMismatch {
                array: self.node_name(src).to_string(),
                side: "output",
            }),
        }
    }

    /// Whether values of type `src` can be wired to `dst`: identical, weakly
    /// equal or covered by an attached mapper.
    pub fn has_mapper(&self, src: TypeId, dst: TypeId) -> bool {
        src == dst
            || self.weakly_equal(src, dst)
            || self.ty(src).mappers().iter().any(|m| m.b() == dst)
            || self.ty(dst).mappers().iter().any(|m| m.b() == src)
    }

    fn check_types(&self, dst: NodeId, src: NodeId) -> Result<(), GraphError> {
        let (d, s) = (self.node(dst), self.node(src));
        if s.is_literal() || self.has_mapper(s.ty, d.ty) {
            return Ok(());
        }
        Err(GraphError::NoMapper {
            src: self.node_name(src).to_string(),
            src_ty: self.type_name(s.ty).to_string(),
            dst: self.node_name(dst).to_string(),
            dst_ty: self.type_name(d.ty).to_string(),
        })
    }

    fn check_directions(&self, dst: NodeId, src: NodeId) -> Result<(), GraphError> {
        let on_instance = |n: NodeId| {
            self.node(n)
                .parent
                .map(|g| matches!(self.graph(g).kind, GraphKind::Instance { .. }))
        };
        let illegal = |n: NodeId, reason: &'static str| GraphError::IllegalDirection {
            port: self.node_name(n).to_string(),
            graph: self.owner_name(n),
            reason,
        };
        match (self.node(dst).dir(), on_instance(dst)) {
            (Some(PortDir::Out), Some(true)) => {
                return Err(illegal(dst, "driving instance output port"))
            }
            (Some(PortDir::In), Some(false)) => {
                return Err(illegal(dst, "driving component input port"))
            }
            _ => {}
        }
        if let (Some(PortDir::In), Some(true)) = (self.node(src).dir(), on_instance(src)) {
            return Err(illegal(src, "reading instance input port"));
        }
        Ok(())
    }

    /// Appends `other` to `array` and grows the array size by one.
    ///
    /// Output-side arrays drive `other` through `<array>_to_<other>`;
    /// input-side arrays are driven through `<other>_to_<array>`. The new edge
    /// is the last element of the array.
    pub fn append(&mut self, array: NodeId, other: NodeId) -> Result<EdgeId, GraphError> {
        let side = self
            .node(array)
            .array()
            .map(|a| a.side)
            .ok_or_else(|| GraphError::NotArray {
                node: self.node_name(array).to_string(),
            })?;
        let (a, o) = (self.node_name(array), self.node_name(other));
        let edge = match side {
            ArraySide::Out => {
                let name = format!("{a}_to_{o}");
                let edge = self.new_edge(&name, None, None);
                self.add_input(other, edge)?;
                self.add_output(array, edge)?;
                edge
            }
            ArraySide::In => {
                let name = format!("{o}_to_{a}");
                let edge = self.new_edge(&name, None, None);
                self.add_output(other, edge)?;
                self.add_input(array, edge)?;
                edge
            }
        };
        self.grow(array)?;
        Ok(edge)
    }

    fn grow(&mut self, array: NodeId) -> Result<(), GraphError> {
        let size = self.array_size(array)?;
        let next = self.increment(size)?;
        self.set_size(array, next)?;
        Ok(())
    }

    /// Returns a node representing `node + 1`.
    ///
    /// Integer literals and expressions yield a new `+ 1` expression, left
    /// for [`Pool::minimize`] to fold. Parameters are incremented in place:
    /// their value (or nothing, meaning zero) is incremented and connected as
    /// the new input, and the parameter itself is returned.
    pub fn increment(&mut self, node: NodeId) -> Result<NodeId, GraphError> {
        match self.node(node).kind {
            NodeKind::Literal(LiteralValue::Int(_)) | NodeKind::Expression { .. } => {
                let one = self.intl(1);
                Ok(self.add(node, one))
            }
            NodeKind::Parameter { .. } => {
                let next = match self.parameter_value(node) {
                    Some(value) => self.increment(value)?,
                    None => self.intl(1),
                };
                if next != node {
                    self.drive(node, next)?;
                }
                Ok(node)
            }
            _ => Err(GraphError::CannotIncrement {
                node: self.node_name(node).to_string(),
                class: self.node(node).class(),
            }),
        }
    }

    pub(crate) fn drive(&mut self, dst: NodeId, src: NodeId) -> Result<EdgeId, GraphError> {
        let name = format!("{}_to_{}", self.node_name(src), self.node_name(dst));
        let edge = self.new_edge(&name, None, None);
        self.add_output(src, edge)?;
        self.add_input(dst, edge)?;
        Ok(edge)
    }

    /// Replaces the size of an array with `size`.
    pub fn set_size(&mut self, array: NodeId, size: NodeId) -> Result<EdgeId, GraphError> {
        let old = self
            .node(array)
            .array()
            .ok_or_else(|| GraphError::NotArray {
                node: self.node_name(array).to_string(),
            })?
            .size;
        if let Some(old) = old {
            if let Some(src) = self.edge(old).src {
                self.remove_edge(src, old);
            }
            self.remove_edge(array, old);
        }
        Ok(self.attach_size(array, size))
    }

    pub(crate) fn attach_size(&mut self, array: NodeId, size: NodeId) -> EdgeId {
        let name = format!("{}_size", self.node_name(array));
        let edge = self.new_edge(&name, Some(size), Some(array));
        self.nodes[size].outputs.push(edge);
        if let Some(info) = self.nodes[array].array_mut() {
            info.size = Some(edge);
        }
        edge
    }

    /// The node driving the size of an array.
    pub fn array_size(&self, array: NodeId) -> Result<NodeId, GraphError> {
        let info = self.node(array).array().ok_or_else(|| GraphError::NotArray {
            node: self.node_name(array).to_string(),
        })?;
        info.size
            .and_then(|e| self.edge(e).src)
            .ok_or_else(|| GraphError::NoArraySize {
                node: self.node_name(array).to_string(),
            })
    }

    /// The value of a parameter: its driver, else its default.
    pub fn parameter_value(&self, param: NodeId) -> Option<NodeId> {
        let node = self.node(param);
        let NodeKind::Parameter { default } = node.kind else {
            return None;
        };
        node.input.and_then(|e| self.edge(e).src).or(default)
    }

    /// Routes `edge` through `via`.
    ///
    /// The edge keeps its place at its source and now ends at `via`. A new
    /// edge from `via` takes its place at the old destination, so array
    /// element positions and sizes are unchanged on both sides. Returns the
    /// new edge.
    pub fn split_edge(&mut self, edge: EdgeId, via: NodeId) -> Result<EdgeId, GraphError> {
        let (Some(src), Some(dst)) = (self.edge(edge).src, self.edge(edge).dst) else {
            return Err(GraphError::DanglingEdge {
                edge: self.edge_name(edge).to_string(),
            });
        };
        let name = format!("{}_to_{}", self.node_name(via), self.node_name(dst));
        let tail = self.new_edge(&name, None, Some(dst));
        let n = self.nodes.get_mut(dst);
        if n.input == Some(edge) {
            n.input = Some(tail);
        }
        if let Some(array) = n.array_mut() {
            for e in array.elements.iter_mut().filter(|e| **e == edge) {
                *e = tail;
            }
        }
        self.add_output(via, tail)?;

        let name = format!("{}_to_{}", self.node_name(src), self.node_name(via));
        self.edges[edge].name = self.intern(&name);
        self.edges[edge].dst = None;
        self.add_input(via, edge)?;
        Ok(tail)
    }

    /// Makes `src` the source of `edge` in place of its current source.
    pub fn move_source(&mut self, edge: EdgeId, src: NodeId) -> Result<(), GraphError> {
        if let Some(old) = self.edge(edge).src {
            let n = self.nodes.get_mut(old);
            n.outputs.retain(|e| *e != edge);
            if let Some(array) = n.array_mut() {
                array.elements.retain(|e| *e != edge);
            }
            self.edges[edge].src = None;
        }
        if let Some(dst) = self.edge(edge).dst {
            let name = format!("{}_to_{}", self.node_name(src), self.node_name(dst));
            self.edges[edge].name = self.intern(&name);
        }
        self.add_output(src, edge)
    }

    /// Position of `edge` among the array elements of `node`.
    pub fn index_of(&self, edge: EdgeId, node: NodeId) -> Option<usize> {
        self.node(node)
            .array()
            .and_then(|a| a.elements.iter().position(|e| *e == edge))
    }

    /// The array elements `edge` belongs to on `node`, or just `edge`.
    pub fn siblings(&self, edge: EdgeId, node: NodeId) -> Vec<EdgeId> {
        match self.node(node).array() {
            Some(array) if array.elements.contains(&edge) => array.elements.clone(),
            _ => vec![edge],
        }
    }

    /// Number of [`siblings`](Self::siblings).
    pub fn num_siblings(&self, edge: EdgeId, node: NodeId) -> usize {
        self.siblings(edge, node).len()
    }
}

fn push_unique(list: &mut Vec<EdgeId>, edge: EdgeId) {
    if !list.contains(&edge) {
        list.push(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_names_edge() {
        let mut pool = Pool::new();
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let e = pool.connect(b, a).unwrap();
        assert_eq!(pool.edge_name(e), "a_to_b");
        assert_eq!(pool.edge(e).src, Some(a));
        assert_eq!(pool.edge(e).dst, Some(b));
        assert_eq!(pool.node(a).outputs, vec![e]);
        assert_eq!(pool.node(b).input, Some(e));
    }

    #[test]
    fn second_driver_detaches_first() {
        let mut pool = Pool::new();
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let c = pool.signal("c", pool.bit());
        let first = pool.connect(c, a).unwrap();
        let second = pool.connect(c, b).unwrap();
        assert_eq!(pool.node(c).input, Some(second));
        assert_eq!(pool.edge(first).dst, None);
        // the old edge stays with its source
        assert_eq!(pool.node(a).outputs, vec![first]);
    }

    #[test]
    fn literals_have_no_inputs() {
        let mut pool = Pool::new();
        let lit = pool.intl(3);
        let p = pool.parameter("P", pool.integer(), None);
        let err = pool.connect(lit, p).unwrap_err();
        assert!(matches!(err, GraphError::NoInputs { .. }));
    }

    #[test]
    fn edge_with_other_destination() {
        let mut pool = Pool::new();
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let e = pool.connect(b, a).unwrap();
        let c = pool.signal("c", pool.bit());
        assert!(matches!(
            pool.add_input(c, e),
            Err(GraphError::EdgeHasOtherDestination { .. })
        ));
        assert!(matches!(
            pool.add_output(c, e),
            Err(GraphError::EdgeHasOtherSource { .. })
        ));
    }

    #[test]
    fn incompatible_types_need_mapper() {
        let mut pool = Pool::new();
        let v = pool.vector_of(8);
        let a = pool.signal("a", v);
        let b = pool.signal("b", pool.bit());
        let err = pool.connect(b, a).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no type mapping from `a` of type `vec8` to `b` of type `bit`"
        );
    }

    #[test]
    fn weakly_equal_types_connect() {
        let mut pool = Pool::new();
        let v8 = pool.vector_of(8);
        let v4 = pool.vector_of(4);
        let a = pool.signal("a", v8);
        let b = pool.signal("b", v4);
        assert!(pool.connect(b, a).is_ok());
    }

    #[test]
    fn remove_edge_clears_ends() {
        let mut pool = Pool::new();
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let e = pool.connect(b, a).unwrap();
        assert!(pool.remove_edge(a, e));
        assert_eq!(pool.edge(e).src, None);
        assert!(pool.node(a).outputs.is_empty());
        assert!(pool.remove_edge(b, e));
        assert_eq!(pool.edge(e).dst, None);
        assert!(!pool.remove_edge(b, e));
    }

    #[test]
    fn append_grows_literal_size() {
        let mut pool = Pool::new();
        let zero = pool.intl(0);
        let arr = pool.array_signal("arr", pool.bit(), zero);
        for expected in 0..3 {
            let s = pool.signal(&format!("s{expected}"), pool.bit());
            let e = pool.append(arr, s).unwrap();
            assert_eq!(pool.index_of(e, arr), Some(expected));
            let size = pool.array_size(arr).unwrap();
            assert_eq!(pool.resolve_int(size), Some(expected as i64 + 1));
        }
        assert_eq!(pool.node(arr).array().unwrap().elements.len(), 3);
        // only the current size edge hangs off the array
        assert_eq!(pool.node(arr).inputs().len(), 4);
    }

    #[test]
    fn append_direction_follows_side() {
        let mut pool = Pool::new();
        let zero = pool.intl(0);
        let out = pool.array_port("out_arr", pool.bit(), zero, PortDir::Out);
        let inp = pool.array_port("in_arr", pool.bit(), zero, PortDir::In);
        let x = pool.signal("x", pool.bit());
        let y = pool.signal("y", pool.bit());
        let e1 = pool.append(out, x).unwrap();
        let e2 = pool.append(inp, y).unwrap();
        assert_eq!(pool.edge_name(e1), "out_arr_to_x");
        assert_eq!(pool.edge(e1).src, Some(out));
        assert_eq!(pool.edge_name(e2), "y_to_in_arr");
        assert_eq!(pool.edge(e2).dst, Some(inp));
    }

    #[test]
    fn append_grows_parameter_size() {
        let mut pool = Pool::new();
        let n = pool.parameter("N", pool.natural(), Some(LiteralValue::Int(0)));
        let arr = pool.array_signal("arr", pool.bit(), n);
        let s = pool.signal("s", pool.bit());
        pool.append(arr, s).unwrap();
        pool.append(arr, s).unwrap();
        assert_eq!(pool.array_size(arr).unwrap(), n);
        assert_eq!(pool.resolve_int(n), Some(2));
    }

    #[test]
    fn append_grows_expression_size() {
        let mut pool = Pool::new();
        let n = pool.parameter("N", pool.natural(), None);
        let two = pool.intl(2);
        let size = pool.mul(n, two);
        let arr = pool.array_signal("arr", pool.bit(), size);
        let s = pool.signal("s", pool.bit());
        pool.append(arr, s).unwrap();
        let now = pool.array_size(arr).unwrap();
        assert_eq!(pool.node_string(now), "N*2+1");
    }

    #[test]
    fn connect_to_array_appends() {
        let mut pool = Pool::new();
        let zero = pool.intl(0);
        let arr = pool.array_signal("arr", pool.bit(), zero);
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let e0 = pool.connect(arr, a).unwrap();
        let e1 = pool.connect(arr, b).unwrap();
        assert_eq!(pool.siblings(e1, arr), vec![e0, e1]);
        assert_eq!(pool.num_siblings(e0, arr), 2);
        assert_eq!(pool.num_siblings(e0, a), 1);
    }

    #[test]
    fn array_to_array_appends_both() {
        let mut pool = Pool::new();
        let zero = pool.intl(0);
        let src = pool.array_port("src", pool.bit(), zero, PortDir::Out);
        let dst = pool.array_signal("dst", pool.bit(), zero);
        pool.connect(dst, src).unwrap();
        let (s, d) = (pool.array_size(src).unwrap(), pool.array_size(dst).unwrap());
        assert_eq!(pool.resolve_int(s), Some(1));
        assert_eq!(pool.resolve_int(d), Some(1));
    }

    #[test]
    fn increment_rules() {
        let mut pool = Pool::new();
        let three = pool.intl(3);
        let four = pool.increment(three).unwrap();
        assert!(pool.node(four).is_expression());
        assert_eq!(pool.node_string(four), "3+1");
        assert_eq!(pool.resolve_int(four), Some(4));
        let folded = pool.minimize(four).unwrap();
        assert_eq!(pool.int_value(folded), Some(4));
        assert_eq!(pool.int_value(three), Some(3));

        let p = pool.parameter("P", pool.natural(), None);
        assert_eq!(pool.increment(p).unwrap(), p);
        assert_eq!(pool.resolve_int(p), Some(1));

        let sig = pool.signal("s", pool.bit());
        assert!(matches!(
            pool.increment(sig),
            Err(GraphError::CannotIncrement { .. })
        ));
    }

    #[test]
    fn set_size_replaces_edge() {
        let mut pool = Pool::new();
        let one = pool.intl(1);
        let five = pool.intl(5);
        let arr = pool.array_signal("arr", pool.bit(), one);
        let e = pool.set_size(arr, five).unwrap();
        assert_eq!(pool.edge_name(e), "arr_size");
        assert_eq!(pool.array_size(arr).unwrap(), five);
        assert!(pool
            .node(one)
            .outputs
            .iter()
            .all(|e| pool.edge(*e).dst != Some(arr)));
    }

    #[test]
    fn split_edge_keeps_array_position() {
        let mut pool = Pool::new();
        let size = pool.intl(0);
        let arr = pool.array_signal("arr", pool.bit(), size);
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let ea = pool.connect(arr, a).unwrap();
        let eb = pool.connect(arr, b).unwrap();
        let via = pool.signal("via", pool.bit());
        let tail = pool.split_edge(ea, via).unwrap();

        assert_eq!(pool.node(arr).array().unwrap().elements, vec![tail, eb]);
        assert_eq!(pool.resolve_int(pool.array_size(arr).unwrap()), Some(2));
        assert_eq!(pool.edge_name(ea), "a_to_via");
        assert_eq!(pool.edge_name(tail), "via_to_arr");
        assert_eq!(pool.node(via).input, Some(ea));
        assert_eq!(pool.node(via).outputs, vec![tail]);
        assert_eq!(pool.node(a).outputs, vec![ea]);
    }

    #[test]
    fn split_dangling_edge_fails() {
        let mut pool = Pool::new();
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let c = pool.signal("c", pool.bit());
        let first = pool.connect(c, a).unwrap();
        pool.connect(c, b).unwrap();
        let via = pool.signal("via", pool.bit());
        assert!(matches!(
            pool.split_edge(first, via),
            Err(GraphError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn move_source_renames() {
        let mut pool = Pool::new();
        let a = pool.signal("a", pool.bit());
        let b = pool.signal("b", pool.bit());
        let s = pool.signal("s", pool.bit());
        let e = pool.connect(b, a).unwrap();
        pool.move_source(e, s).unwrap();
        assert!(pool.node(a).outputs.is_empty());
        assert_eq!(pool.node(s).outputs, vec![e]);
        assert_eq!(pool.edge(e).src, Some(s));
        assert_eq!(pool.edge_name(e), "s_to_b");
    }

    #[test]
    fn parameter_value_prefers_driver() {
        let mut pool = Pool::new();
        let p = pool.parameter("W", pool.natural(), Some(LiteralValue::Int(8)));
        assert_eq!(pool.resolve_int(p), Some(8));
        let sixteen = pool.intl(16);
        pool.connect(p, sixteen).unwrap();
        assert_eq!(pool.parameter_value(p), Some(sixteen));
    }
}
