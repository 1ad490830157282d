//! Instantiations and the leaf-level wiring shared with architectures.
//!
//! A connection between two nodes is lowered leaf by leaf. The mapper from
//! the near node's type to the far node's type decides which leaves meet.
//! When one leaf meets several, it is sliced by the running sum of the
//! widths already assigned. Array nodes are indexed by the position of the
//! edge among their elements.

use crate::block::{Block, Line, MultiBlock};
use crate::error::VhdlError;
use crate::leaf::{flat_names, leaves};
use crate::types::{is_single_bit, literal_for, value_string};
use cerata_ir::{EdgeId, GraphError, GraphId, NodeClass, NodeId, Pool, TypeId};

/// One leaf-level association of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LeafPair {
    /// Leaf on the near node.
    pub near: String,
    /// Leaf on the far node, or a literal.
    pub far: String,
    /// The near leaf flows against the near node's direction.
    pub reverse: bool,
}

/// Edges of `node` that carry data and are connected on both ends.
pub(crate) fn wire_edges(pool: &Pool, node: NodeId) -> Vec<EdgeId> {
    let n = pool.node(node);
    let size = n.array().and_then(|a| a.size);
    n.edges()
        .into_iter()
        .filter(|e| Some(*e) != size && pool.edge(*e).is_complete())
        .collect()
}

/// Lowers the connection `edge` as seen from `node`.
pub(crate) fn leaf_pairs(
    pool: &mut Pool,
    node: NodeId,
    edge: EdgeId,
) -> Result<Vec<LeafPair>, VhdlError> {
    let other = pool
        .edge(edge)
        .other_end(node)
        .ok_or_else(|| GraphError::DanglingEdge {
            edge: pool.edge_name(edge).to_string(),
        })?;
    let near_index = element_index(pool, node, edge);
    let mut out = Vec::new();

    if pool.node(other).is_literal() {
        for leaf in leaves(pool, node) {
            let near = select(pool, &leaf.name, leaf.ty, near_index, None)?;
            let far = literal_for(pool, other, leaf.ty)?;
            out.push(LeafPair {
                near,
                far,
                reverse: leaf.reverse,
            });
        }
        return Ok(out);
    }

    let far_index = element_index(pool, other, edge);
    let mapper = pool.get_mapper(pool.node(node).ty, pool.node(other).ty)?;
    let (near_flat, far_flat) = (mapper.flat_a().to_vec(), mapper.flat_b().to_vec());
    let near_names = flat_names(pool, node);
    let far_names = flat_names(pool, other);

    for (i, a) in near_flat.iter().enumerate() {
        if pool.types().is_nested(a.ty) {
            continue;
        }
        let targets = mapper.mapping_of(i);
        if targets.is_empty() {
            return Err(VhdlError::UnmappedLeaf {
                leaf: near_names[i].clone(),
                ty: pool.type_name(pool.node(node).ty).to_string(),
            });
        }
        let mut offset = pool.intl(0);
        for &j in &targets {
            let b = &far_flat[j];
            let near_slice = if targets.len() > 1 {
                let width = pool.width(b.ty)?;
                let slice = (offset, width);
                offset = pool.add(offset, width);
                Some(slice)
            } else {
                None
            };
            let sources = mapper.sources_of(j);
            let far_slice = if sources.len() > 1 {
                let mut before = pool.intl(0);
                for &s in sources.iter().take_while(|s| **s != i) {
                    let w = pool.width(near_flat[s].ty)?;
                    before = pool.add(before, w);
                }
                Some((before, pool.width(a.ty)?))
            } else {
                None
            };
            let near = select(pool, &near_names[i], a.ty, near_index, near_slice)?;
            let far = select(pool, &far_names[j], b.ty, far_index, far_slice)?;
            out.push(LeafPair {
                near,
                far,
                reverse: a.reverse,
            });
        }
    }
    Ok(out)
}

fn element_index(pool: &Pool, node: NodeId, edge: EdgeId) -> Option<usize> {
    pool.node(node)
        .is_array()
        .then(|| pool.index_of(edge, node))
        .flatten()
}

/// Spells a leaf, optionally as array element `index` and optionally
/// restricted to `slice = (offset, width)` within that element.
fn select(
    pool: &mut Pool,
    name: &str,
    ty: TypeId,
    index: Option<usize>,
    slice: Option<(NodeId, NodeId)>,
) -> Result<String, VhdlError> {
    match (index, slice) {
        (None, None) => Ok(name.to_string()),
        (Some(idx), None) if is_single_bit(pool, ty) => Ok(format!("{name}({idx})")),
        (index, slice) => {
            let base = match index {
                Some(idx) => {
                    let leaf_width = pool.width(ty)?;
                    let idx = pool.intl(idx as i64);
                    pool.mul(idx, leaf_width)
                }
                None => pool.intl(0),
            };
            let (offset, width) = match slice {
                Some(s) => s,
                None => (pool.intl(0), pool.width(ty)?),
            };
            let lo = pool.add(base, offset);
            let top = pool.add(lo, width);
            let one = pool.intl(1);
            let hi = pool.sub(top, one);
            let hi = pool.minimized_string(hi)?;
            let lo = pool.minimized_string(lo)?;
            Ok(format!("{name}({hi} downto {lo})"))
        }
    }
}

/// Instantiates `inst` with its generic map and port map.
pub fn instantiate(pool: &mut Pool, inst: GraphId, indent: usize) -> Result<MultiBlock, VhdlError> {
    let component = pool
        .graph(inst)
        .component()
        .ok_or_else(|| GraphError::NotAComponent {
            graph: pool.graph_name(inst).to_string(),
        })?;
    let mut out = MultiBlock::new(indent);
    out.line(
        indent,
        format!("{} : {}", pool.graph_name(inst), pool.graph_name(component)),
    );

    let mut generics = Block::new(indent + 2);
    for param in pool.nodes_of(inst, NodeClass::Parameter) {
        if let Some(value) = pool.parameter_value(param) {
            let value = value_string(pool, value)?;
            generics.push(Line::new([
                pool.node_name(param).to_string(),
                " => ".into(),
                value,
            ]));
        }
    }
    generics.separate(",");

    let mut ports = Block::new(indent + 2);
    for port in pool.ports(inst) {
        for edge in wire_edges(pool, port) {
            for pair in leaf_pairs(pool, port, edge)? {
                ports.push(Line::new([pair.near, " => ".into(), pair.far]));
            }
        }
    }
    ports.separate(",");

    if !generics.is_empty() {
        out.line(indent + 1, "generic map (");
        out.push(generics);
        out.line(indent + 1, ")");
    }
    if !ports.is_empty() {
        out.line(indent + 1, "port map (");
        out.push(ports);
        out.line(indent + 1, ")");
    }
    out.close(";");
    Ok(out)
}
