//! Flattened views of nodes as named VHDL leaves.

use cerata_ir::{NodeId, Pool, TypeId};

/// A non-nested entry of a node's flattened type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Leaf {
    /// Position in the flattened type.
    pub index: usize,
    /// `<node>_<field>_...`.
    pub name: String,
    pub ty: TypeId,
    pub reverse: bool,
}

/// The leaves of `node` in flattening order.
pub(crate) fn leaves(pool: &Pool, node: NodeId) -> Vec<Leaf> {
    let root = pool.node_name(node);
    pool.flatten(pool.node(node).ty)
        .into_iter()
        .enumerate()
        .filter(|(_, f)| !pool.types().is_nested(f.ty))
        .map(|(index, f)| Leaf {
            index,
            name: f.name(pool.interner(), root, "_"),
            ty: f.ty,
            reverse: f.reverse,
        })
        .collect()
}

/// Flat names of every entry of `node`'s type, leaves or not.
pub(crate) fn flat_names(pool: &Pool, node: NodeId) -> Vec<String> {
    let root = pool.node_name(node);
    pool.flatten(pool.node(node).ty)
        .iter()
        .map(|f| f.name(pool.interner(), root, "_"))
        .collect()
}
