//! Architecture bodies.

use crate::block::{Block, Line, MultiBlock};
use crate::decl::{declare, declare_signal, DeclKind};
use crate::error::VhdlError;
use crate::inst::{instantiate, leaf_pairs, wire_edges};
use cerata_ir::{GraphId, NodeId, Pool};

/// Emits `architecture Implementation of <comp> is ... end architecture;`.
///
/// Component declarations cover every distinct non-primitive component
/// instantiated by `comp`. Concurrent assignments cover the edges between
/// nodes owned by `comp` and literals driving them.
pub fn architecture(pool: &mut Pool, comp: GraphId) -> Result<MultiBlock, VhdlError> {
    let mut out = MultiBlock::new(0);
    out.line(
        0,
        format!("architecture Implementation of {} is", pool.graph_name(comp)),
    );

    for child in pool.instantiated_components(comp) {
        if pool.graph(child).primitive().is_some() {
            continue;
        }
        out.extend(declare(pool, child, DeclKind::Component, 1)?);
        out.blank();
    }

    let mut signals = Block::new(1);
    for signal in pool.signals(comp) {
        signals.extend(declare_signal(pool, signal, 1)?);
    }
    if !signals.is_empty() {
        out.push(signals);
        out.blank();
    }

    out.line(0, "begin");
    for inst in pool.instances(comp) {
        out.extend(instantiate(pool, inst, 1)?);
        out.blank();
    }

    let assignments = assignments(pool, comp)?;
    if !assignments.is_empty() {
        out.push(assignments);
        out.blank();
    }
    out.line(0, "end architecture;");
    Ok(out)
}

fn assignments(pool: &mut Pool, comp: GraphId) -> Result<Block, VhdlError> {
    let mut block = Block::new(1);
    let owned: Vec<NodeId> = pool.graph(comp).nodes.clone();
    for node in owned {
        let n = pool.node(node);
        if !(n.is_port() || n.is_signal()) {
            continue;
        }
        let inputs = n.inputs();
        for edge in wire_edges(pool, node) {
            if !inputs.contains(&edge) {
                continue;
            }
            let Some(src) = pool.edge(edge).src else {
                continue;
            };
            let s = pool.node(src);
            let local = s.parent == Some(comp) && (s.is_port() || s.is_signal());
            if !(local || s.is_literal()) {
                continue;
            }
            for pair in leaf_pairs(pool, node, edge)? {
                let (dst, src) = if pair.reverse {
                    (pair.far, pair.near)
                } else {
                    (pair.near, pair.far)
                };
                block.push(Line::new([dst, " <= ".into(), format!("{src};")]));
            }
        }
    }
    Ok(block)
}
