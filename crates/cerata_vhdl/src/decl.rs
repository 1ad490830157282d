//! Entity, component and signal declarations.

use crate::block::{Block, Line, MultiBlock};
use crate::error::VhdlError;
use crate::leaf::leaves;
use crate::types::{array_leaf_type, leaf_type, value_string};
use cerata_ir::{GraphId, NodeClass, NodeId, NodeKind, Pool};

/// What a graph interface is declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// `entity <name> is ... end entity;`
    Entity,
    /// `component <name> is ... end component;`
    Component,
}

impl DeclKind {
    fn keyword(self) -> &'static str {
        match self {
            DeclKind::Entity => "entity",
            DeclKind::Component => "component",
        }
    }
}

/// Declares the generics and ports of `graph`.
pub fn declare(
    pool: &mut Pool,
    graph: GraphId,
    kind: DeclKind,
    indent: usize,
) -> Result<MultiBlock, VhdlError> {
    let kw = kind.keyword();
    let mut out = MultiBlock::new(indent);
    out.line(indent, format!("{kw} {} is", pool.graph_name(graph)));

    let generics = generic_block(pool, graph, indent + 2)?;
    if !generics.is_empty() {
        out.line(indent + 1, "generic (");
        out.push(generics);
        out.line(indent + 1, ");");
    }
    let ports = port_block(pool, graph, indent + 2)?;
    if !ports.is_empty() {
        out.line(indent + 1, "port (");
        out.push(ports);
        out.line(indent + 1, ");");
    }
    out.line(indent, format!("end {kw};"));
    Ok(out)
}

fn generic_block(pool: &mut Pool, graph: GraphId, indent: usize) -> Result<Block, VhdlError> {
    let mut block = Block::new(indent);
    for param in pool.nodes_of(graph, NodeClass::Parameter) {
        let ty = leaf_type(pool, pool.node(param).ty)?;
        let mut line = Line::new([pool.node_name(param).to_string(), " : ".into(), ty]);
        if let NodeKind::Parameter { default: Some(default) } = pool.node(param).kind {
            let value = value_string(pool, default)?;
            line.push(format!(" := {value}"));
        }
        block.push(line);
    }
    block.separate(";");
    Ok(block)
}

fn port_block(pool: &mut Pool, graph: GraphId, indent: usize) -> Result<Block, VhdlError> {
    let mut block = Block::new(indent);
    for port in pool.ports(graph) {
        let Some(dir) = pool.node(port).dir() else {
            continue;
        };
        for leaf in leaves(pool, port) {
            let dir = if leaf.reverse { dir.reverse() } else { dir };
            let ty = wire_type(pool, port, leaf.ty)?;
            block.push(Line::new([
                leaf.name,
                " : ".into(),
                format!("{:<3}", dir.to_string()),
                format!(" {ty}"),
            ]));
        }
    }
    block.separate(";");
    Ok(block)
}

/// Declares every leaf of a signal as `signal <leaf> : <type>;`.
pub fn declare_signal(pool: &mut Pool, signal: NodeId, indent: usize) -> Result<Block, VhdlError> {
    let mut block = Block::new(indent);
    for leaf in leaves(pool, signal) {
        let ty = wire_type(pool, signal, leaf.ty)?;
        block.push(Line::new([
            "signal ".to_string(),
            leaf.name,
            " : ".into(),
            format!("{ty};"),
        ]));
    }
    Ok(block)
}

fn wire_type(pool: &mut Pool, node: NodeId, leaf: cerata_ir::TypeId) -> Result<String, VhdlError> {
    if pool.node(node).is_array() {
        let size = pool.array_size(node)?;
        Ok(array_leaf_type(pool, leaf, size)?)
    } else {
        Ok(leaf_type(pool, leaf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerata_ir::{LiteralValue, PortDir};

    fn example(pool: &mut Pool) -> GraphId {
        let comp = pool.component("acc");
        let w = pool.parameter("WIDTH", pool.natural(), Some(LiteralValue::Int(8)));
        pool.add_node(comp, w).unwrap();
        let d = pool.default_domain();
        let clk_ty = pool.clock("clk", d);
        let clk = pool.port("clk", clk_ty, PortDir::In);
        pool.add_node(comp, clk).unwrap();
        let data = pool.vector("data", w);
        let s = pool.stream("data_s", data, "data", 1).unwrap();
        let input = pool.port("input", s, PortDir::In);
        pool.add_node(comp, input).unwrap();
        comp
    }

    #[test]
    fn entity_declaration() {
        let mut pool = Pool::new();
        let comp = example(&mut pool);
        let text = declare(&mut pool, comp, DeclKind::Entity, 0).unwrap().to_string();
        assert_eq!(
            text,
            "entity acc is\n\
             \x20 generic (\n\
             \x20   WIDTH : natural := 8\n\
             \x20 );\n\
             \x20 port (\n\
             \x20   clk         : in  std_logic;\n\
             \x20   input_valid : in  std_logic;\n\
             \x20   input_ready : out std_logic;\n\
             \x20   input_data  : in  std_logic_vector(WIDTH-1 downto 0)\n\
             \x20 );\n\
             end entity;\n"
        );
    }

    #[test]
    fn component_declaration_is_indented() {
        let mut pool = Pool::new();
        let comp = example(&mut pool);
        let text = declare(&mut pool, comp, DeclKind::Component, 1).unwrap().to_string();
        assert!(text.starts_with("  component acc is\n    generic (\n"));
        assert!(text.ends_with("  end component;\n"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut pool = Pool::new();
        let comp = pool.component("empty");
        let text = declare(&mut pool, comp, DeclKind::Entity, 0).unwrap().to_string();
        assert_eq!(text, "entity empty is\nend entity;\n");
    }

    #[test]
    fn array_ports_are_widened() {
        let mut pool = Pool::new();
        let comp = pool.component("arb");
        let n = pool.parameter("N", pool.natural(), Some(LiteralValue::Int(0)));
        pool.add_node(comp, n).unwrap();
        let v = pool.vector_of(4);
        let arr = pool.array_port("req", v, n, PortDir::In);
        pool.add_node(comp, arr).unwrap();
        let text = declare(&mut pool, comp, DeclKind::Entity, 0).unwrap().to_string();
        assert!(text.contains("req : in  std_logic_vector(N*4-1 downto 0)"));
    }

    #[test]
    fn signal_declaration() {
        let mut pool = Pool::new();
        let rec = {
            let bit = pool.bit();
            let v = pool.vector_of(2);
            pool.record("r", &[("a", bit), ("bb", v)])
        };
        let s = pool.signal("sig", rec);
        let text = declare_signal(&mut pool, s, 1).unwrap().to_string();
        assert_eq!(
            text,
            "  signal sig_a  : std_logic;\n  signal sig_bb : std_logic_vector(2-1 downto 0);\n"
        );
    }
}
