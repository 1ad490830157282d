//! Graph rewrites that make a component expressible in VHDL.
//!
//! Both passes leave their input alone and return a rewritten copy.

use crate::error::VhdlError;
use cerata_ir::{EdgeId, GraphId, NodeId, Pool, PortDir, TypeKind};

/// Routes every connection that leaves an instance port through a signal of
/// `comp` when it reaches another instance port or fans out.
///
/// A plain port gets one signal `<instance>_<port>` driving all former
/// destinations. An array port gets one signal per element,
/// `<instance>_<port>_<index>`. A name already used in `comp` gets the first
/// free `_<n>` suffix.
pub fn resolve_port_to_port(pool: &Pool, comp: GraphId) -> Result<Pool, VhdlError> {
    log::debug!(
        "VHDL: resolving port-to-port connections of `{}`",
        pool.graph_name(comp)
    );
    let mut out = pool.clone();
    for inst in out.instances(comp) {
        let inst_name = out.graph_name(inst).to_string();
        for port in out.ports(inst) {
            let edges: Vec<EdgeId> = out
                .node(port)
                .outputs()
                .into_iter()
                .filter(|e| out.edge(*e).dst.is_some())
                .collect();
            let reaches_instance = |pool: &Pool, e: EdgeId| {
                pool.edge(e)
                    .dst
                    .and_then(|d| pool.node(d).parent)
                    .is_some_and(|g| pool.graph(g).is_instance())
            };
            let (ty, domain) = {
                let n = out.node(port);
                (n.ty, n.domain().unwrap_or(out.default_domain()))
            };
            let port_name = out.node_name(port).to_string();

            if out.node(port).is_array() {
                for e in edges {
                    if !reaches_instance(&out, e) {
                        continue;
                    }
                    let idx = out.index_of(e, port).unwrap_or(0);
                    let name = free_name(&out, comp, &format!("{inst_name}_{port_name}_{idx}"));
                    let sig = out.signal_in_domain(&name, ty, domain);
                    out.add_node(comp, sig)?;
                    out.split_edge(e, sig)?;
                    log::trace!("inserted `{name}`");
                }
                continue;
            }

            let fans_out = edges.len() > 1;
            if !fans_out && !edges.iter().any(|e| reaches_instance(&out, *e)) {
                continue;
            }
            let Some((first, rest)) = edges.split_first() else {
                continue;
            };
            let name = free_name(&out, comp, &format!("{inst_name}_{port_name}"));
            let sig = out.signal_in_domain(&name, ty, domain);
            out.add_node(comp, sig)?;
            out.split_edge(*first, sig)?;
            for e in rest {
                out.move_source(*e, sig)?;
            }
            log::trace!("inserted `{name}`");
        }
    }
    Ok(out)
}

fn free_name(pool: &Pool, comp: GraphId, base: &str) -> String {
    let taken = |name: &str| {
        pool.graph(comp).nodes.iter().any(|n| pool.node_name(*n) == name)
            || pool.instances(comp).iter().any(|g| pool.graph_name(*g) == name)
    };
    let mut name = base.to_string();
    let mut n = 0;
    while taken(&name) {
        n += 1;
        name = format!("{base}_{n}");
    }
    name
}

/// Drives every undriven clock and reset input of the instances in `comp`
/// from a port or signal of `comp` with the same kind and domain.
pub fn resolve_clock_domains(pool: &Pool, comp: GraphId) -> Result<Pool, VhdlError> {
    log::debug!(
        "VHDL: resolving clock domains of `{}`",
        pool.graph_name(comp)
    );
    let mut out = pool.clone();
    let candidates: Vec<NodeId> = out
        .graph(comp)
        .nodes
        .iter()
        .copied()
        .filter(|n| {
            let node = out.node(*n);
            (node.is_port() || node.is_signal()) && !node.is_array()
        })
        .collect();

    for inst in out.instances(comp) {
        for port in out.ports(inst) {
            let n = out.node(port);
            if n.input.is_some() || n.is_array() || n.dir() != Some(PortDir::In) {
                continue;
            }
            let Some((kind, domain)) = clock_kind(&out.ty(n.ty).kind) else {
                continue;
            };
            let source = candidates
                .iter()
                .copied()
                .find(|c| clock_kind(&out.ty(out.node(*c).ty).kind) == Some((kind, domain)));
            match source {
                Some(src) => {
                    out.connect(port, src)?;
                }
                None => {
                    return Err(VhdlError::MissingClockDomain {
                        kind,
                        domain: out.domain_name(domain).to_string(),
                        component: out.graph_name(comp).to_string(),
                        instance: out.graph_name(inst).to_string(),
                        port: out.node_name(port).to_string(),
                    })
                }
            }
        }
    }
    Ok(out)
}

fn clock_kind(kind: &TypeKind) -> Option<(&'static str, cerata_ir::DomainId)> {
    match kind {
        TypeKind::Clock { domain } => Some(("clock", *domain)),
        TypeKind::Reset { domain } => Some(("reset", *domain)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerata_ir::NodeClass;

    fn pair(pool: &mut Pool) -> (GraphId, GraphId, GraphId) {
        let v = pool.vector_of(4);
        let x = pool.component("x");
        let o = pool.port("o", v, PortDir::Out);
        pool.add_node(x, o).unwrap();
        let y = pool.component("y");
        let i = pool.port("i", v, PortDir::In);
        pool.add_node(y, i).unwrap();
        let top = pool.component("top");
        let xi = pool.instantiate(top, x, None).unwrap();
        let yi = pool.instantiate(top, y, None).unwrap();
        (top, xi, yi)
    }

    #[test]
    fn inserts_signal_between_instances() {
        let mut pool = Pool::new();
        let (top, xi, yi) = pair(&mut pool);
        let o = pool.port_of(xi, "o").unwrap();
        let i = pool.port_of(yi, "i").unwrap();
        pool.connect(i, o).unwrap();

        let out = resolve_port_to_port(&pool, top).unwrap();
        // the input is untouched
        assert_eq!(pool.count_nodes(top, NodeClass::Signal), 0);

        let sig = out.wire_of(top, "x_inst_o").unwrap();
        assert_eq!(out.node(sig).ty, out.node(o).ty);
        let into_sig = out.node(sig).input.unwrap();
        assert_eq!(out.edge(into_sig).src, Some(o));
        let into_i = out.node(i).input.unwrap();
        assert_eq!(out.edge(into_i).src, Some(sig));
        for port in [o, i] {
            for e in out.node(port).edges() {
                let other = out.edge(e).other_end(port).unwrap();
                assert!(!out.graph(out.node(other).parent.unwrap()).is_instance());
            }
        }
    }

    #[test]
    fn one_signal_for_fan_out() {
        let mut pool = Pool::new();
        let (top, xi, yi) = pair(&mut pool);
        let y = pool.find_component("y").unwrap();
        let yi2 = pool.instantiate(top, y, Some("y2")).unwrap();
        let o = pool.port_of(xi, "o").unwrap();
        for inst in [yi, yi2] {
            let i = pool.port_of(inst, "i").unwrap();
            pool.connect(i, o).unwrap();
        }
        let out = resolve_port_to_port(&pool, top).unwrap();
        assert_eq!(out.count_nodes(top, NodeClass::Signal), 1);
        let sig = out.wire_of(top, "x_inst_o").unwrap();
        assert_eq!(out.node(sig).outputs.len(), 2);
        assert_eq!(out.node(o).outputs.len(), 1);
    }

    #[test]
    fn inserted_signal_takes_a_free_name() {
        let mut pool = Pool::new();
        let (top, xi, yi) = pair(&mut pool);
        let v = pool.vector_of(4);
        let user = pool.signal("x_inst_o", v);
        pool.add_node(top, user).unwrap();
        let o = pool.port_of(xi, "o").unwrap();
        let i = pool.port_of(yi, "i").unwrap();
        pool.connect(i, o).unwrap();

        let out = resolve_port_to_port(&pool, top).unwrap();
        assert_eq!(out.count_nodes(top, NodeClass::Signal), 2);
        assert_eq!(out.wire_of(top, "x_inst_o").unwrap(), user);
        assert!(out.node(user).input.is_none());
        let sig = out.wire_of(top, "x_inst_o_1").unwrap();
        let into_i = out.node(i).input.unwrap();
        assert_eq!(out.edge(into_i).src, Some(sig));
    }

    #[test]
    fn array_port_gets_one_signal_per_element() {
        let mut pool = Pool::new();
        let v8 = pool.vector_of(8);
        let s = pool.stream("s", v8, "data", 1).unwrap();
        let zero = pool.intl(0);
        let split = pool.component("split");
        let arr = pool.array_port("o", s, zero, PortDir::Out);
        pool.add_node(split, arr).unwrap();
        let sink = pool.component("sink");
        let i = pool.port("i", s, PortDir::In);
        pool.add_node(sink, i).unwrap();

        let top = pool.component("top");
        let si = pool.instantiate(top, split, None).unwrap();
        let o = pool.port_of(si, "o").unwrap();
        let mut inputs = Vec::new();
        for name in ["k0", "k1"] {
            let inst = pool.instantiate(top, sink, Some(name)).unwrap();
            let i = pool.port_of(inst, "i").unwrap();
            pool.connect(i, o).unwrap();
            inputs.push(i);
        }

        let mut out = resolve_port_to_port(&pool, top).unwrap();
        assert_eq!(out.count_nodes(top, NodeClass::Signal), 2);
        for (idx, i) in inputs.iter().enumerate() {
            let sig = out.wire_of(top, &format!("split_inst_o_{idx}")).unwrap();
            assert_eq!(out.node(sig).ty, s);
            let into_i = out.node(*i).input.unwrap();
            assert_eq!(out.edge(into_i).src, Some(sig));
            let into_sig = out.node(sig).input.unwrap();
            assert_eq!(out.edge(into_sig).src, Some(o));
            assert_eq!(out.index_of(into_sig, o), Some(idx));
        }

        let text = crate::inst::instantiate(&mut out, si, 0).unwrap().to_string();
        assert!(text.contains("o_valid(1)          => split_inst_o_1_valid"), "{text}");
        assert!(text.contains("o_data(7 downto 0)  => split_inst_o_0_data"), "{text}");
        assert!(text.contains("o_data(15 downto 8) => split_inst_o_1_data"), "{text}");
    }

    #[test]
    fn component_level_connections_stay() {
        let mut pool = Pool::new();
        let (top, xi, _) = pair(&mut pool);
        let v = pool.vector_of(4);
        let s = pool.signal("s", v);
        pool.add_node(top, s).unwrap();
        let o = pool.port_of(xi, "o").unwrap();
        pool.connect(s, o).unwrap();
        let out = resolve_port_to_port(&pool, top).unwrap();
        assert_eq!(out.count_nodes(top, NodeClass::Signal), 1);
    }

    #[test]
    fn clocks_follow_domains() {
        let mut pool = Pool::new();
        let d = pool.default_domain();
        let clk = pool.clock("clk", d);
        let child = pool.component("child");
        let cc = pool.port("clk", clk, PortDir::In);
        pool.add_node(child, cc).unwrap();
        let top = pool.component("top");
        let tc = pool.port("kernel_clk", clk, PortDir::In);
        pool.add_node(top, tc).unwrap();
        let inst = pool.instantiate(top, child, None).unwrap();

        let out = resolve_clock_domains(&pool, top).unwrap();
        let ic = out.port_of(inst, "clk").unwrap();
        let e = out.node(ic).input.unwrap();
        assert_eq!(out.edge(e).src, Some(tc));
    }

    #[test]
    fn missing_clock_domain() {
        let mut pool = Pool::new();
        let bus = pool.clock_domain("bus");
        let d = pool.default_domain();
        let bus_clk = pool.clock("bus_clk", bus);
        let clk = pool.clock("clk", d);
        let child = pool.component("child");
        let cc = pool.port("bcd_clk", bus_clk, PortDir::In);
        pool.add_node(child, cc).unwrap();
        let top = pool.component("top");
        let tc = pool.port("clk", clk, PortDir::In);
        pool.add_node(top, tc).unwrap();
        pool.instantiate(top, child, Some("u0")).unwrap();

        let err = resolve_clock_domains(&pool, top).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no clock of domain `bus` in `top` to drive `u0.bcd_clk`"
        );
    }
}
