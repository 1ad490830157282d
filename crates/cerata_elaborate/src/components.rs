//! Component elaboration.
//!
//! Components are built leaves first so that every instance refers to a
//! finished component. Within a component, parameters come first (array
//! sizes and generics refer to them), then ports, signals, instances and
//! finally connections.

use std::collections::{BTreeSet, HashMap, HashSet};

use cerata_config::{ComponentDecl, Direction, Endpoint, ValueSpec, WidthSpec};
use cerata_ir::{GraphId, LiteralValue, NodeId, PortDir, Tag, TypeId, TypeKind};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::context::ElaborationContext;
use crate::errors;
use crate::types::{resolve_type, symbolic_widths};

/// Elaborates every declared component, instantiated components first.
pub fn elaborate_components(ctx: &mut ElaborationContext) {
    let config = ctx.config;
    for name in build_order(ctx) {
        if let Some(decl) = config.components.get(&name) {
            elaborate_component(ctx, &name, decl);
        }
    }
}

/// Declared component names, each after all components it instantiates.
///
/// Components on an instantiation cycle are reported (`E207`) and left out.
fn build_order(ctx: &ElaborationContext) -> Vec<String> {
    let config = ctx.config;
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for name in config.components.keys() {
        index.insert(name.as_str(), graph.add_node(name.as_str()));
    }
    for (name, decl) in &config.components {
        for inst in &decl.instances {
            if let Some(child) = index.get(inst.component.as_str()) {
                graph.update_edge(index[name.as_str()], *child, ());
            }
        }
    }

    let mut order = Vec::new();
    // Strongly connected components come out in reverse topological order.
    for scc in tarjan_scc(&graph) {
        let cyclic = scc.len() > 1 || graph.contains_edge(scc[0], scc[0]);
        if cyclic {
            let members: BTreeSet<&str> = scc.iter().map(|n| graph[*n]).collect();
            for name in members {
                ctx.emit(errors::error_circular_instantiation(name));
            }
            continue;
        }
        order.push(graph[scc[0]].to_string());
    }
    order
}

/// Converts a configured value into a literal.
pub fn literal_value(value: &ValueSpec) -> LiteralValue {
    match value {
        ValueSpec::Int(v) => LiteralValue::Int(*v),
        ValueSpec::Bool(b) => LiteralValue::Bool(*b),
        ValueSpec::Str(s) => LiteralValue::Str(s.clone()),
    }
}

fn port_dir(dir: Direction) -> PortDir {
    match dir {
        Direction::In => PortDir::In,
        Direction::Out => PortDir::Out,
    }
}

fn elaborate_component(ctx: &mut ElaborationContext, name: &str, decl: &ComponentDecl) {
    log::debug!("elaborating component `{name}`");
    let comp = ctx.pool.component(name);
    ctx.components.insert(name.to_string(), comp);
    if let Some(primitive) = &decl.primitive {
        ctx.pool.add_graph_tag(
            comp,
            Tag::Primitive {
                library: primitive.library.clone(),
                package: primitive.package.clone(),
            },
        );
    }

    let mut names = HashSet::new();
    let base = format!("components.{name}");

    for (i, param) in decl.parameters.iter().enumerate() {
        let at = format!("{base}.parameters[{i}]");
        if !names.insert(param.name.clone()) {
            ctx.emit(errors::error_duplicate_name(&param.name, name));
            continue;
        }
        let Some(ty) = resolve_type(ctx, &param.ty, &format!("{at}.type")) else {
            continue;
        };
        let default = param.default.as_ref().map(literal_value);
        let node = ctx.pool.parameter(&param.name, ty, default);
        add_node(ctx, comp, node, &at);
    }

    for (i, port) in decl.ports.iter().enumerate() {
        let at = format!("{base}.ports[{i}]");
        if !names.insert(port.name.clone()) {
            ctx.emit(errors::error_duplicate_name(&port.name, name));
            continue;
        }
        let Some(ty) = wire_type(ctx, name, decl, &port.ty, &at) else {
            continue;
        };
        let Some(domain) = ctx.domain(port.domain.as_deref(), &at) else {
            continue;
        };
        let dir = port_dir(port.dir);
        let node = match &port.size {
            None => ctx.pool.port_in_domain(&port.name, ty, dir, domain),
            Some(size) => {
                let Some(size) = array_size(ctx, comp, name, size, &at) else {
                    continue;
                };
                ctx.pool.array_port_in_domain(&port.name, ty, size, dir, domain)
            }
        };
        add_node(ctx, comp, node, &at);
    }

    for (i, signal) in decl.signals.iter().enumerate() {
        let at = format!("{base}.signals[{i}]");
        if !names.insert(signal.name.clone()) {
            ctx.emit(errors::error_duplicate_name(&signal.name, name));
            continue;
        }
        let Some(ty) = wire_type(ctx, name, decl, &signal.ty, &at) else {
            continue;
        };
        let Some(domain) = ctx.domain(signal.domain.as_deref(), &at) else {
            continue;
        };
        let node = match &signal.size {
            None => ctx.pool.signal_in_domain(&signal.name, ty, domain),
            Some(size) => {
                let Some(size) = array_size(ctx, comp, name, size, &at) else {
                    continue;
                };
                ctx.pool.array_signal(&signal.name, ty, size)
            }
        };
        if signal.profile {
            if matches!(ctx.pool.ty(ty).kind, TypeKind::Stream { .. }) {
                ctx.pool.node_mut(node).tags.push(Tag::Profile);
            } else {
                ctx.emit(
                    errors::warn_profile_not_stream(&signal.name, ctx.pool.type_name(ty))
                        .at(at.clone()),
                );
            }
        }
        add_node(ctx, comp, node, &at);
    }

    for (i, inst) in decl.instances.iter().enumerate() {
        let at = format!("{base}.instances[{i}]");
        let Some(child) = ctx.components.get(&inst.component).copied() else {
            if !ctx.config.components.contains_key(&inst.component) {
                ctx.emit(errors::error_unknown_component(
                    &inst.component,
                    &format!("{at}.component"),
                ));
            }
            continue;
        };
        let inst_name = inst
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_inst", inst.component));
        if !names.insert(inst_name.clone()) {
            ctx.emit(errors::error_duplicate_name(&inst_name, name));
            continue;
        }
        let instance = match ctx.pool.instantiate(comp, child, Some(&inst_name)) {
            Ok(instance) => instance,
            Err(err) => {
                ctx.graph_error(&err, &at);
                continue;
            }
        };
        for (generic, value) in &inst.generics {
            let Ok(param) = ctx.pool.parameter_of(instance, generic) else {
                ctx.emit(errors::error_unknown_generic(
                    generic,
                    &inst.component,
                    &format!("{at}.generics.{generic}"),
                ));
                continue;
            };
            let value = ctx.pool.literal(literal_value(value));
            if let Err(err) = ctx.pool.connect(param, value) {
                ctx.graph_error(&err, &at);
            }
        }
    }

    for (i, conn) in decl.connections.iter().enumerate() {
        let at = format!("{base}.connections[{i}]");
        let dst = endpoint(ctx, comp, &conn.dst, &format!("{at}.dst"));
        let src = endpoint(ctx, comp, &conn.src, &format!("{at}.src"));
        let (Some(dst), Some(src)) = (dst, src) else {
            continue;
        };
        if let Err(err) = ctx.pool.connect(dst, src) {
            ctx.graph_error(&err, &at);
        }
    }

    warn_unconnected(ctx, comp, name);
}

fn add_node(ctx: &mut ElaborationContext, comp: GraphId, node: NodeId, at: &str) {
    if let Err(err) = ctx.pool.add_node(comp, node) {
        ctx.graph_error(&err, at);
    }
}

/// Resolves the type of a port or signal and checks that its symbolic widths
/// are parameters of the component.
fn wire_type(
    ctx: &mut ElaborationContext,
    component: &str,
    decl: &ComponentDecl,
    ty: &str,
    at: &str,
) -> Option<TypeId> {
    let resolved = resolve_type(ctx, ty, &format!("{at}.type"))?;
    let mut ok = true;
    for param in symbolic_widths(ctx.config, ty) {
        if !decl.parameters.iter().any(|p| p.name == param) {
            ctx.emit(errors::error_unknown_width_param(&param, component, at));
            ok = false;
        }
    }
    ok.then_some(resolved)
}

fn array_size(
    ctx: &mut ElaborationContext,
    comp: GraphId,
    component: &str,
    size: &WidthSpec,
    at: &str,
) -> Option<NodeId> {
    match size {
        WidthSpec::Literal(n) => Some(ctx.pool.intl(*n)),
        WidthSpec::Param(param) => match ctx.pool.parameter_of(comp, param) {
            Ok(node) => Some(node),
            Err(_) => {
                ctx.emit(errors::error_unknown_width_param(
                    param,
                    component,
                    &format!("{at}.size"),
                ));
                None
            }
        },
    }
}

/// Resolves `node` or `instance.node` inside `comp`.
///
/// Component-level names may also refer to parameters, and an integer is an
/// integer literal.
fn endpoint(ctx: &mut ElaborationContext, comp: GraphId, text: &str, at: &str) -> Option<NodeId> {
    let ep = Endpoint::parse(text);
    let graph = match ep.instance {
        Some(inst) => match ctx.pool.instance_of(comp, inst) {
            Some(g) => g,
            None => {
                ctx.emit(errors::error_unknown_endpoint(text, at));
                return None;
            }
        },
        None => {
            if let Ok(v) = ep.node.parse::<i64>() {
                return Some(ctx.pool.intl(v));
            }
            comp
        }
    };
    let found = ctx
        .pool
        .wire_of(graph, ep.node)
        .or_else(|_| ctx.pool.parameter_of(graph, ep.node));
    match found {
        Ok(node) => Some(node),
        Err(_) => {
            ctx.emit(errors::error_unknown_endpoint(text, at));
            None
        }
    }
}

/// Warns about instance input ports that nothing drives. Clocks and resets
/// are connected by domain during generation and are not reported.
fn warn_unconnected(ctx: &ElaborationContext, comp: GraphId, component: &str) {
    for inst in ctx.pool.instances(comp) {
        for port in ctx.pool.ports(inst) {
            let node = ctx.pool.node(port);
            if node.is_array() || node.dir() != Some(PortDir::In) {
                continue;
            }
            if matches!(
                ctx.pool.ty(node.ty).kind,
                TypeKind::Clock { .. } | TypeKind::Reset { .. }
            ) {
                continue;
            }
            let driven = node
                .input
                .is_some_and(|e| ctx.pool.edge(e).src.is_some());
            if !driven {
                ctx.emit(errors::warn_unconnected_port(
                    ctx.pool.node_name(port),
                    ctx.pool.graph_name(inst),
                    component,
                ));
            }
        }
    }
}
