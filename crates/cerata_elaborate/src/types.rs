//! Type resolution: declared types and mappers.
//!
//! Types are built on demand in dependency order. A record or stream first
//! resolves the types it refers to; a name that is on the resolution stack
//! again is a cycle.

use cerata_config::{DesignConfig, TypeDecl, WidthSpec};
use cerata_ir::TypeId;

use crate::context::ElaborationContext;
use crate::errors;

/// Registers the declared clock domains.
pub fn elaborate_domains(ctx: &mut ElaborationContext) {
    let config = ctx.config;
    for name in &config.domains.names {
        ctx.pool.clock_domain(name);
        log::trace!("clock domain `{name}`");
    }
}

/// Resolves every declared type in name order.
pub fn elaborate_types(ctx: &mut ElaborationContext) {
    let config = ctx.config;
    for name in config.types.keys() {
        resolve_type(ctx, name, &format!("types.{name}"));
    }
}

/// The type named `name`, resolving it first if necessary.
///
/// Unknown names are reported as `E201` at `location`.
pub fn resolve_type(ctx: &mut ElaborationContext, name: &str, location: &str) -> Option<TypeId> {
    let mut stack = Vec::new();
    resolve_in(ctx, name, location, &mut stack)
}

fn resolve_in(
    ctx: &mut ElaborationContext,
    name: &str,
    location: &str,
    stack: &mut Vec<String>,
) -> Option<TypeId> {
    if let Some(id) = ctx.types.get(name) {
        return Some(*id);
    }
    if ctx.failed_types.contains(name) {
        return None;
    }
    let config = ctx.config;
    let Some(decl) = config.types.get(name) else {
        ctx.emit(errors::error_unknown_type(name, location));
        return None;
    };
    if stack.iter().any(|s| s == name) {
        ctx.emit(errors::error_type_cycle(name));
        ctx.failed_types.insert(name.to_string());
        return None;
    }

    stack.push(name.to_string());
    let built = build_type(ctx, name, decl, stack);
    stack.pop();

    match built {
        Some(id) => {
            log::trace!("type `{name}` resolved");
            ctx.types.insert(name.to_string(), id);
        }
        None => {
            ctx.failed_types.insert(name.to_string());
        }
    }
    built
}

fn build_type(
    ctx: &mut ElaborationContext,
    name: &str,
    decl: &TypeDecl,
    stack: &mut Vec<String>,
) -> Option<TypeId> {
    let location = format!("types.{name}");
    let id = match decl {
        TypeDecl::Bit => ctx.pool.bit(),
        TypeDecl::Integer => ctx.pool.integer(),
        TypeDecl::Natural => ctx.pool.natural(),
        TypeDecl::String => ctx.pool.string(),
        TypeDecl::Boolean => ctx.pool.boolean(),
        TypeDecl::Clock { domain } => {
            let domain = ctx.domain(domain.as_deref(), &location)?;
            ctx.pool.clock(name, domain)
        }
        TypeDecl::Reset { domain } => {
            let domain = ctx.domain(domain.as_deref(), &location)?;
            ctx.pool.reset(name, domain)
        }
        TypeDecl::Vector { width } => {
            let width = match width {
                WidthSpec::Literal(w) => ctx.pool.intl(*w),
                WidthSpec::Param(param) => width_param(ctx, param),
            };
            ctx.pool.vector(name, width)
        }
        TypeDecl::Record { fields } => {
            let mut resolved = Vec::with_capacity(fields.len());
            for (i, field) in fields.iter().enumerate() {
                let at = format!("{location}.fields[{i}]");
                resolved.push((field, resolve_in(ctx, &field.ty, &at, stack)?));
            }
            let record = ctx.pool.record(name, &[]);
            for (field, ty) in resolved {
                if let Err(err) = ctx.pool.add_field(record, &field.name, ty, field.reverse) {
                    ctx.graph_error(&err, &location);
                    return None;
                }
            }
            record
        }
        TypeDecl::Stream {
            element,
            element_name,
            epc,
        } => {
            let element = resolve_in(ctx, element, &format!("{location}.element"), stack)?;
            match ctx.pool.stream(name, element, element_name, *epc) {
                Ok(id) => id,
                Err(err) => {
                    ctx.graph_error(&err, &location);
                    return None;
                }
            }
        }
    };
    Some(id)
}

/// The free parameter standing for a symbolic vector width.
fn width_param(ctx: &mut ElaborationContext, param: &str) -> cerata_ir::NodeId {
    if let Some(node) = ctx.width_params.get(param) {
        return *node;
    }
    let natural = ctx.pool.natural();
    let node = ctx.pool.parameter(param, natural, None);
    ctx.width_params.insert(param.to_string(), node);
    node
}

/// Names of the parameters that symbolic widths inside type `name` refer to.
///
/// Follows records and streams through the declarations; unknown names and
/// cycles contribute nothing.
pub fn symbolic_widths(config: &DesignConfig, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = Vec::new();
    collect_widths(config, name, &mut out, &mut seen);
    out
}

fn collect_widths<'c>(
    config: &'c DesignConfig,
    name: &'c str,
    out: &mut Vec<String>,
    seen: &mut Vec<&'c str>,
) {
    if seen.contains(&name) {
        return;
    }
    seen.push(name);
    let Some(decl) = config.types.get(name) else {
        return;
    };
    if let TypeDecl::Vector {
        width: WidthSpec::Param(param),
    } = decl
    {
        if !out.contains(param) {
            out.push(param.clone());
        }
    }
    for reference in decl.references() {
        collect_widths(config, reference, out, seen);
    }
}

/// Builds and attaches the declared type mappers.
///
/// Explicit mappers are validated against the flattened shapes of both
/// types (`E208`); concrete leaves left unmapped are a warning (`W202`).
pub fn elaborate_mappers(ctx: &mut ElaborationContext) {
    let config = ctx.config;
    for (index, decl) in config.mappers.iter().enumerate() {
        let location = format!("mappers[{index}]");
        let Some(from) = resolve_type(ctx, &decl.from, &format!("{location}.from")) else {
            continue;
        };
        let Some(to) = resolve_type(ctx, &decl.to, &format!("{location}.to")) else {
            continue;
        };

        let mapper = if decl.implicit {
            ctx.pool.implicit_mapper(from, to)
        } else {
            let pairs: Vec<(usize, usize)> = decl.pairs.iter().map(|[i, j]| (*i, *j)).collect();
            match ctx.pool.mapper_from_pairs(from, to, &pairs) {
                Ok(mapper) => mapper,
                Err(err) => {
                    ctx.emit(errors::error_invalid_mapper(
                        &decl.from,
                        &decl.to,
                        &err.to_string(),
                        index,
                    ));
                    continue;
                }
            }
        };

        if !decl.implicit {
            let unmapped: Vec<String> = mapper
                .unmapped_leaves(ctx.pool.types())
                .into_iter()
                .map(|i| mapper.flat_a()[i].name(ctx.pool.interner(), &decl.from, ":"))
                .collect();
            if !unmapped.is_empty() {
                ctx.emit(errors::warn_unmapped_leaves(
                    &decl.from, &decl.to, &unmapped, index,
                ));
            }
        }
        ctx.pool.add_mapper(mapper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerata_diagnostics::DiagnosticSink;
    use cerata_ir::TypeKind;

    fn parse(extra: &str) -> DesignConfig {
        let text = format!(
            r#"
            [project]
            name = "test"
            top = "top"
            {extra}
            "#
        );
        toml::from_str(&text).unwrap()
    }

    #[test]
    fn record_fields_resolve_in_dependency_order() {
        let config = parse(
            r#"
            [types.rec]
            kind = "record"
            fields = [{ name = "a", type = "vec4" }, { name = "b", type = "bit", reverse = true }]

            [types.vec4]
            kind = "vector"
            width = 4
            "#,
        );
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&config, &sink);
        elaborate_types(&mut ctx);
        assert!(!sink.has_errors());
        let rec = ctx.types["rec"];
        match &ctx.pool.ty(rec).kind {
            TypeKind::Record { fields } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].ty, ctx.types["vec4"]);
                assert!(fields[1].reverse);
            }
            other => panic!("expected record, got {other:?}"),
        }
        assert_eq!(ctx.pool.flatten(rec).len(), 3);
    }

    #[test]
    fn unknown_type_reported() {
        let config = parse(
            r#"
            [types.s]
            kind = "stream"
            element = "missing"
            "#,
        );
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&config, &sink);
        elaborate_types(&mut ctx);
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, errors::E201);
        assert_eq!(diags[0].location.as_deref(), Some("types.s.element"));
        assert!(!ctx.types.contains_key("s"));
    }

    #[test]
    fn type_cycle_reported_once() {
        let config = parse(
            r#"
            [types.a]
            kind = "record"
            fields = [{ name = "x", type = "b" }]

            [types.b]
            kind = "stream"
            element = "a"
            "#,
        );
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&config, &sink);
        elaborate_types(&mut ctx);
        let cycles = sink
            .diagnostics()
            .into_iter()
            .filter(|d| d.code == errors::E202)
            .count();
        assert_eq!(cycles, 1);
        assert!(!ctx.types.contains_key("a"));
        assert!(!ctx.types.contains_key("b"));
    }

    #[test]
    fn symbolic_width_is_shared() {
        let config = parse(
            r#"
            [types.data]
            kind = "vector"
            width = "WIDTH"

            [types.addr]
            kind = "vector"
            width = "WIDTH"

            [types.rec]
            kind = "record"
            fields = [{ name = "d", type = "data" }, { name = "a", type = "addr" }]
            "#,
        );
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&config, &sink);
        elaborate_types(&mut ctx);
        assert_eq!(ctx.width_params.len(), 1);
        let width = ctx.width_params["WIDTH"];
        assert_eq!(ctx.pool.node_name(width), "WIDTH");
        assert_eq!(symbolic_widths(&config, "rec"), vec!["WIDTH".to_string()]);
        assert!(symbolic_widths(&config, "bit").is_empty());
    }

    #[test]
    fn clock_in_declared_domain() {
        let config = parse(
            r#"
            [domains]
            names = ["kernel"]

            [types.kclk]
            kind = "clock"
            domain = "kernel"

            [types.bad]
            kind = "reset"
            domain = "nowhere"
            "#,
        );
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&config, &sink);
        elaborate_domains(&mut ctx);
        elaborate_types(&mut ctx);
        let kernel = ctx.pool.find_domain("kernel").unwrap();
        assert_eq!(
            ctx.pool.ty(ctx.types["kclk"]).kind,
            TypeKind::Clock { domain: kernel }
        );
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.diagnostics()[0].code, errors::E211);
    }

    #[test]
    fn explicit_mapper_attached_and_checked() {
        let config = parse(
            r#"
            [types.ra]
            kind = "record"
            fields = [{ name = "p", type = "bit" }, { name = "q", type = "bit" }]

            [types.rb]
            kind = "record"
            fields = [{ name = "x", type = "bit" }, { name = "y", type = "bit" }]

            [[mappers]]
            from = "ra"
            to = "rb"
            pairs = [[0, 0], [1, 2]]

            [[mappers]]
            from = "ra"
            to = "rb"
            pairs = [[5, 0]]
            "#,
        );
        let sink = DiagnosticSink::new();
        let mut ctx = ElaborationContext::new(&config, &sink);
        elaborate_types(&mut ctx);
        elaborate_mappers(&mut ctx);

        let diags = sink.diagnostics();
        let unmapped = diags.iter().find(|d| d.code == errors::W202).unwrap();
        assert_eq!(unmapped.message, "mapper from `ra` to `rb` leaves ra:q unmapped");
        assert!(diags.iter().any(|d| d.code == errors::E208));

        let (ra, rb) = (ctx.types["ra"], ctx.types["rb"]);
        let mapper = ctx.pool.get_mapper(ra, rb).unwrap();
        assert_eq!(mapper.mapping_of(1), vec![2]);
        assert!(mapper.mapping_of(2).is_empty());
    }
}
