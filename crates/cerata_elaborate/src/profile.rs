//! Stream profiling.
//!
//! Signals tagged [`Tag::Profile`] get a `StreamProfiler` instance that
//! observes their handshake. The profiler is a primitive from `Stream_pkg`;
//! its enable input and count output are exposed as ports of the component
//! that owns the signal.

use cerata_diagnostics::DiagnosticSink;
use cerata_ir::{
    GraphError, GraphId, LiteralValue, NodeId, Pool, PortDir, Tag, TypeId, TypeKind,
};

use crate::errors;

/// Name of the profiler component.
pub const PROFILER: &str = "StreamProfiler";
/// Default saturation value of the profiler counter.
pub const OUT_COUNT_MAX: i64 = 1023;
/// Default width of the profiler counter.
pub const OUT_COUNT_WIDTH: i64 = 10;

/// Returns the `StreamProfiler` component of `pool`, declaring it on first use.
pub fn stream_profiler(pool: &mut Pool) -> Result<GraphId, GraphError> {
    if let Some(comp) = pool.find_component(PROFILER) {
        return Ok(comp);
    }
    let integer = pool.integer();
    let count_max = pool.parameter(
        "OUT_COUNT_MAX",
        integer,
        Some(LiteralValue::Int(OUT_COUNT_MAX)),
    );
    let count_width = pool.parameter(
        "OUT_COUNT_WIDTH",
        integer,
        Some(LiteralValue::Int(OUT_COUNT_WIDTH)),
    );

    let domain = pool.default_domain();
    let clock = pool.clock("clock", domain);
    let reset = pool.reset("reset", domain);
    let empty = pool.record("empty", &[]);
    let probe_ty = pool.stream("probe", empty, "", 1)?;
    let count_ty = pool.vector("out_count_type", count_width);
    let bit = pool.bit();

    let ports = [
        pool.port("clk", clock, PortDir::In),
        pool.port("reset", reset, PortDir::In),
        pool.port("probe", probe_ty, PortDir::In),
        pool.port("enable", bit, PortDir::In),
        pool.port("count", count_ty, PortDir::Out),
    ];
    let comp = pool.make_component(PROFILER, &[count_max, count_width], &ports, &[])?;
    pool.add_graph_tag(
        comp,
        Tag::Primitive {
            library: "work".to_string(),
            package: "Stream_pkg".to_string(),
        },
    );
    Ok(comp)
}

/// Returns a copy of `pool` in which every profiled stream signal of `top`
/// is observed by its own `StreamProfiler`.
///
/// For a signal `s` this adds the instance `s_profiler`, the input port
/// `s_profile_enable` and the output port `s_profile_count` to `top`. The
/// probe is mapped onto the stream's valid and ready leaves. Profiled
/// signals that are not streams are reported as `W201` and skipped.
pub fn enable_stream_profiling(
    pool: &Pool,
    top: GraphId,
    sink: &DiagnosticSink,
) -> Result<Pool, GraphError> {
    let mut out = pool.clone();
    let profiled: Vec<NodeId> = out
        .signals(top)
        .into_iter()
        .filter(|s| out.node(*s).has_tag(&Tag::Profile))
        .collect();
    if profiled.is_empty() {
        return Ok(out);
    }

    let profiler = stream_profiler(&mut out)?;
    for signal in profiled {
        let ty = out.node(signal).ty;
        let name = out.node_name(signal).to_string();
        if !matches!(out.ty(ty).kind, TypeKind::Stream { .. }) {
            sink.emit(errors::warn_profile_not_stream(&name, out.type_name(ty)));
            continue;
        }
        log::debug!("profiling stream `{name}`");
        attach_profiler(&mut out, top, profiler, signal, ty, &name)?;
    }
    Ok(out)
}

fn attach_profiler(
    pool: &mut Pool,
    top: GraphId,
    profiler: GraphId,
    signal: NodeId,
    ty: TypeId,
    name: &str,
) -> Result<(), GraphError> {
    let inst = pool.instantiate(top, profiler, Some(&format!("{name}_profiler")))?;

    let probe = pool.port_of(inst, "probe")?;
    let probe_ty = pool.node(probe).ty;
    let mapper = pool.mapper_from_pairs(probe_ty, ty, &[(0, 0), (1, 1), (2, 2)])?;
    pool.add_mapper(mapper);
    pool.connect(probe, signal)?;

    let bit = pool.bit();
    let enable = pool.port(&format!("{name}_profile_enable"), bit, PortDir::In);
    pool.add_node(top, enable)?;
    let inst_enable = pool.port_of(inst, "enable")?;
    pool.connect(inst_enable, enable)?;

    let count_ty = pool.vector_of(OUT_COUNT_WIDTH);
    let count = pool.port(&format!("{name}_profile_count"), count_ty, PortDir::Out);
    pool.add_node(top, count)?;
    let inst_count = pool.port_of(inst, "count")?;
    pool.connect(count, inst_count)?;
    Ok(())
}
