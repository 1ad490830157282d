//! Stream profiler insertion on a generated top level.

use cerata_conformance::{full_pipeline, full_pipeline_profiled};

const DESIGN: &str = r#"
[project]
name = "profiled"
top = "top"

[types.vec8]
kind = "vector"
width = 8

[types.data]
kind = "stream"
element = "vec8"
element_name = "data"

[components.source]
ports = [
    { name = "clk", type = "clock", dir = "in" },
    { name = "o", type = "data", dir = "out" },
]

[components.top]
ports = [
    { name = "clk", type = "clock", dir = "in" },
    { name = "reset", type = "reset", dir = "in" },
]
signals = [
    { name = "s", type = "data", profile = true },
    { name = "flag", type = "bit", profile = true },
]
instances = [{ component = "source" }]
connections = [{ dst = "s", src = "source_inst.o" }]
"#;

#[test]
fn profiling_off_by_default() {
    let result = full_pipeline(DESIGN);
    // `flag` is not a stream; that is reported whether or not profiling runs
    assert_eq!(result.codes(), ["W201"]);
    let top = result.vhdl("top").unwrap();
    assert!(!top.contains("StreamProfiler"), "{top}");
}

#[test]
fn profiler_is_instantiated_and_exposed() {
    let result = full_pipeline_profiled(DESIGN);
    assert_eq!(result.codes(), ["W201"], "{:?}", result.diagnostics);
    assert!(result.vhdl("StreamProfiler").is_none());

    let top = result.vhdl("top").unwrap();
    assert!(top.contains("library work;\n"), "{top}");
    assert!(top.contains("use work.Stream_pkg.all;\n"), "{top}");
    assert!(top.contains("  s_profiler : StreamProfiler\n"), "{top}");
    assert!(top.contains("s_profile_enable : in  std_logic"), "{top}");
    assert!(top.contains("s_profile_count  : out std_logic_vector(10-1 downto 0)"), "{top}");
    assert!(top.contains("clk"), "{top}");
    assert!(!top.contains("flag_profiler"), "{top}");
}

#[test]
fn profiling_enabled_from_config() {
    let enabled = DESIGN.replace(
        "[types.vec8]",
        "[profile]\nenabled = true\n\n[types.vec8]",
    );
    let result = full_pipeline(&enabled);
    let top = result.top.unwrap();
    assert!(result.pool.instance_of(top, "s_profiler").is_some());
    assert!(result.pool.port_of(top, "s_profile_count").is_ok());
}
