//! Tests that broken descriptions produce diagnostics instead of panics, and
//! that generation only runs on error-free designs.

use cerata_conformance::full_pipeline;

fn design(body: &str) -> String {
    format!(
        r#"
[project]
name = "diag"
top = "top"

{body}
"#
    )
}

#[test]
fn missing_top() {
    let result = full_pipeline(&design("[components.other]\n"));
    assert_eq!(result.codes(), ["E200"]);
    assert!(result.top.is_none());
    assert!(result.files.is_empty());
    assert!(result.dot.is_none());
}

#[test]
fn unknown_port_type_blocks_generation() {
    let result = full_pipeline(&design(
        r#"
[components.top]
ports = [{ name = "a", type = "nope", dir = "in" }]
"#,
    ));
    assert_eq!(result.codes(), ["E201"]);
    assert!(result.has_errors);
    assert!(result.files.is_empty());
}

#[test]
fn self_containing_record() {
    let result = full_pipeline(&design(
        r#"
[types.loop]
kind = "record"
fields = [{ name = "inner", type = "loop" }]

[components.top]
"#,
    ));
    assert_eq!(result.codes(), ["E202"]);
}

#[test]
fn circular_instantiation_reports_each_member() {
    let result = full_pipeline(&design(
        r#"
[components.a]
instances = [{ component = "b" }]

[components.b]
instances = [{ component = "a" }]

[components.top]
instances = [{ component = "a" }]
"#,
    ));
    let codes = result.codes();
    assert_eq!(codes.iter().filter(|c| *c == "E207").count(), 2, "{codes:?}");
    assert!(result.files.is_empty());
}

#[test]
fn unknown_endpoint() {
    let result = full_pipeline(&design(
        r#"
[components.leaf]
ports = [{ name = "i", type = "bit", dir = "in" }]

[components.top]
instances = [{ component = "leaf" }]
connections = [{ dst = "leaf_inst.i", src = "missing" }]
"#,
    ));
    let codes = result.codes();
    assert!(codes.contains(&"E209".to_string()), "{codes:?}");
    let diag = result
        .diagnostics
        .iter()
        .find(|d| d.code.to_string() == "E209")
        .unwrap();
    assert_eq!(diag.message, "unknown connection endpoint `missing`");
}

#[test]
fn duplicate_node_name() {
    let result = full_pipeline(&design(
        r#"
[components.top]
ports = [{ name = "a", type = "bit", dir = "in" }]
signals = [{ name = "a", type = "bit" }]
"#,
    ));
    assert_eq!(result.codes(), ["E204"]);
}

#[test]
fn unconnected_input_is_only_a_warning() {
    let result = full_pipeline(&design(
        r#"
[components.leaf]
ports = [
    { name = "clk", type = "clock", dir = "in" },
    { name = "a", type = "bit", dir = "in" },
]

[components.top]
ports = [{ name = "clk", type = "clock", dir = "in" }]
instances = [{ component = "leaf" }]
"#,
    ));
    assert_eq!(result.codes(), ["W200"]);
    assert_eq!(result.warning_count, 1);
    assert!(!result.has_errors);
    assert_eq!(
        result.diagnostics[0].message,
        "port `a` is unconnected on instance `leaf_inst`"
    );
    assert_eq!(result.files.len(), 2);
    let top = result.vhdl("top").unwrap();
    assert!(top.contains("clk => clk"), "{top}");
}

#[test]
fn partial_mapper_warns() {
    let result = full_pipeline(&design(
        r#"
[types.ra]
kind = "record"
fields = [{ name = "p", type = "bit" }, { name = "q", type = "bit" }]

[types.rb]
kind = "record"
fields = [{ name = "p", type = "bit" }, { name = "q", type = "bit" }]

[[mappers]]
from = "ra"
to = "rb"
pairs = [[0, 0], [1, 1]]

[components.top]
"#,
    ));
    assert_eq!(result.codes(), ["W202"]);
    assert!(result.diagnostics[0].message.contains("ra:q"));
}

#[test]
fn out_of_range_mapper_pair() {
    let result = full_pipeline(&design(
        r#"
[types.ra]
kind = "record"
fields = [{ name = "p", type = "bit" }]

[[mappers]]
from = "ra"
to = "ra"
pairs = [[5, 0]]

[components.top]
"#,
    ));
    assert_eq!(result.codes(), ["E208"]);
}

#[test]
fn unknown_clock_domain() {
    let result = full_pipeline(&design(
        r#"
[types.fast_clk]
kind = "clock"
domain = "fast"

[components.top]
ports = [{ name = "clk", type = "fast_clk", dir = "in" }]
"#,
    ));
    assert!(result.codes().contains(&"E211".to_string()), "{:?}", result.codes());
}
