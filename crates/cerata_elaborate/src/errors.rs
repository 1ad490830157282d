//! Diagnostic codes and helper functions for elaboration errors and warnings.
//!
//! Error codes `E200`--`E212` cover problems that stop an item from being
//! built (unknown names, cycles, invalid connections). Warning codes
//! `W200`--`W202` cover items that are built or skipped with a caveat.

use cerata_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Top-level component not declared.
pub const E200: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 200,
};

/// Reference to an unknown type.
pub const E201: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 201,
};

/// Types contain each other.
pub const E202: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 202,
};

/// Instance of an unknown component.
pub const E203: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 203,
};

/// Duplicate node name within a component.
pub const E204: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 204,
};

/// Symbolic width or size that is not a parameter of the component.
pub const E205: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 205,
};

/// Generic value for a parameter the component does not have.
pub const E206: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 206,
};

/// Circular instantiation detected.
pub const E207: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 207,
};

/// Invalid type mapper.
pub const E208: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 208,
};

/// Connection endpoint that does not exist.
pub const E209: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 209,
};

/// The graph rejected an operation.
pub const E210: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 210,
};

/// Reference to an undeclared clock domain.
pub const E211: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 211,
};

/// The stream profiling pass failed.
pub const E212: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 212,
};

/// Instance input port without a driver.
pub const W200: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 200,
};

/// Profiling requested for a signal that is not a stream.
pub const W201: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};

/// Explicit mapper leaves some leaves unmapped.
pub const W202: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 202,
};

/// Creates a diagnostic for a missing top-level component.
pub fn error_top_not_found(name: &str) -> Diagnostic {
    Diagnostic::error(E200, format!("top-level component `{name}` not found"))
        .at("project.top")
        .with_help("set `project.top` in cerata.toml to a declared component")
}

/// Creates a diagnostic for an unknown type.
pub fn error_unknown_type(name: &str, location: &str) -> Diagnostic {
    Diagnostic::error(E201, format!("unknown type `{name}`")).at(location)
}

/// Creates a diagnostic for a type that contains itself.
pub fn error_type_cycle(name: &str) -> Diagnostic {
    Diagnostic::error(E202, format!("type `{name}` contains itself"))
        .at(format!("types.{name}"))
        .with_note("records and streams must form a tree")
}

/// Creates a diagnostic for an unknown component.
pub fn error_unknown_component(name: &str, location: &str) -> Diagnostic {
    Diagnostic::error(E203, format!("unknown component `{name}`")).at(location)
}

/// Creates a diagnostic for a duplicate name within a component.
pub fn error_duplicate_name(name: &str, component: &str) -> Diagnostic {
    Diagnostic::error(
        E204,
        format!("duplicate name `{name}` in component `{component}`"),
    )
    .at(format!("components.{component}"))
}

/// Creates a diagnostic for a symbolic width that names no parameter.
pub fn error_unknown_width_param(param: &str, component: &str, location: &str) -> Diagnostic {
    Diagnostic::error(
        E205,
        format!("`{param}` is not a parameter of component `{component}`"),
    )
    .at(location)
    .with_help(format!("declare `{param}` in `components.{component}.parameters`"))
}

/// Creates a diagnostic for a generic the component does not declare.
pub fn error_unknown_generic(generic: &str, component: &str, location: &str) -> Diagnostic {
    Diagnostic::error(
        E206,
        format!("component `{component}` has no parameter `{generic}`"),
    )
    .at(location)
}

/// Creates a diagnostic for a circular instantiation.
pub fn error_circular_instantiation(name: &str) -> Diagnostic {
    Diagnostic::error(E207, format!("circular instantiation of component `{name}`"))
        .at(format!("components.{name}"))
        .with_note("the component directly or indirectly instantiates itself")
}

/// Creates a diagnostic for a mapper that cannot be built.
pub fn error_invalid_mapper(from: &str, to: &str, reason: &str, index: usize) -> Diagnostic {
    Diagnostic::error(E208, format!("invalid mapper from `{from}` to `{to}`: {reason}"))
        .at(format!("mappers[{index}]"))
}

/// Creates a diagnostic for a connection endpoint that does not exist.
pub fn error_unknown_endpoint(endpoint: &str, location: &str) -> Diagnostic {
    Diagnostic::error(E209, format!("unknown connection endpoint `{endpoint}`")).at(location)
}

/// Creates a diagnostic for an operation the graph rejected.
pub fn error_graph(message: &str, location: &str) -> Diagnostic {
    Diagnostic::error(E210, message.to_string()).at(location)
}

/// Creates a diagnostic for an undeclared clock domain.
pub fn error_unknown_domain(name: &str, location: &str) -> Diagnostic {
    Diagnostic::error(E211, format!("unknown clock domain `{name}`"))
        .at(location)
        .with_help("add the domain to `domains.names`")
}

/// Creates a diagnostic for a failed profiling pass.
pub fn error_profiling(message: &str) -> Diagnostic {
    Diagnostic::error(E212, format!("stream profiling failed: {message}")).at("profile")
}

/// Creates a warning for an undriven instance input port.
pub fn warn_unconnected_port(port: &str, instance: &str, component: &str) -> Diagnostic {
    Diagnostic::warning(
        W200,
        format!("port `{port}` is unconnected on instance `{instance}`"),
    )
    .at(format!("components.{component}.instances"))
}

/// Creates a warning for profiling a non-stream node.
pub fn warn_profile_not_stream(node: &str, ty: &str) -> Diagnostic {
    Diagnostic::warning(
        W201,
        format!("`{node}` of type `{ty}` is not a stream and is not profiled"),
    )
    .with_note("only stream signals can be profiled")
}

/// Creates a warning for a mapper with unmapped leaves.
pub fn warn_unmapped_leaves(from: &str, to: &str, leaves: &[String], index: usize) -> Diagnostic {
    Diagnostic::warning(
        W202,
        format!("mapper from `{from}` to `{to}` leaves {} unmapped", leaves.join(", ")),
    )
    .at(format!("mappers[{index}]"))
    .with_note("connections through this mapper fail at VHDL generation")
}
