//! Errors raised while lowering a graph to VHDL.

use cerata_ir::GraphError;

/// Failure to produce VHDL for a component.
#[derive(Debug, thiserror::Error)]
pub enum VhdlError {
    /// The graph API rejected an operation of a lowering pass.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A concrete leaf of a port type has no counterpart on the other side
    /// of a connection.
    #[error("leaf `{leaf}` of type `{ty}` has no destination mapping")]
    UnmappedLeaf {
        /// Flattened leaf name.
        leaf: String,
        /// Type of the node holding the leaf.
        ty: String,
    },

    /// An instance clock or reset port found no matching port or signal in
    /// its parent component.
    #[error("no {kind} of domain `{domain}` in `{component}` to drive `{instance}.{port}`")]
    MissingClockDomain {
        /// `clock` or `reset`.
        kind: &'static str,
        /// Domain name.
        domain: String,
        /// Parent component.
        component: String,
        /// Instance name.
        instance: String,
        /// Port name.
        port: String,
    },

    /// Writing generated files failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}
