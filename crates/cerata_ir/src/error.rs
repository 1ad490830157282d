//! Errors raised by graph construction and transformation.

use crate::node::NodeClass;
use crate::types::TypeTag;

/// A structural violation detected by the graph API.
///
/// Names are resolved when the error is raised so that the error can be
/// displayed without access to the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The edge already drives another node.
    #[error("edge `{edge}` already has destination `{other}`, cannot also drive `{node}`")]
    EdgeHasOtherDestination {
        /// Edge name.
        edge: String,
        /// Node that was to become the destination.
        node: String,
        /// Current destination.
        other: String,
    },

    /// The edge is already driven by another node.
    #[error("edge `{edge}` already has source `{other}`, cannot also be driven by `{node}`")]
    EdgeHasOtherSource {
        /// Edge name.
        edge: String,
        /// Node that was to become the source.
        node: String,
        /// Current source.
        other: String,
    },

    /// Literals and expressions cannot be driven.
    #[error("{class} `{node}` cannot have inputs")]
    NoInputs {
        /// Node name.
        node: String,
        /// Node class.
        class: NodeClass,
    },

    /// No type mapping exists between the two endpoints.
    #[error("no type mapping from `{src}` of type `{src_ty}` to `{dst}` of type `{dst_ty}`")]
    NoMapper {
        /// Source node name.
        src: String,
        /// Source type name.
        src_ty: String,
        /// Destination node name.
        dst: String,
        /// Destination type name.
        dst_ty: String,
    },

    /// The connection would use a port against its direction.
    #[error("illegal connection: {reason} `{port}` of `{graph}`")]
    IllegalDirection {
        /// Port name.
        port: String,
        /// Owning graph.
        graph: String,
        /// The offending kind of port.
        reason: &'static str,
    },

    /// Only literals, expressions and parameters can be incremented.
    #[error("cannot increment {class} `{node}`")]
    CannotIncrement {
        /// Node name.
        node: String,
        /// Node class.
        class: NodeClass,
    },

    /// Division by a literal zero.
    #[error("division by zero in expression `{expr}`")]
    DivisionByZero {
        /// Expression text.
        expr: String,
    },

    /// Integer arithmetic overflowed.
    #[error("integer overflow evaluating `{expr}`")]
    Overflow {
        /// Expression text.
        expr: String,
    },

    /// The type has no bit width.
    #[error("type `{ty}` ({tag}) has no width")]
    NoWidth {
        /// Type name.
        ty: String,
        /// Type kind.
        tag: TypeTag,
    },

    /// The node is not an array node.
    #[error("node `{node}` is not an array")]
    NotArray {
        /// Node name.
        node: String,
    },

    /// The array node has no size edge.
    #[error("array `{node}` has no size")]
    NoArraySize {
        /// Node name.
        node: String,
    },

    /// Arrays must be appended on the side that holds their elements.
    #[error("array `{array}` cannot take elements on its {side} side")]
    ArraySideMismatch {
        /// Array node name.
        array: String,
        /// The side that was requested.
        side: &'static str,
    },

    /// The node or graph already belongs to a graph.
    #[error("`{node}` already belongs to `{owner}`")]
    AlreadyOwned {
        /// Node or graph name.
        node: String,
        /// Current owner.
        owner: String,
    },

    /// Instances only carry copies of ports and parameters.
    #[error("cannot add signal `{node}` to instance `{instance}`")]
    SignalOnInstance {
        /// Signal name.
        node: String,
        /// Instance name.
        instance: String,
    },

    /// Lookup by name failed.
    #[error("{class} `{name}` not found in `{graph}`")]
    NodeNotFound {
        /// Graph name.
        graph: String,
        /// Requested class.
        class: NodeClass,
        /// Requested name.
        name: String,
    },

    /// The graph is an instance where a component was expected.
    #[error("`{graph}` is not a component")]
    NotAComponent {
        /// Graph name.
        graph: String,
    },

    /// Components instantiate each other.
    #[error("instantiation cycle through component `{component}`")]
    InstantiationCycle {
        /// A component on the cycle.
        component: String,
    },

    /// The edge lacks a source or a destination.
    #[error("edge `{edge}` is not connected on both ends")]
    DanglingEdge {
        /// Edge name.
        edge: String,
    },

    /// The type is not a record.
    #[error("type `{ty}` is not a record")]
    NotARecord {
        /// Type name.
        ty: String,
    },

    /// Streams carry at least one element per cycle.
    #[error("stream `{ty}` must carry at least one element per cycle")]
    ZeroEpc {
        /// Type name.
        ty: String,
    },

    /// A mapper between types that do not flatten alike.
    #[error("types `{a}` and `{b}` are not weakly equal")]
    NotWeaklyEqual {
        /// First type.
        a: String,
        /// Second type.
        b: String,
    },

    /// A mapping matrix of the wrong shape.
    #[error("mapping matrix is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    MatrixShape {
        /// Expected rows.
        rows: usize,
        /// Expected columns.
        cols: usize,
        /// Supplied rows.
        found_rows: usize,
        /// Supplied columns.
        found_cols: usize,
    },

    /// A mapping index outside of the flattened types.
    #[error("mapping ({row}, {col}) is outside of a {rows}x{cols} matrix")]
    MapIndexOutOfRange {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Matrix rows.
        rows: usize,
        /// Matrix columns.
        cols: usize,
    },
}
