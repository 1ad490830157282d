//! The Cerata graph: a typed hardware IR of components, instances and the
//! nodes and edges between them.
//!
//! All objects live in a [`Pool`]. Types nest ([`TypeKind::Record`],
//! [`TypeKind::Stream`]) and are compared by flattening them ([`flat`]).
//! Connections between nodes of different types go through a [`TypeMapper`],
//! which lowering back-ends use to pair up the flattened leaves.

#![warn(missing_docs)]

pub mod arena;
pub mod edge;
pub mod error;
mod expr;
pub mod flat;
pub mod graph;
mod hierarchy;
pub mod ids;
pub mod mapper;
pub mod node;
pub mod pool;
pub mod tag;
pub mod types;
mod wire;

pub use arena::{Arena, ArenaId};
pub use edge::Edge;
pub use error::GraphError;
pub use flat::{flat_to_string, flatten, weakly_equal, FlatType};
pub use graph::{Graph, GraphKind};
pub use ids::{DomainId, EdgeId, GraphId, NodeId, TypeId};
pub use mapper::{MappingMatrix, TypeMapper};
pub use node::{
    ArrayInfo, ArraySide, BinOp, LiteralValue, Node, NodeClass, NodeKind, PortDir,
};
pub use pool::{ClockDomain, Pool};
pub use tag::Tag;
pub use types::{RecordField, Type, TypeDb, TypeKind, TypeTag};
