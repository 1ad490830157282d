//! Opaque ids for every arena-stored object.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from a raw index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

define_id!(
    /// Id of a [`Type`](crate::types::Type).
    TypeId,
    "t"
);

define_id!(
    /// Id of a [`Node`](crate::node::Node).
    NodeId,
    "n"
);

define_id!(
    /// Id of an [`Edge`](crate::edge::Edge).
    EdgeId,
    "e"
);

define_id!(
    /// Id of a [`Graph`](crate::graph::Graph), either a component or an instance.
    GraphId,
    "g"
);

define_id!(
    /// Id of a [`ClockDomain`](crate::pool::ClockDomain).
    DomainId,
    "d"
);
