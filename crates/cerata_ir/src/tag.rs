//! Capability tags attached to graphs and nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed marker on a graph or node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// The component is hand-written and declared in a VHDL package. It is
    /// instantiated but never declared or generated.
    Primitive {
        /// VHDL library holding the package.
        library: String,
        /// VHDL package declaring the component.
        package: String,
    },
    /// A stream signal to be observed by a stream profiler.
    Profile,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Primitive { library, package } => write!(f, "primitive({library}.{package})"),
            Tag::Profile => f.write_str("profile"),
        }
    }
}

/// Returns the library and package of the first `Primitive` tag.
pub fn primitive_of(tags: &[Tag]) -> Option<(&str, &str)> {
    tags.iter().find_map(|t| match t {
        Tag::Primitive { library, package } => Some((library.as_str(), package.as_str())),
        Tag::Profile => None,
    })
}
