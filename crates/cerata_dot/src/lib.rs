//! Graphviz DOT lowering of Cerata graphs.

#![warn(missing_docs)]

pub mod error;
pub mod grapher;
pub mod style;

pub use error::DotError;
pub use grapher::Grapher;
pub use style::{Config, NodeStyle, Style};
