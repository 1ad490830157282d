//! Parsing and validation of `cerata.toml` design descriptions.
//!
//! A design description declares clock domains, types, type mappers and
//! components (with their ports, signals, instances and connections). This
//! crate produces a strongly-typed [`DesignConfig`]; turning it into a graph
//! is the job of `cerata_elaborate`.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
