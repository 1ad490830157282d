//! Shared foundational types used across the Cerata hardware generator.
//!
//! Provides interned identifiers for every named graph object, content hashes
//! for emitted artifacts, and the internal result type.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{CerataResult, InternalError};
