//! VHDL lowering of Cerata graphs.
//!
//! [`Design`] turns one component into a design file: the resolution passes
//! run on a copy of the pool, then the library clauses, entity and
//! architecture are emitted. [`generate_all`] does this for a whole
//! hierarchy.

#![warn(missing_docs)]

pub mod arch;
pub mod block;
pub mod decl;
pub mod design;
pub mod error;
pub mod inst;
mod leaf;
pub mod resolve;
pub mod types;

pub use arch::architecture;
pub use block::{Block, Line, MultiBlock};
pub use decl::{declare, declare_signal, DeclKind};
pub use design::{generate_all, Design, GeneratedFile};
pub use error::VhdlError;
pub use inst::instantiate;
pub use resolve::{resolve_clock_domains, resolve_port_to_port};
