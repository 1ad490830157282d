//! Diagnostics for Cerata design descriptions.
//!
//! A [`Diagnostic`] carries a severity, a code such as `E204`, a message and the
//! location in the design description it refers to. The [`DiagnosticSink`]
//! collects them during elaboration and a [`DiagnosticRenderer`] formats them.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
