//! Mutable elaboration state.
//!
//! [`ElaborationContext`] holds the [`Pool`] under construction, the
//! declarations it is built from, and the name tables that map declared
//! type and component names to their ids in the pool.

use std::collections::{HashMap, HashSet};

use cerata_config::DesignConfig;
use cerata_diagnostics::{Diagnostic, DiagnosticSink};
use cerata_ir::{DomainId, GraphError, GraphId, NodeId, Pool, TypeId};

use crate::errors;

/// Mutable state carried through elaboration.
pub struct ElaborationContext<'a> {
    /// The pool being built.
    pub pool: Pool,
    /// The design description.
    pub config: &'a DesignConfig,
    /// The diagnostic sink for error reporting.
    pub sink: &'a DiagnosticSink,
    /// Resolved types by declared name, including the built-ins.
    pub types: HashMap<String, TypeId>,
    /// Declared types that failed to resolve; reported once.
    pub failed_types: HashSet<String>,
    /// Free width parameters of symbolic vector types, by parameter name.
    pub width_params: HashMap<String, NodeId>,
    /// Elaborated components by name.
    pub components: HashMap<String, GraphId>,
}

impl<'a> ElaborationContext<'a> {
    /// Creates a context with the built-in types registered.
    pub fn new(config: &'a DesignConfig, sink: &'a DiagnosticSink) -> Self {
        let mut pool = Pool::new();
        let default = pool.default_domain();
        let mut types = HashMap::new();
        types.insert("bit".to_string(), pool.bit());
        types.insert("integer".to_string(), pool.integer());
        types.insert("natural".to_string(), pool.natural());
        types.insert("string".to_string(), pool.string());
        types.insert("boolean".to_string(), pool.boolean());
        types.insert("clock".to_string(), pool.clock("clock", default));
        types.insert("reset".to_string(), pool.reset("reset", default));
        Self {
            pool,
            config,
            sink,
            types,
            failed_types: HashSet::new(),
            width_params: HashMap::new(),
            components: HashMap::new(),
        }
    }

    /// Emits a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.sink.emit(diag);
    }

    /// Reports a rejected graph operation as `E210` at `location`.
    pub fn graph_error(&self, err: &GraphError, location: &str) {
        self.emit(errors::error_graph(&err.to_string(), location));
    }

    /// The domain named `name`; `None` and `default` give the default domain.
    pub fn domain(&self, name: Option<&str>, location: &str) -> Option<DomainId> {
        match name {
            None | Some("default") => Some(self.pool.default_domain()),
            Some(name) => {
                let found = self.pool.find_domain(name);
                if found.is_none() {
                    self.emit(errors::error_unknown_domain(name, location));
                }
                found
            }
        }
    }
}
