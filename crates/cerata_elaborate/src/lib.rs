//! Design elaboration: builds a Cerata [`Pool`] from a `cerata.toml`
//! description.
//!
//! Elaboration registers clock domains, resolves the declared types in
//! dependency order, attaches type mappers, and builds every component with
//! its parameters, ports, signals, instances and connections. Problems in the
//! description are emitted to a [`DiagnosticSink`]; elaboration carries on
//! with whatever it could build.
//!
//! # Usage
//!
//! ```ignore
//! let sink = DiagnosticSink::new();
//! let elaborated = elaborate(&config, &sink)?;
//! if let Some(top) = elaborated.top { /* generate */ }
//! ```

#![warn(missing_docs)]

pub mod components;
pub mod context;
pub mod errors;
pub mod profile;
pub mod types;

use std::collections::BTreeMap;

use cerata_common::CerataResult;
use cerata_config::DesignConfig;
use cerata_diagnostics::DiagnosticSink;
use cerata_ir::{GraphId, Pool, TypeId};

use context::ElaborationContext;

pub use profile::{enable_stream_profiling, stream_profiler};

/// The result of elaboration.
#[derive(Debug)]
pub struct Elaborated {
    /// Every type, component and instance that could be built.
    pub pool: Pool,
    /// The top-level component, if it was built.
    pub top: Option<GraphId>,
    /// Resolved types by name, declared and built-in.
    pub types: BTreeMap<String, TypeId>,
}

/// Elaborates a design description.
///
/// User-facing errors are emitted to `sink`; only internal generator bugs
/// return `Err`.
pub fn elaborate(config: &DesignConfig, sink: &DiagnosticSink) -> CerataResult<Elaborated> {
    let mut ctx = ElaborationContext::new(config, sink);
    types::elaborate_domains(&mut ctx);
    types::elaborate_types(&mut ctx);
    types::elaborate_mappers(&mut ctx);
    components::elaborate_components(&mut ctx);

    let top_name = &config.project.top;
    let top = ctx.components.get(top_name).copied();
    if top.is_none() && !config.components.contains_key(top_name) {
        sink.emit(errors::error_top_not_found(top_name));
    }
    if let Some(top) = top {
        let found = ctx.pool.find_component(top_name);
        if found != Some(top) {
            return Err(format!("component `{top_name}` registered twice").into());
        }
    }
    log::debug!(
        "elaborated {} component(s), {} error(s)",
        ctx.components.len(),
        sink.error_count()
    );
    Ok(Elaborated {
        pool: ctx.pool,
        top,
        types: ctx.types.into_iter().collect(),
    })
}
