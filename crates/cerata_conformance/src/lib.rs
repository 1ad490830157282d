//! Conformance test helpers for the Cerata hardware generator.
//!
//! Runs a design description through the full pipeline (elaborate →
//! profile → VHDL → DOT) and returns structured results for assertion in
//! integration tests.

#![warn(missing_docs)]

use cerata_config::DesignConfig;
use cerata_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use cerata_dot::Grapher;
use cerata_elaborate::errors;
use cerata_ir::{GraphId, Pool};
use cerata_vhdl::GeneratedFile;

/// Result of running the full pipeline.
pub struct PipelineResult {
    /// The elaborated pool, after profiling if it ran.
    pub pool: Pool,
    /// The top-level component, if it was built.
    pub top: Option<GraphId>,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
    /// Generated VHDL files, leaves first. Empty when elaboration failed.
    pub files: Vec<GeneratedFile>,
    /// DOT rendering of the top-level component.
    pub dot: Option<String>,
}

impl PipelineResult {
    /// The VHDL source generated for `component`.
    pub fn vhdl(&self, component: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.component == component)
            .map(|f| f.source.as_str())
    }

    /// Diagnostic codes in emission order, e.g. `["E201", "W200"]`.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Parses a design description without the loader's validation, so that
/// elaboration diagnostics such as a missing top can be observed.
pub fn make_config(toml_str: &str) -> DesignConfig {
    toml::from_str(toml_str).unwrap()
}

/// Runs the full pipeline on a design description.
pub fn full_pipeline(toml_str: &str) -> PipelineResult {
    run_pipeline(&make_config(toml_str), false)
}

/// Runs the full pipeline with stream profiling forced on.
pub fn full_pipeline_profiled(toml_str: &str) -> PipelineResult {
    run_pipeline(&make_config(toml_str), true)
}

/// Runs elaboration, optional profiling, VHDL and DOT generation.
///
/// Generation only runs when elaboration succeeded without errors. Failures
/// of the VHDL back end are internal bugs and panic.
pub fn run_pipeline(config: &DesignConfig, profile: bool) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let elaborated = cerata_elaborate::elaborate(config, &sink).unwrap();
    let mut pool = elaborated.pool;
    let top = elaborated.top;
    let mut files = Vec::new();
    let mut dot = None;

    if let Some(top) = top.filter(|_| !sink.has_errors()) {
        if profile || config.profile.enabled {
            match cerata_elaborate::enable_stream_profiling(&pool, top, &sink) {
                Ok(profiled) => pool = profiled,
                Err(e) => sink.emit(errors::error_profiling(&e.to_string())),
            }
        }
        if !sink.has_errors() {
            files = cerata_vhdl::generate_all(&pool, top, config.output.header.as_deref())
                .unwrap();
            dot = Some(Grapher::default().gen_dot(&pool, top));
        }
    }

    let diagnostics = sink.take_all();
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PipelineResult {
        pool,
        top,
        has_errors: error_count > 0,
        error_count,
        warning_count,
        diagnostics,
        files,
        dot,
    }
}
