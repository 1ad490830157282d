//! `cerata flatten`: print the flattened leaves of a type.

use cerata_diagnostics::DiagnosticSink;
use cerata_ir::flat_to_string;

use crate::pipeline::{load_project, render_diagnostics};
use crate::{FlattenArgs, GlobalArgs};

/// Runs the `cerata flatten` command.
pub fn run(args: &FlattenArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let text = flatten_type(args, global)?;
    print!("{text}");
    Ok(0)
}

fn flatten_type(args: &FlattenArgs, global: &GlobalArgs) -> Result<String, Box<dyn std::error::Error>> {
    let (_, config) = load_project(global)?;
    let sink = DiagnosticSink::new();
    let elaborated = cerata_elaborate::elaborate(&config, &sink)?;
    if sink.has_errors() {
        render_diagnostics(&sink, global.color);
    }

    let ty = *elaborated
        .types
        .get(&args.ty)
        .ok_or_else(|| format!("unknown type `{}`", args.ty))?;
    let pool = &elaborated.pool;
    Ok(flat_to_string(pool.types(), pool.interner(), &pool.flatten(ty)))
}
