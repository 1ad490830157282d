//! `cerata generate`: elaborate the design and write VHDL and DOT output.
//!
//! The pipeline:
//!
//! 1. Find the project and load `cerata.toml`
//! 2. Elaborate into a pool
//! 3. Insert stream profilers, if enabled
//! 4. Emit one `.vhd` file per non-primitive component
//! 5. Emit `<top>.dot` for the top-level component
//!
//! Files whose content did not change are not rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use cerata_config::DesignConfig;
use cerata_diagnostics::DiagnosticSink;
use cerata_dot::Grapher;
use cerata_elaborate::errors;

use crate::pipeline::{load_project, render_diagnostics, write_if_changed, WriteOutcome};
use crate::{GenerateArgs, GlobalArgs};

/// Runs the `cerata generate` command.
///
/// Returns exit code 0 on success, 1 if the design has errors.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;

    if !global.quiet {
        eprintln!("   Generating {} (top `{}`)", config.project.name, config.project.top);
    }

    let sink = DiagnosticSink::new();
    let written = generate(&project_dir, &config, args, &sink)?;
    render_diagnostics(&sink, global.color);

    if sink.has_errors() {
        if !global.quiet {
            eprintln!("   Result: {} error(s), {} warning(s)", sink.error_count(), sink.warning_count());
        }
        return Ok(1);
    }

    if !global.quiet {
        for (path, outcome) in &written {
            match outcome {
                WriteOutcome::Written => eprintln!("   Generated {}", path.display()),
                WriteOutcome::Unchanged => eprintln!("   Unchanged {}", path.display()),
                WriteOutcome::Kept => eprintln!("     Skipped {} (exists)", path.display()),
            }
        }
        eprintln!("   Generation complete.");
    }
    Ok(0)
}

/// Elaborates `config` and writes the output files.
///
/// Design errors go to `sink` and stop generation before anything is
/// written; I/O and internal failures are returned as `Err`.
fn generate(
    project_dir: &Path,
    config: &DesignConfig,
    args: &GenerateArgs,
    sink: &DiagnosticSink,
) -> Result<Vec<(PathBuf, WriteOutcome)>, Box<dyn std::error::Error>> {
    let elaborated = cerata_elaborate::elaborate(config, sink)?;
    let top = match elaborated.top {
        Some(top) if !sink.has_errors() => top,
        _ => return Ok(Vec::new()),
    };

    let pool = if args.profile || config.profile.enabled {
        match cerata_elaborate::enable_stream_profiling(&elaborated.pool, top, sink) {
            Ok(pool) => pool,
            Err(e) => {
                sink.emit(errors::error_profiling(&e.to_string()));
                return Ok(Vec::new());
            }
        }
    } else {
        elaborated.pool
    };

    let out_dir = match &args.out {
        Some(dir) => PathBuf::from(dir),
        None => project_dir.join(&config.output.dir),
    };
    fs::create_dir_all(&out_dir)?;

    let overwrite = config.output.overwrite;
    let mut written = Vec::new();

    if config.output.vhdl {
        let files = cerata_vhdl::generate_all(&pool, top, config.output.header.as_deref())?;
        for file in files {
            let path = file.path_in(&out_dir);
            let outcome = write_if_changed(&path, &file.source, overwrite)?;
            written.push((path, outcome));
        }
    }

    if config.output.dot && !args.no_dot {
        let text = Grapher::default().gen_dot(&pool, top);
        let path = out_dir.join(format!("{}.dot", pool.graph_name(top)));
        let outcome = write_if_changed(&path, &text, overwrite)?;
        written.push((path, outcome));
    }

    log::debug!("{} file(s) in {}", written.len(), out_dir.display());
    Ok(written)
}
