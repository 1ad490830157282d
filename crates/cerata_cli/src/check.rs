//! `cerata check`: elaborate the design and report diagnostics.

use cerata_diagnostics::DiagnosticSink;

use crate::pipeline::{load_project, render_diagnostics};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `cerata check` command.
///
/// Returns exit code 0 if elaboration produced no errors, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_, config) = load_project(global)?;

    if !global.quiet {
        eprintln!("   Checking {} (top `{}`)", config.project.name, config.project.top);
    }

    let sink = DiagnosticSink::new();
    cerata_elaborate::elaborate(&config, &sink)?;

    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, global.color);
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&sink.diagnostics())?;
            println!("{json}");
        }
    }

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            sink.warning_count()
        );
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(body: &str) -> (TempDir, GlobalArgs) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cerata.toml");
        fs::write(&path, body).unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(path.display().to_string()),
        };
        (tmp, global)
    }

    #[test]
    fn clean_design_passes() {
        let (_tmp, global) = project(
            r#"
            [project]
            name = "clean"
            top = "top"

            [components.top]
            ports = [{ name = "a", type = "bit", dir = "in" }]
            "#,
        );
        let args = CheckArgs {
            format: ReportFormat::Text,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn unknown_type_fails() {
        let (_tmp, global) = project(
            r#"
            [project]
            name = "broken"
            top = "top"

            [components.top]
            ports = [{ name = "a", type = "nope", dir = "in" }]
            "#,
        );
        let args = CheckArgs {
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &global).unwrap(), 1);
    }

    #[test]
    fn missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(tmp.path().display().to_string()),
        };
        let args = CheckArgs {
            format: ReportFormat::Text,
        };
        assert!(run(&args, &global).is_err());
    }
}
