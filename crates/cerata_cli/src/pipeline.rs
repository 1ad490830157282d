//! Shared pipeline helpers for CLI commands.
//!
//! Contains the steps used by `check`, `flatten` and `generate`: project
//! root resolution, configuration loading, diagnostic rendering, and writing
//! generated files only when their content changed.

use std::fs;
use std::path::{Path, PathBuf};

use cerata_common::ContentHash;
use cerata_config::{DesignConfig, CONFIG_FILE};
use cerata_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `cerata.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the design description selected by the global arguments.
///
/// `--config` may name a file or a directory. Without it, the nearest
/// `cerata.toml` above the current directory is used. Returns the project
/// directory together with the configuration.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, DesignConfig), Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_file() {
                let content = fs::read_to_string(&path)?;
                let config = cerata_config::load_config_from_str(&content)?;
                let dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                Ok((dir, config))
            } else {
                let config = cerata_config::load_config(&path)?;
                Ok((path, config))
            }
        }
        None => {
            let dir = find_project_root(&std::env::current_dir()?)?;
            let config = cerata_config::load_config(&dir)?;
            Ok((dir, config))
        }
    }
}

/// Renders all diagnostics from a sink to stderr.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, color: bool) -> usize {
    let diagnostics = sink.diagnostics();
    let renderer = TerminalRenderer::new(color);
    for diag in &diagnostics {
        eprintln!("{}", renderer.render(diag));
    }
    diagnostics.len()
}

/// What happened to a generated file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or its content replaced.
    Written,
    /// The file on disk already had this content.
    Unchanged,
    /// The file exists and overwriting is disabled.
    Kept,
}

/// Writes `content` to `path` unless the file already holds the same content
/// (compared by [`ContentHash`]) or exists while `overwrite` is off.
pub fn write_if_changed(
    path: &Path,
    content: &str,
    overwrite: bool,
) -> std::io::Result<WriteOutcome> {
    let outcome = match ContentHash::of_file(path)? {
        Some(existing) if existing == ContentHash::from_bytes(content.as_bytes()) => {
            WriteOutcome::Unchanged
        }
        Some(_) if !overwrite => WriteOutcome::Kept,
        _ => {
            fs::write(path, content)?;
            WriteOutcome::Written
        }
    };
    log::debug!("{}: {outcome:?}", path.display());
    Ok(outcome)
}
