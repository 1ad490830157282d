//! `cerata init`: project scaffolding.
//!
//! Writes a `cerata.toml` describing a small type conversion design: two
//! records with different field orders, a mapper between them, and a top
//! level that connects one component's output to the other's input.

use std::fs;
use std::path::{Path, PathBuf};

use cerata_config::CONFIG_FILE;

/// Runs the `cerata init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
pub fn run(name: Option<String>) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_design");

    eprintln!("  Creating new Cerata project `{project_name}`");
    let path = write_config(&project_dir, project_name)?;
    eprintln!("     Created {}", path.display());
    Ok(0)
}

/// Writes the template `cerata.toml`, refusing to replace an existing one.
fn write_config(dir: &Path, project_name: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    fs::write(&path, template(project_name))?;
    Ok(path)
}

fn template(project_name: &str) -> String {
    format!(
        r#"[project]
name = "{project_name}"
top = "top"
description = "Connects two records with differently ordered fields"

[output]
dir = "out"
vhdl = true
dot = true

[types.vec4]
kind = "vector"
width = 4

[types.vec2]
kind = "vector"
width = 2

[types.rec_a]
kind = "record"
fields = [
    {{ name = "q", type = "vec4" }},
    {{ name = "r", type = "vec2" }},
    {{ name = "s", type = "vec2" }},
    {{ name = "t", type = "vec4" }},
]

[types.rec_b]
kind = "record"
fields = [
    {{ name = "u", type = "vec4" }},
    {{ name = "v", type = "vec2" }},
    {{ name = "w", type = "vec2" }},
    {{ name = "x", type = "vec4" }},
]

# Pairs of flattened indices; index 0 is the record itself.
[[mappers]]
from = "rec_a"
to = "rec_b"
pairs = [[0, 0], [1, 2], [1, 3], [3, 1], [2, 1], [4, 4]]

[components.x]
ports = [{{ name = "o", type = "rec_a", dir = "out" }}]

[components.y]
ports = [{{ name = "i", type = "rec_b", dir = "in" }}]

[components.top]
instances = [{{ component = "x" }}, {{ component = "y" }}]
connections = [{{ dst = "y_inst.i", src = "x_inst.o" }}]
"#
    )
}
