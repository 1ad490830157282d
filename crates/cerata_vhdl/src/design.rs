//! Complete VHDL design files.

use crate::arch::architecture;
use crate::block::MultiBlock;
use crate::decl::{declare, DeclKind};
use crate::error::VhdlError;
use crate::resolve::{resolve_clock_domains, resolve_port_to_port};
use cerata_ir::{GraphId, Pool};
use std::fs;
use std::path::{Path, PathBuf};

/// The design file of one component.
pub struct Design<'a> {
    pool: &'a Pool,
    component: GraphId,
    header: Option<String>,
}

impl<'a> Design<'a> {
    /// A design for `component`.
    pub fn new(pool: &'a Pool, component: GraphId) -> Self {
        Self {
            pool,
            component,
            header: None,
        }
    }

    /// Prepends `header` as a comment.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Resolves a copy of the pool and emits the design.
    pub fn generate(&self) -> Result<MultiBlock, VhdlError> {
        let comp = self.component;
        log::debug!("VHDL: generating design for `{}`", self.pool.graph_name(comp));
        let resolved = resolve_port_to_port(self.pool, comp)?;
        let mut pool = resolve_clock_domains(&resolved, comp)?;

        let mut out = MultiBlock::new(0);
        if let Some(header) = &self.header {
            for line in header.lines() {
                out.line(0, format!("-- {line}").trim_end().to_string());
            }
            out.blank();
        }
        out.line(0, "library ieee;");
        out.line(0, "use ieee.std_logic_1164.all;");
        out.line(0, "use ieee.numeric_std.all;");

        let mut libraries: Vec<String> = Vec::new();
        let mut packages: Vec<(String, String)> = Vec::new();
        for child in pool.unique_components(comp) {
            if let Some((lib, pkg)) = pool.graph(child).primitive() {
                let entry = (lib.to_string(), pkg.to_string());
                if !packages.contains(&entry) {
                    packages.push(entry);
                }
            }
        }
        for (lib, pkg) in &packages {
            if !libraries.contains(lib) {
                out.line(0, format!("library {lib};"));
                libraries.push(lib.clone());
            }
            out.line(0, format!("use {lib}.{pkg}.all;"));
        }
        out.blank();

        out.extend(declare(&mut pool, comp, DeclKind::Entity, 0)?);
        out.blank();
        out.extend(architecture(&mut pool, comp)?);
        Ok(out)
    }
}

/// A generated design file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Component name, also the file stem.
    pub component: String,
    /// VHDL source.
    pub source: String,
}

impl GeneratedFile {
    /// `<dir>/<component>.vhd`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.vhd", self.component))
    }

    /// Writes the file into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, VhdlError> {
        let path = self.path_in(dir);
        fs::write(&path, &self.source).map_err(|source| VhdlError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}

/// Generates every non-primitive component reachable from `top`, leaves
/// first.
pub fn generate_all(
    pool: &Pool,
    top: GraphId,
    header: Option<&str>,
) -> Result<Vec<GeneratedFile>, VhdlError> {
    let mut out = Vec::new();
    for comp in pool.component_order(top)? {
        if pool.graph(comp).primitive().is_some() {
            continue;
        }
        let mut design = Design::new(pool, comp);
        if let Some(header) = header {
            design = design.with_header(header);
        }
        out.push(GeneratedFile {
            component: pool.graph_name(comp).to_string(),
            source: design.generate()?.to_string(),
        });
    }
    Ok(out)
}
