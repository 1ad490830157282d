//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{DesignConfig, TypeDecl, WidthSpec};
use std::path::Path;

/// File name of a design description inside a project directory.
pub const CONFIG_FILE: &str = "cerata.toml";

/// Loads and validates `<project_dir>/cerata.toml`.
pub fn load_config(project_dir: &Path) -> Result<DesignConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a design description from a string.
pub fn load_config_from_str(content: &str) -> Result<DesignConfig, ConfigError> {
    let config: DesignConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks required fields and the values that are meaningless regardless of
/// the rest of the design. Cross-references between types and components are
/// reported by elaboration, where they can be attributed to a location.
fn validate_config(config: &DesignConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.project.top.is_empty() {
        return Err(ConfigError::MissingField("project.top".to_string()));
    }
    if !config.components.contains_key(&config.project.top) {
        return Err(ConfigError::UnknownReference {
            kind: "component",
            name: config.project.top.clone(),
        });
    }
    for name in &config.domains.names {
        if name.is_empty() {
            return Err(ConfigError::ValidationError(
                "clock domain names must not be empty".to_string(),
            ));
        }
    }

    for (name, decl) in &config.types {
        match decl {
            TypeDecl::Vector {
                width: WidthSpec::Literal(w),
            } if *w < 0 => {
                return Err(ConfigError::ValidationError(format!(
                    "vector '{name}' has negative width {w}"
                )));
            }
            TypeDecl::Stream { epc: 0, .. } => {
                return Err(ConfigError::ValidationError(format!(
                    "stream '{name}' has epc 0"
                )));
            }
            TypeDecl::Clock { domain: Some(d) } | TypeDecl::Reset { domain: Some(d) }
                if d != "default" && !config.domains.names.contains(d) =>
            {
                return Err(ConfigError::UnknownReference {
                    kind: "clock domain",
                    name: d.clone(),
                });
            }
            _ => {}
        }
    }

    for (name, comp) in &config.components {
        let sizes = comp
            .ports
            .iter()
            .filter_map(|p| p.size.as_ref())
            .chain(comp.signals.iter().filter_map(|s| s.size.as_ref()));
        for size in sizes {
            if let WidthSpec::Literal(n) = size {
                if *n < 0 {
                    return Err(ConfigError::ValidationError(format!(
                        "component '{name}' declares an array of negative size {n}"
                    )));
                }
            }
        }
        if let Some(prim) = &comp.primitive {
            if prim.library.is_empty() || prim.package.is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "components.{name}.primitive library/package"
                )));
            }
        }
    }

    for mapper in &config.mappers {
        if !mapper.implicit && mapper.pairs.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "mapper '{}' -> '{}' has no pairs and is not implicit",
                mapper.from, mapper.to
            )));
        }
    }
    Ok(())
}
