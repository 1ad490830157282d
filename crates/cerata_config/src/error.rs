//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `cerata.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A name refers to something that is not declared.
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        /// What kind of object was referenced ("component", "clock domain", ...).
        kind: &'static str,
        /// The referenced name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("project.top".to_string());
        assert_eq!(format!("{err}"), "missing required field: project.top");
    }

    #[test]
    fn display_unknown_reference() {
        let err = ConfigError::UnknownReference {
            kind: "component",
            name: "top".to_string(),
        };
        assert_eq!(format!("{err}"), "unknown component 'top'");
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("stream 's' has epc 0".to_string());
        assert_eq!(format!("{err}"), "validation error: stream 's' has epc 0");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
