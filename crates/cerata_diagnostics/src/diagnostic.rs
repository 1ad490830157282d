//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A diagnostic about a design description.
///
/// `location` is a dotted path into the description, for example
/// `components.top.connections[1]`, or `None` when the problem concerns the
/// whole design.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Code identifying the kind of problem.
    pub code: DiagnosticCode,
    /// The main message.
    pub message: String,
    /// Where in the design description the problem was found.
    pub location: Option<String>,
    /// Explanatory notes.
    pub notes: Vec<String>,
    /// Suggestions for fixing the problem.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Sets the location.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Error, 201), "unknown type `vec3`");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.to_string(), "E201");
        assert!(diag.location.is_none());
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::Warning, 201), "not a stream")
            .at("components.top.signals.s")
            .with_note("only stream signals can be profiled")
            .with_help("remove `profile = true`");
        assert_eq!(diag.location.as_deref(), Some("components.top.signals.s"));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help.len(), 1);
    }
}
