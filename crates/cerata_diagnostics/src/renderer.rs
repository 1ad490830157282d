//! Diagnostic rendering.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Formats a diagnostic as text.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics rustc-style:
///
/// ```text
/// error[E209]: unknown endpoint `y0.j`
///   --> components.top.connections[0]
///    = note: ...
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to emit ANSI colour codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{code}m{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let head = format!("{}[{}]", diag.severity, diag.code);
        let mut out = format!("{}: {}\n", self.paint(diag.severity, &head), diag.message);
        if let Some(location) = &diag.location {
            out.push_str(&format!("  --> {location}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}
