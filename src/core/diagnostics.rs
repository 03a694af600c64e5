//! Diagnostic Formatting
//!
//! Turns engine diagnostics into stable `"<severity> <line:column> <message>"`
//! lines, keeping the engine's order.

use std::fmt;

use crate::engine::{EngineDiagnostic, SEVERITY_ERROR, SEVERITY_WARNING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub fn from_code(code: u8) -> Self {
        match code {
            SEVERITY_ERROR => Severity::Error,
            SEVERITY_WARNING => Severity::Warn,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }
}

/// A diagnostic with a 1-based position
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub message: String,
}

impl From<&EngineDiagnostic> for Diagnostic {
    fn from(diagnostic: &EngineDiagnostic) -> Self {
        let start = diagnostic.range.map(|range| range.start);
        Self {
            severity: Severity::from_code(diagnostic.severity),
            line: start.map(|p| p.line + 1),
            column: start.map(|p| p.character + 1),
            message: diagnostic.message.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(
                f,
                "{} {}:{} {}",
                self.severity.as_str(),
                line,
                column,
                self.message
            ),
            _ => write!(f, "{} unknown {}", self.severity.as_str(), self.message),
        }
    }
}

/// Formats engine diagnostics for the validation result
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorFormatter;

impl ErrorFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, diagnostic: &EngineDiagnostic) -> String {
        Diagnostic::from(diagnostic).to_string()
    }

    /// Format every diagnostic, preserving order
    pub fn format_all(&self, diagnostics: &[EngineDiagnostic]) -> Vec<String> {
        diagnostics.iter().map(|d| self.format(d)).collect()
    }
}
