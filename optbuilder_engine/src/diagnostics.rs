//! Diagnostics reported during a round.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, GenerationError};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Generation failed for the anchored declaration or the round.
    Error,
    /// Generation continued.
    Warning,
}

/// Source location a diagnostic refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    /// Module path of the declaration.
    pub package: String,
    /// Declaration name.
    pub declaration: String,
    /// Parameter name, when the problem is specific to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl Anchor {
    /// Anchor on a declaration.
    #[must_use]
    pub fn declaration(package: impl Into<String>, declaration: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            declaration: declaration.into(),
            parameter: None,
        }
    }

    /// Narrow the anchor to one parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Option<&str>) -> Self {
        self.parameter = parameter.map(ToOwned::to_owned);
        self
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.package.is_empty() {
            write!(f, "{}::", self.package)?;
        }
        f.write_str(&self.declaration)?;
        if let Some(parameter) = &self.parameter {
            write!(f, ".{parameter}")?;
        }
        Ok(())
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Error category, when the diagnostic stems from a [`GenerationError`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
    /// Rendered message.
    pub message: String,
    /// Location.
    pub anchor: Anchor,
}

impl Diagnostic {
    /// An error diagnostic for `error`, narrowed to the error's parameter.
    #[must_use]
    pub fn from_error(error: &GenerationError, anchor: Anchor) -> Self {
        Self {
            severity: Severity::Error,
            category: Some(error.category()),
            message: error.to_string(),
            anchor: anchor.with_parameter(error.parameter()),
        }
    }

    /// A warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            severity: Severity::Warning,
            category: None,
            message: message.into(),
            anchor,
        }
    }

    /// Whether this diagnostic is an error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{label}: {}: {}", self.anchor, self.message)
    }
}

/// Destination for diagnostics.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A sink that keeps every diagnostic in report order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    /// Whether any error was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take ownership of the diagnostics.
    #[must_use]
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
