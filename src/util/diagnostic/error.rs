//! Diagnostic data structures
//!
//! Fatal problems abort compilation through `CompileError`; a `Diagnostic` is the
//! non-fatal record (warnings) that travels alongside a successful compilation.
//! The CLI also renders a fatal error as a `Diagnostic` when reporting it.

use crate::util::span::Span;
use serde::Serialize;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Check if this is an error level
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Warning codes
pub mod codes {
    /// A variable is read before any assignment reaches it
    pub const UNINITIALIZED_READ: &str = "W0001";
    /// An expression statement whose value is discarded
    pub const NO_EFFECT: &str = "W0002";
    /// A compilation that aborted
    pub const COMPILE_ERROR: &str = "E0001";
}

/// A reported, non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Diagnostic code
    pub code: &'static str,
    /// Rendered message
    pub message: String,
    /// Location, when the finding maps to source text
    pub span: Option<Span>,
}

impl Diagnostic {
    /// Create a warning
    pub fn warning(
        code: &'static str,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            span,
        }
    }

    /// Create an error
    pub fn error(
        code: &'static str,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(span) = self.span.filter(|span| !span.is_dummy()) {
            write!(f, " at {}", span)?;
        }
        Ok(())
    }
}
