//! Diagnostics produced while locating, decoding and normalizing diagrams.
//!
//! Nothing in the extraction pipeline rejects input outright. Instead, each
//! stage hands back [`Diagnostic`] values that describe what it noticed or
//! repaired, and the pipeline decides how to report them.
//!
//! # Example
//!
//! ```
//! # use mermex::diagnostic::{Diagnostic, Severity};
//! let diag = Diagnostic::warning("removed quotes from class name").with_line(3);
//!
//! assert_eq!(diag.severity(), Severity::Warning);
//! assert_eq!(diag.line(), Some(3));
//! assert_eq!(diag.to_string(), "warning: line 3: removed quotes from class name");
//! ```

use std::fmt;

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational outcome, such as "no diagrams found".
    Info,

    /// A non-fatal issue that was worked around.
    ///
    /// Auto-fixed diagrams and degraded payload decoding report warnings.
    Warning,
}

impl Severity {
    /// Returns the matching [`log::Level`].
    pub fn log_level(&self) -> log::Level {
        match self {
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single human-readable message with an optional 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    line: Option<usize>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            line: None,
        }
    }

    /// Create an informational diagnostic.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attach the 1-based line number the diagnostic refers to.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Emit this diagnostic through the `log` facade.
    pub fn log(&self) {
        match self.line {
            Some(line) => log::log!(self.severity.log_level(), line; "{}", self.message),
            None => log::log!(self.severity.log_level(), "{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        write!(f, "{}", self.message)
    }
}
