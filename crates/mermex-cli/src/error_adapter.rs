//! Error adapter for converting MermexError to miette diagnostics.
//!
//! The library reports plain [`MermexError`] values. This module attaches a
//! diagnostic code and help text so the CLI can render them through miette.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;

use mermex::MermexError;

/// Adapter for a single run-terminating error.
pub struct ErrorAdapter<'a> {
    err: &'a MermexError,
}

impl<'a> ErrorAdapter<'a> {
    /// Create a new error adapter.
    pub fn new(err: &'a MermexError) -> Self {
        Self { err }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl std::error::Error for ErrorAdapter<'_> {}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let code = match self.err {
            MermexError::Input { .. } => "mermex::input",
            MermexError::Config(_) => "mermex::config",
            MermexError::RendererUnavailable { .. } => "mermex::renderer_unavailable",
        };
        Some(Box::new(code) as Box<dyn fmt::Display>)
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        let help: Box<dyn fmt::Display> = match self.err {
            MermexError::RendererUnavailable { .. } => Box::new(
                "install @mermaid-js/mermaid-cli (`npm install -g @mermaid-js/mermaid-cli`) \
                 or set `renderer.command` in config.toml",
            ),
            MermexError::Config(_) => {
                Box::new("check the path and TOML syntax of the configuration file")
            }
            MermexError::Input { .. } => {
                Box::new("check that the input file exists and is readable")
            }
        };
        Some(help)
    }
}

/// Convert an error into a reportable miette diagnostic.
pub fn to_reportable(err: &MermexError) -> ErrorAdapter<'_> {
    ErrorAdapter::new(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_unavailable_has_help() {
        let err = MermexError::RendererUnavailable {
            command: "mmdc".to_string(),
        };
        let adapter = to_reportable(&err);

        assert_eq!(adapter.to_string(), "Renderer command `mmdc` was not found");
        let code = adapter.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("mermex::renderer_unavailable"));
        let help = adapter.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("npm install -g @mermaid-js/mermaid-cli"));
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = MermexError::Config("Missing configuration file: x.toml".to_string());
        let reporter = miette::GraphicalReportHandler::new();
        let mut out = String::new();
        reporter
            .render_report(&mut out, &to_reportable(&err))
            .expect("Writing to String buffer is infallible");

        assert!(out.contains("Missing configuration file"));
        assert!(out.contains("mermex::config"));
    }
}
