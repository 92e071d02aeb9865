//! Error types for Mermex operations.
//!
//! Most problems met while extracting diagrams are reported as
//! [`Diagnostic`](crate::diagnostic::Diagnostic)s and do not stop processing.
//! [`MermexError`] covers the conditions that end work on a file or a run.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for Mermex operations.
#[derive(Debug, Error)]
pub enum MermexError {
    #[error("Cannot read input file {}: {source}", path.display())]
    Input { path: PathBuf, source: io::Error },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Renderer command `{command}` was not found")]
    RendererUnavailable { command: String },
}

impl MermexError {
    /// Create a new `Input` error for the given path.
    pub fn new_input_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }
}
