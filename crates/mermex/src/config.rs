//! Configuration types for Mermex.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from an
//! external TOML file. Every field has a default, so an empty file is a
//! valid configuration.
//!
//! # Example
//!
//! ```
//! # use mermex::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.renderer().command(), "mmdc");
//! assert!(config.renderer().args().is_empty());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Renderer configuration section.
    #[serde(default)]
    renderer: RendererConfig,
}

impl AppConfig {
    pub fn new(renderer: RendererConfig) -> Self {
        Self { renderer }
    }

    /// Returns the renderer configuration.
    pub fn renderer(&self) -> &RendererConfig {
        &self.renderer
    }
}

/// Settings for the external Mermaid renderer.
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Executable name or path.
    #[serde(default = "default_command")]
    command: String,

    /// Extra arguments appended to every conversion call.
    #[serde(default)]
    args: Vec<String>,
}

fn default_command() -> String {
    "mmdc".to_string()
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
        }
    }
}

impl RendererConfig {
    /// Creates a new [`RendererConfig`].
    ///
    /// # Arguments
    ///
    /// * `command` - Renderer executable.
    /// * `args` - Extra arguments passed after `-i <in> -o <out>`.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}
