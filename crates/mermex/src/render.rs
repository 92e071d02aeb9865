//! Conversion of `.mmd` files to images via an external renderer.
//!
//! Rendering is delegated entirely. The [`Renderer`] trait is the seam:
//! [`CommandRenderer`] shells out to a Mermaid CLI such as `mmdc`, and tests
//! substitute their own implementation.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    config::RendererConfig,
    output::{OutputFormat, OutputTarget},
};

/// A failed conversion of a single file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch `{command}`: {source}")]
    Launch { command: String, source: io::Error },

    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },
}

/// Produces an image from a Mermaid source file.
pub trait Renderer {
    /// Name shown in diagnostics, such as the command being run.
    fn name(&self) -> &str;

    /// Whether the renderer can be invoked at all.
    fn is_available(&self) -> bool;

    /// Render `input` to `output`. The output format follows the extension.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Runs an external command as `<command> -i <input> -o <output> [args...]`.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            command: config.command().to_string(),
            args: config.args().to_vec(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::from_config(&RendererConfig::default())
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        &self.command
    }

    /// Probes the command with `--version`. Only a launch failure counts as
    /// unavailable; the probe's exit status is ignored.
    fn is_available(&self) -> bool {
        let probe = Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match probe {
            Ok(status) => {
                debug!(command = self.command, status:% = status; "Renderer probe finished");
                true
            }
            Err(err) => {
                debug!(command = self.command, err:err = err; "Renderer probe failed");
                false
            }
        }
    }

    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let result = Command::new(&self.command)
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RenderError::Launch {
                command: self.command.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Renders written `.mmd` files into every requested image format.
pub struct Converter<'a> {
    target: &'a OutputTarget,
    renderer: &'a dyn Renderer,
}

impl<'a> Converter<'a> {
    pub fn new(target: &'a OutputTarget, renderer: &'a dyn Renderer) -> Self {
        Self { target, renderer }
    }

    /// Convert one `.mmd` file.
    ///
    /// Each image format is attempted in turn; a failure is logged and does
    /// not prevent the remaining formats from being tried.
    ///
    /// Returns the images that were produced and the failures.
    pub fn convert(&self, mmd_path: &Path) -> (Vec<PathBuf>, Vec<(PathBuf, RenderError)>) {
        let mut rendered = Vec::new();
        let mut failures = Vec::new();

        for format in self.target.image_formats() {
            let output = self.target.image_path(mmd_path, format);
            info!(
                input = mmd_path.display().to_string(),
                output = output.display().to_string();
                "Converting diagram"
            );

            match self.convert_one(mmd_path, &output, format) {
                Ok(()) => {
                    info!(output = output.display().to_string(); "Image generated");
                    rendered.push(output);
                }
                Err(err) => {
                    warn!(output = output.display().to_string(); "Conversion failed: {err}");
                    failures.push((output, err));
                }
            }
        }

        (rendered, failures)
    }

    fn convert_one(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
    ) -> Result<(), RenderError> {
        let dir = self.target.output_base().join(format.extension());
        fs::create_dir_all(&dir).map_err(|source| RenderError::OutputDir { path: dir, source })?;
        self.renderer.render(input, output)
    }
}
