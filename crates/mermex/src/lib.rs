//! Mermex - extract Mermaid diagrams into standalone files.
//!
//! Diagrams are located in Markdown files, bare Mermaid sources, or
//! string-literal payloads embedded in HTML script tags. Each diagram is
//! normalized, written as a `.mmd` file, and optionally rendered to images
//! by an external Mermaid renderer.
//!
//! The two kinds of input share one pipeline. They differ only in the
//! [`TextSource`] that produces diagram text from a file's content:
//!
//! - [`DirectSource`] for Markdown and raw Mermaid files.
//! - [`EmbeddedSource`] for HTML pages with an escaped script payload.

pub mod config;
pub mod decode;
pub mod diagnostic;
pub mod extract;
pub mod locate;
pub mod normalize;
pub mod output;
pub mod render;
pub mod source;

mod diagram;
mod error;

pub use diagram::{DiagramBlock, DiagramKind};
pub use error::MermexError;
pub use source::{DirectSource, EmbeddedSource, TextSource};

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};

use extract::ExtractionResult;
use output::OutputTarget;
use render::{CommandRenderer, Converter, RenderError, Renderer};

/// How processing of one input file ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Diagrams were found and handled.
    Processed,
    /// The file sits inside the reserved output directory and was ignored.
    Skipped,
    /// No diagrams were found.
    NoDiagrams,
}

/// Summary of processing one input file.
#[derive(Debug)]
pub struct FileReport {
    status: FileStatus,
    diagrams: usize,
    fixed: usize,
    written: Vec<PathBuf>,
    rendered: Vec<PathBuf>,
    write_failures: Vec<(PathBuf, std::io::Error)>,
    render_failures: Vec<(PathBuf, RenderError)>,
}

impl FileReport {
    fn new(status: FileStatus) -> Self {
        Self {
            status,
            diagrams: 0,
            fixed: 0,
            written: Vec::new(),
            rendered: Vec::new(),
            write_failures: Vec::new(),
            render_failures: Vec::new(),
        }
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    /// Number of diagrams found in the file.
    pub fn diagrams(&self) -> usize {
        self.diagrams
    }

    /// Number of diagrams that needed auto-fixing.
    pub fn fixed(&self) -> usize {
        self.fixed
    }

    /// `.mmd` files written, in diagram order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Images produced by the renderer.
    pub fn rendered(&self) -> &[PathBuf] {
        &self.rendered
    }

    pub fn write_failures(&self) -> &[(PathBuf, std::io::Error)] {
        &self.write_failures
    }

    pub fn render_failures(&self) -> &[(PathBuf, RenderError)] {
        &self.render_failures
    }
}

/// Extracts diagrams from files and writes them out.
///
/// # Examples
///
/// ```rust,no_run
/// use mermex::{DirectSource, Pipeline, output::{OutputFormat, OutputTarget}};
///
/// let target = OutputTarget::new(".", vec![OutputFormat::Mmd]);
/// let pipeline = Pipeline::new(target);
///
/// let report = pipeline
///     .process_file("README.md", &DirectSource)
///     .expect("Failed to read input");
/// println!("{} diagram(s) written", report.written().len());
/// ```
pub struct Pipeline {
    target: OutputTarget,
    renderer: Box<dyn Renderer>,
}

impl Pipeline {
    /// Create a pipeline rendering through the default `mmdc` command.
    pub fn new(target: OutputTarget) -> Self {
        Self {
            target,
            renderer: Box::new(CommandRenderer::default()),
        }
    }

    /// Use a different renderer for image formats.
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Check that image output can be produced.
    ///
    /// # Errors
    ///
    /// Returns [`MermexError::RendererUnavailable`] when image formats were
    /// requested and the renderer cannot be launched.
    pub fn ensure_renderer(&self) -> Result<(), MermexError> {
        if self.target.requires_renderer() && !self.renderer.is_available() {
            return Err(MermexError::RendererUnavailable {
                command: self.renderer.name().to_string(),
            });
        }
        Ok(())
    }

    /// Extract, normalize, write and convert every diagram in `path`.
    ///
    /// Write and conversion failures are logged and recorded in the report;
    /// they do not stop the remaining diagrams.
    ///
    /// # Errors
    ///
    /// Returns [`MermexError::Input`] when the file cannot be read.
    pub fn process_file(
        &self,
        path: impl AsRef<Path>,
        source: &dyn TextSource,
    ) -> Result<FileReport, MermexError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(), source = source.name(); "Processing file");

        if output::is_reserved_source(path) {
            warn!(
                path = path.display().to_string();
                "Skipping file inside the `{}` output directory", output::SOURCE_DIR
            );
            return Ok(FileReport::new(FileStatus::Skipped));
        }

        let raw =
            fs::read_to_string(path).map_err(|err| MermexError::new_input_error(path, err))?;
        let raw = normalize_newlines(&raw);

        let result = extract::extract(source, &raw);
        for diagnostic in result.diagnostics() {
            diagnostic.log();
        }

        if result.is_empty() {
            info!(path = path.display().to_string(); "No Mermaid diagrams found");
            return Ok(FileReport::new(FileStatus::NoDiagrams));
        }

        let report = self.emit(&result, &output::file_stem(path));
        info!(
            written = report.written.len(),
            found = report.diagrams;
            "Processed {} Mermaid diagram(s)", report.written.len()
        );
        Ok(report)
    }

    fn emit(&self, result: &ExtractionResult, stem: &str) -> FileReport {
        let mut report = FileReport::new(FileStatus::Processed);
        report.diagrams = result.len();
        let converter = Converter::new(&self.target, &*self.renderer);

        for diagram in result.diagrams() {
            let ordinal = diagram.block().ordinal();
            let normalized = diagram.normalized();

            if normalized.was_fixed() {
                report.fixed += 1;
                warn!(ordinal, kind:% = diagram.block().kind(); "Diagram {ordinal} has syntax issues");
                for diagnostic in normalized.diagnostics() {
                    diagnostic.log();
                }
            }

            if self.target.validate_only() {
                if !normalized.was_fixed() {
                    info!(ordinal, kind:% = diagram.block().kind(); "Diagram {ordinal} syntax OK");
                }
                continue;
            }

            if normalized.was_fixed() {
                info!(ordinal; "Applying automatic fixes");
            }

            let mmd_path = self.target.diagram_path(stem, ordinal, result.len());
            if let Err(err) = output::write_diagram(&mmd_path, normalized.content()) {
                error!(path = mmd_path.display().to_string(); "Failed to write diagram: {err}");
                report.write_failures.push((mmd_path, err));
                continue;
            }
            info!(path = mmd_path.display().to_string(); "Saved Mermaid diagram");

            let (rendered, failures) = converter.convert(&mmd_path);
            report.rendered.extend(rendered);
            report.render_failures.extend(failures);
            report.written.push(mmd_path);
        }

        debug!(fixed = report.fixed; "Diagrams emitted");
        report
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}
