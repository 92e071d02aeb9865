//! Output layout and `.mmd` file persistence.
//!
//! Everything is written below `<base>/output/`:
//!
//! ```text
//! <base>/output/mmd/<stem>[_NN].mmd
//! <base>/output/svg/<stem>[_NN].svg
//! <base>/output/png/<stem>[_NN].png
//! ```

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use log::debug;

/// Name of the directory holding all generated files.
pub const OUTPUT_DIR: &str = "output";

/// Name of the directory holding extracted `.mmd` sources.
///
/// Input files whose parent directory has this name are skipped, so a
/// previous run's output is never fed back in.
pub const SOURCE_DIR: &str = "mmd";

/// A requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    /// Mermaid source (`.mmd`).
    Mmd,
    /// Vector image rendered by the external renderer.
    Svg,
    /// Raster image rendered by the external renderer.
    Png,
}

impl OutputFormat {
    /// File extension, which doubles as the output subdirectory name.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mmd => "mmd",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }

    /// `true` for formats produced by the external renderer.
    pub fn is_image(&self) -> bool {
        !matches!(self, OutputFormat::Mmd)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Where and how extracted diagrams are written.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    base_dir: PathBuf,
    formats: Vec<OutputFormat>,
    validate_only: bool,
}

impl Default for OutputTarget {
    fn default() -> Self {
        Self::new(".", vec![OutputFormat::Mmd])
    }
}

impl OutputTarget {
    /// Create a target below `base_dir`.
    ///
    /// Duplicate formats are dropped while keeping the requested order.
    pub fn new(base_dir: impl Into<PathBuf>, formats: Vec<OutputFormat>) -> Self {
        let mut unique = Vec::with_capacity(formats.len());
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }

        Self {
            base_dir: base_dir.into(),
            formats: unique,
            validate_only: false,
        }
    }

    /// Only report diagnostics, never write files.
    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    pub fn validate_only(&self) -> bool {
        self.validate_only
    }

    pub fn formats(&self) -> &[OutputFormat] {
        &self.formats
    }

    /// Requested formats that need the external renderer.
    pub fn image_formats(&self) -> impl Iterator<Item = OutputFormat> + '_ {
        self.formats.iter().copied().filter(OutputFormat::is_image)
    }

    /// `true` when image formats were requested.
    ///
    /// This holds in validate-only mode too, so a missing renderer is still
    /// reported before any work is done.
    pub fn requires_renderer(&self) -> bool {
        self.image_formats().next().is_some()
    }

    /// `<base>/output`
    pub fn output_base(&self) -> PathBuf {
        self.base_dir.join(OUTPUT_DIR)
    }

    /// `<base>/output/mmd`
    pub fn source_dir(&self) -> PathBuf {
        self.output_base().join(SOURCE_DIR)
    }

    /// Path of the `.mmd` file for a diagram.
    ///
    /// The `_NN` suffix is only added when the source file produced more than
    /// one diagram.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::path::Path;
    /// # use mermex::output::{OutputFormat, OutputTarget};
    /// let target = OutputTarget::new("out", vec![OutputFormat::Mmd]);
    /// assert_eq!(
    ///     target.diagram_path("notes", 1, 1),
    ///     Path::new("out/output/mmd/notes.mmd")
    /// );
    /// assert_eq!(
    ///     target.diagram_path("notes", 2, 3),
    ///     Path::new("out/output/mmd/notes_02.mmd")
    /// );
    /// ```
    pub fn diagram_path(&self, stem: &str, ordinal: usize, total: usize) -> PathBuf {
        let file_name = if total > 1 {
            format!("{stem}_{ordinal:02}.{}", SOURCE_DIR)
        } else {
            format!("{stem}.{}", SOURCE_DIR)
        };
        self.source_dir().join(file_name)
    }

    /// Path of the rendered image for an already written `.mmd` file.
    pub fn image_path(&self, mmd_path: &Path, format: OutputFormat) -> PathBuf {
        let stem = file_stem(mmd_path);
        self.output_base()
            .join(format.extension())
            .join(format!("{stem}.{}", format.extension()))
    }
}

/// The input file name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `true` when `path` lives directly inside a directory named [`SOURCE_DIR`].
pub fn is_reserved_source(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|name| name == SOURCE_DIR)
}

/// Write trimmed diagram text to `path`, creating parent directories and
/// replacing any existing file.
///
/// # Errors
///
/// Returns the underlying I/O error when the directory or file cannot be
/// written.
pub fn write_diagram(path: &Path, content: &str) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, content.trim())?;
    debug!(path = path.display().to_string(); "Diagram written");
    Ok(())
}
