//! Command-line argument definitions for the Mermex CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Both binaries share it, so direct and embedded extraction
//! accept exactly the same flags.

use clap::{Parser, ValueEnum};

use mermex::output::OutputFormat;

/// Output formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Mermaid source files
    Mmd,
    /// SVG images rendered by the external renderer
    Svg,
    /// PNG images rendered by the external renderer
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Mmd => OutputFormat::Mmd,
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

/// Extract Mermaid diagrams from a file into standalone diagram files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input file
    #[arg(help = "Path to the input file containing Mermaid diagrams")]
    pub input: String,

    /// Output formats to produce
    #[arg(long, value_enum, num_args = 1.., default_value = "mmd")]
    pub formats: Vec<FormatArg>,

    /// Base directory for the generated `output/` tree
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Only check diagram syntax, do not write any files
    #[arg(long)]
    pub validate_only: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Requested formats as library [`OutputFormat`]s.
    pub fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.iter().copied().map(OutputFormat::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["mermex", "notes.md"]).expect("Failed to parse args");
        assert_eq!(args.input, "notes.md");
        assert_eq!(args.formats, vec![FormatArg::Mmd]);
        assert_eq!(args.output_dir, ".");
        assert!(!args.validate_only);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_multiple_formats() {
        let args = Args::try_parse_from([
            "mermex",
            "notes.md",
            "--formats",
            "mmd",
            "svg",
            "png",
            "--output-dir",
            "build",
            "--validate-only",
        ])
        .expect("Failed to parse args");

        assert_eq!(
            args.output_formats(),
            vec![OutputFormat::Mmd, OutputFormat::Svg, OutputFormat::Png]
        );
        assert_eq!(args.output_dir, "build");
        assert!(args.validate_only);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Args::try_parse_from(["mermex", "notes.md", "--formats", "pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["mermex"]).is_err());
    }
}
