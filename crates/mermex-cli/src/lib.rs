//! CLI logic for the Mermex diagram extractor.
//!
//! Two binaries share this crate. `mermex` reads Markdown or raw Mermaid
//! files, `mermex-js` reads HTML pages whose content is embedded in a script
//! payload. Each binary only chooses its [`TextSource`]; argument handling,
//! logging and error reporting live here.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, FormatArg};

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use mermex::{
    FileReport, MermexError, Pipeline, TextSource, output::OutputTarget, render::CommandRenderer,
};

use error_adapter::to_reportable;

/// Run the Mermex CLI application
///
/// This function processes the input file through the extraction pipeline
/// and writes diagrams below `<output-dir>/output/`.
///
/// # Arguments
///
/// * `args` - Command-line arguments
/// * `source` - Strategy locating diagram text in the input file
///
/// # Returns
///
/// The report for the input file, or `None` when it could not be read.
/// An unreadable input is logged rather than returned as an error.
///
/// # Errors
///
/// Returns `MermexError` for:
/// - Configuration loading errors
/// - A missing renderer when image formats were requested
pub fn run(args: &Args, source: &dyn TextSource) -> Result<Option<FileReport>, MermexError> {
    info!(
        input_path = args.input,
        output_dir = args.output_dir;
        "Processing input"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let target = OutputTarget::new(&args.output_dir, args.output_formats())
        .with_validate_only(args.validate_only);
    let renderer = CommandRenderer::from_config(app_config.renderer());
    let pipeline = Pipeline::new(target).with_renderer(Box::new(renderer));

    pipeline.ensure_renderer()?;

    match pipeline.process_file(&args.input, source) {
        Ok(report) => Ok(Some(report)),
        Err(err @ MermexError::Input { .. }) => {
            error!("{err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Entry point shared by the binaries.
///
/// Parses arguments, initializes logging, and exits with status 1 when
/// [`run`] fails.
pub fn main_with(source: &dyn TextSource) {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?, source = source.name(); "Starting Mermex");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = run(&args, source) {
        let reporter = miette::GraphicalReportHandler::new();
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, &to_reportable(&err))
            .expect("Writing to String buffer is infallible");

        error!("{writer}");
        process::exit(1);
    }

    info!("Completed successfully");
}
