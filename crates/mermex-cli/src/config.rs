//! Configuration file discovery and loading for the CLI.
//!
//! A run uses at most one `config.toml`. The first existing candidate wins:
//! the `--config` path, then `mermex/config.toml` in the working directory,
//! then the platform config directory. Without any of them the built-in
//! defaults apply.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use mermex::{MermexError, config::AppConfig};

/// Path of the project-local configuration file.
const LOCAL_CONFIG: &str = "mermex/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Validation { path: PathBuf, message: String },
}

impl From<ConfigError> for MermexError {
    fn from(err: ConfigError) -> Self {
        MermexError::Config(err.to_string())
    }
}

/// Where the configuration file in use was found.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigLocation {
    /// Named with `--config`; it must exist.
    Explicit(PathBuf),
    Local(PathBuf),
    System(PathBuf),
}

impl ConfigLocation {
    fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(path)
            | ConfigLocation::Local(path)
            | ConfigLocation::System(path) => path,
        }
    }
}

impl fmt::Display for ConfigLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLocation::Explicit(_) => write!(f, "explicit"),
            ConfigLocation::Local(_) => write!(f, "local"),
            ConfigLocation::System(_) => write!(f, "system"),
        }
    }
}

/// Pick the configuration file for this run, if any.
fn discover(explicit_path: Option<&Path>) -> Option<ConfigLocation> {
    if let Some(path) = explicit_path {
        return Some(ConfigLocation::Explicit(path.to_path_buf()));
    }

    let local = Path::new(LOCAL_CONFIG);
    if local.exists() {
        return Some(ConfigLocation::Local(local.to_path_buf()));
    }

    let Some(dirs) = ProjectDirs::from("com", "mermex", "mermex") else {
        debug!("Could not determine platform-specific config directory");
        return None;
    };

    let system = dirs.config_dir().join("config.toml");
    if system.exists() {
        Some(ConfigLocation::System(system))
    } else {
        debug!(path = system.display().to_string(); "System configuration file not found");
        None
    }
}

/// Load the configuration for this run.
///
/// # Errors
///
/// Returns `MermexError::Config` when an explicit path does not exist, or
/// when the chosen file cannot be read, parsed or validated.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MermexError> {
    let Some(location) = discover(explicit_path.as_ref().map(|path| path.as_ref())) else {
        debug!("No configuration file found, using default configuration");
        return Ok(AppConfig::default());
    };

    let path = location.path();
    info!(
        origin:% = location,
        path = path.display().to_string();
        "Loading configuration"
    );

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let config = read_config(path)?;
    validate(&config, path)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn validate(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if config.renderer().command().trim().is_empty() {
        return Err(ConfigError::Validation {
            path: path.to_path_buf(),
            message: "`renderer.command` must not be empty".to_string(),
        });
    }
    Ok(())
}
