//! Locating, loading and saving `devurls` configuration.
//!
//! The first source that exists wins; sources are never merged:
//!
//! 1. an explicit path (`--config`)
//! 2. `devurls.toml` in the project directory
//! 3. the user config, typically `~/.config/devurls/config.toml`
//! 4. built-in defaults
//!
//! Command-line flags are applied on top with [`ConfigOverrides`].

use crate::{DevUrlsError, Result};
use devurls_core::{Config, Detection, PROJECT_CONFIG_FILE};
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    User(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::Project(path) => write!(f, "{} (project)", path.display()),
            ConfigSource::User(path) => write!(f, "{} (user)", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A configuration together with the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Get the path to the user's configuration file.
///
/// Returns the platform-specific configuration directory path for devurls,
/// typically ~/.config/devurls/config.toml on Unix systems.
pub fn user_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "devurls").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
    })?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Path of the project configuration file inside `project_dir`.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_CONFIG_FILE)
}

/// Resolve the effective configuration.
///
/// `user_path` is the user config location; pass `None` when it cannot be
/// determined.
///
/// # Errors
///
/// An explicit path that does not exist is `FileNotFound`. Any file that is
/// found but fails to parse or validate is an error as well.
pub fn load_config(
    explicit: Option<&Path>,
    project_dir: &Path,
    user_path: Option<&Path>,
) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(DevUrlsError::FileNotFound(path.to_path_buf()));
        }
        return read(path, ConfigSource::Explicit(path.to_path_buf()));
    }

    let project = project_config_path(project_dir);
    if project.exists() {
        return read(&project, ConfigSource::Project(project.clone()));
    }

    if let Some(user) = user_path.filter(|p| p.exists()) {
        return read(user, ConfigSource::User(user.to_path_buf()));
    }

    debug!("no configuration file found, using defaults");
    Ok(LoadedConfig {
        config: Config::default(),
        source: ConfigSource::Defaults,
    })
}

fn read(path: &Path, source: ConfigSource) -> Result<LoadedConfig> {
    debug!(path = %path.display(), "loading configuration");
    let config = Config::try_from(path)?;
    Ok(LoadedConfig { config, source })
}

/// Save a configuration to disk, creating parent directories if necessary.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    config.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| DevUrlsError::from_io(e, path))?;
    Ok(())
}

/// Values given on the command line, applied over the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub env_var: Option<String>,
    pub env_file: Option<PathBuf>,
    pub detection: Option<Detection>,
    pub summary: Option<bool>,
    pub summary_path: Option<PathBuf>,
    pub create_missing: bool,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(env_var) = self.env_var {
            config.workspace.env_var = env_var;
        }
        if let Some(path) = self.env_file {
            config.env_file.path = path;
        }
        if let Some(detection) = self.detection {
            config.env_file.detection = detection;
        }
        if let Some(enabled) = self.summary {
            config.summary.enabled = enabled;
        }
        if let Some(path) = self.summary_path {
            config.summary.path = path;
        }
        if self.create_missing {
            config.env_file.create_missing = true;
        }
    }
}
