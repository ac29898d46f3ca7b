//! # devurls Core
//!
//! This crate provides the core type definitions and parsing logic for devurls.
//!
//! devurls derives the public URLs of dev servers running inside a cloud
//! workspace (for example a Gitpod workspace) and records them in a project's
//! `.env` file. Everything in this crate is pure: no environment access and no
//! env file I/O happen here, which keeps derivation and validation easy to test.
//!
//! ## Configuration Structure
//!
//! A `devurls.toml` file is optional. Every section has defaults, so an empty
//! file behaves exactly like no file at all:
//!
//! ```toml
//! [workspace]
//! env_var = "GITPOD_WORKSPACE_URL"
//!
//! [env_file]
//! path = ".env"
//! detection = "substring"
//!
//! [[urls]]
//! key = "WEBPACK_DEV_URL"
//! port = 8090
//!
//! [[urls]]
//! key = "BAKED_BASE_URL"
//! port = 3030
//!
//! [summary]
//! enabled = true
//! path = "admin-login.txt"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod workspace;

pub use workspace::{DerivedUrl, UrlRule, WorkspaceUrl};

/// Environment variable holding the workspace URL when nothing else is configured.
pub const DEFAULT_WORKSPACE_VAR: &str = "GITPOD_WORKSPACE_URL";

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILE: &str = "devurls.toml";

/// The root configuration structure for devurls.
///
/// This represents the entire `devurls.toml` file. Missing sections fall back
/// to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the workspace URL comes from
    pub workspace: WorkspaceConfig,
    /// The env file that receives the derived URLs
    pub env_file: EnvFileConfig,
    /// Derivation rules, in the order their entries are appended.
    /// The first rule's key is the sentinel that decides whether to append.
    pub urls: Vec<UrlRule>,
    /// Optional human-readable login summary
    pub summary: SummaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig::default(),
            env_file: EnvFileConfig::default(),
            urls: vec![
                UrlRule::new("WEBPACK_DEV_URL", 8090),
                UrlRule::new("BAKED_BASE_URL", 3030),
            ],
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Ensures that:
    /// - At least one URL rule is defined
    /// - Rule keys are valid env identifiers and unique
    /// - Ports are non-zero
    /// - The summary references an existing rule when enabled
    ///
    /// # Errors
    ///
    /// Returns a `ParseError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.workspace.env_var.is_empty() {
            return Err(ParseError::Validation(
                "workspace.env_var cannot be empty".into(),
            ));
        }

        if self.urls.is_empty() {
            return Err(ParseError::Validation(
                "At least one [[urls]] rule must be defined".into(),
            ));
        }

        let mut seen = HashSet::new();
        for rule in &self.urls {
            rule.validate()?;
            if !seen.insert(rule.key.as_str()) {
                return Err(ParseError::Validation(format!(
                    "Duplicate URL key '{}'",
                    rule.key
                )));
            }
        }

        if self.summary.enabled && self.rule(&self.summary.url_key).is_none() {
            return Err(ParseError::Validation(format!(
                "summary.url_key '{}' does not match any [[urls]] rule",
                self.summary.url_key
            )));
        }

        if !self.summary.admin_path.is_empty() && !self.summary.admin_path.starts_with('/') {
            return Err(ParseError::Validation(format!(
                "summary.admin_path '{}' must start with '/'",
                self.summary.admin_path
            )));
        }

        Ok(())
    }

    /// The key whose presence in the env file means the URLs were already recorded.
    pub fn sentinel_key(&self) -> Option<&str> {
        self.urls.first().map(|rule| rule.key.as_str())
    }

    /// Get a rule by key.
    pub fn rule(&self, key: &str) -> Option<&UrlRule> {
        self.urls.iter().find(|rule| rule.key == key)
    }

    /// Derive every configured URL from the workspace URL, in rule order.
    pub fn derive_all(&self, workspace: &WorkspaceUrl) -> Vec<DerivedUrl> {
        self.urls.iter().map(|rule| workspace.derive(rule)).collect()
    }
}

impl FromStr for Config {
    type Err = ParseError;

    /// Parse and validate configuration from a TOML string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&Path> for Config {
    type Error = ParseError;

    /// Load and validate configuration from a file path.
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParseError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;
        content.parse()
    }
}

/// Source of the workspace URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Name of the environment variable holding the workspace URL
    pub env_var: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_WORKSPACE_VAR.to_string(),
        }
    }
}

/// Env file location and update behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvFileConfig {
    /// Path of the env file, relative to the working directory
    pub path: PathBuf,
    /// How an existing entry is recognised
    pub detection: Detection,
    /// Create an empty env file when it does not exist yet
    pub create_missing: bool,
}

impl Default for EnvFileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".env"),
            detection: Detection::default(),
            create_missing: false,
        }
    }
}

/// How the updater decides that the env file already holds the derived URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detection {
    /// Any line containing the sentinel key text counts, comments included.
    #[default]
    Substring,
    /// Only a parsed `KEY=VALUE` entry with exactly the sentinel key counts.
    Key,
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Substring => write!(f, "substring"),
            Detection::Key => write!(f, "key"),
        }
    }
}

impl FromStr for Detection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Detection::Substring),
            "key" => Ok(Detection::Key),
            other => Err(ParseError::Validation(format!(
                "Unknown detection mode '{}'. Expected 'substring' or 'key'",
                other
            ))),
        }
    }
}

/// Settings for the human-readable login summary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Write the summary file on every run
    pub enabled: bool,
    /// Path of the summary file; overwritten wholesale
    pub path: PathBuf,
    /// Rule key whose derived URL hosts the admin interface
    pub url_key: String,
    /// Path appended to that URL to reach the admin interface
    pub admin_path: String,
    /// Free-form instructions written below the admin URL
    pub instructions: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("admin-login.txt"),
            url_key: "BAKED_BASE_URL".to_string(),
            admin_path: "/admin".to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

const DEFAULT_INSTRUCTIONS: &str = "\
Log in with the default development account:
  email:    admin@example.com
  password: admin

Change this password before sharing the workspace.";

/// Errors produced while parsing or validating configuration and URLs.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error when reading configuration files
    Io(io::Error),
    /// TOML parsing error
    Toml(toml::de::Error),
    /// The workspace URL is malformed or not https
    InvalidUrl { value: String, reason: String },
    /// Validation error
    Validation(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "I/O error: {}", e),
            ParseError::Toml(e) => write!(f, "TOML parsing error: {}", e),
            ParseError::InvalidUrl { value, reason } => {
                write!(f, "Invalid workspace URL '{}': {}", value, reason)
            }
            ParseError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl From<toml::de::Error> for ParseError {
    fn from(e: toml::de::Error) -> Self {
        ParseError::Toml(e)
    }
}
