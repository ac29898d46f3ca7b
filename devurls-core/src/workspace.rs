use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// A validated workspace base URL such as `https://abcd1234.gitpod.io`.
///
/// The text after the scheme is kept verbatim, so deriving a URL only ever
/// prepends a port token to exactly what the environment provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceUrl {
    raw: String,
    host: String,
}

impl WorkspaceUrl {
    /// Parse a workspace URL.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidUrl` when the value is not a URL, is not
    /// `https`, or has no host.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let trimmed = value.trim();
        let invalid = |reason: String| ParseError::InvalidUrl {
            value: value.to_string(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
        if parsed.scheme() != "https" {
            return Err(invalid(format!(
                "expected an https:// URL, got scheme '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        let host = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?;

        Ok(Self {
            raw: trimmed.to_string(),
            host: host.to_string(),
        })
    }

    /// Everything after `https://`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the URL a dev server on `rule.port` is published under.
    pub fn derive(&self, rule: &UrlRule) -> DerivedUrl {
        DerivedUrl {
            key: rule.key.clone(),
            url: format!("https://{}-{}", rule.port, self.host),
        }
    }
}

impl fmt::Display for WorkspaceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Maps an env key to the workspace port whose URL it should hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRule {
    pub key: String,
    pub port: u16,
}

impl UrlRule {
    pub fn new(key: impl Into<String>, port: u16) -> Self {
        Self {
            key: key.into(),
            port,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ParseError> {
        if !is_env_identifier(&self.key) {
            return Err(ParseError::Validation(format!(
                "'{}' is not a valid environment variable name",
                self.key
            )));
        }
        if self.port == 0 {
            return Err(ParseError::Validation(format!(
                "Port for '{}' must be non-zero",
                self.key
            )));
        }
        Ok(())
    }
}

fn is_env_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A URL derived from the workspace URL, paired with the env key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedUrl {
    pub key: String,
    pub url: String,
}

impl DerivedUrl {
    /// The `KEY=VALUE` line written to the env file.
    pub fn entry(&self) -> String {
        format!("{}={}", self.key, self.url)
    }
}

impl fmt::Display for DerivedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.url)
    }
}
