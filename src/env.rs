//! Where the workspace URL is read from.

use crate::{DevUrlsError, Result};
use std::collections::HashMap;
use std::env;

/// A read-only view of environment variables.
///
/// The updater never touches the process environment directly; it is handed
/// an `EnvSource`, so tests and embedders can supply values explicitly.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` if it is unset or not valid unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`EnvSource::var`], but a missing variable is an error.
    fn require(&self, key: &str) -> Result<String> {
        self.var(key)
            .ok_or_else(|| DevUrlsError::MissingEnvironmentVariable(key.to_string()))
    }
}

/// Reads from the environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
