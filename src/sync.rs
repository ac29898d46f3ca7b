//! The updater: derive workspace URLs and record them in the env file once.

use crate::env::EnvSource;
use crate::envfile::EnvFile;
use crate::summary;
use crate::{DevUrlsError, Result};
use devurls_core::{Config, DerivedUrl, WorkspaceUrl};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// What happened to the env file during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvFileOutcome {
    /// The sentinel was missing; every derived entry was appended.
    Appended,
    /// The sentinel was already there; the file was not written.
    AlreadyPresent,
}

/// The result of one updater run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub workspace_url: String,
    pub urls: Vec<DerivedUrl>,
    /// The key whose presence decided the outcome.
    pub sentinel: String,
    pub env_file: PathBuf,
    pub outcome: EnvFileOutcome,
    /// Set when the summary file was (re)written.
    pub summary: Option<PathBuf>,
    /// Whether the env file had to be created first.
    pub created_env_file: bool,
}

/// Synchronises derived workspace URLs into an env file.
#[derive(Debug, Clone)]
pub struct Updater {
    config: Config,
}

impl Updater {
    /// Creates an updater, validating the configuration first.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Look up and parse the workspace URL from `env`.
    ///
    /// No file is touched here, so a missing variable fails the run before
    /// any I/O happens.
    pub fn workspace_url(&self, env: &dyn EnvSource) -> Result<WorkspaceUrl> {
        let raw = env.require(&self.config.workspace.env_var)?;
        debug!(var = %self.config.workspace.env_var, "read workspace URL");
        Ok(WorkspaceUrl::parse(&raw)?)
    }

    /// Derive every configured URL without touching any file.
    pub fn derive(&self, env: &dyn EnvSource) -> Result<Vec<DerivedUrl>> {
        let workspace = self.workspace_url(env)?;
        Ok(self.config.derive_all(&workspace))
    }

    /// Read the workspace URL from `env`, then [`Updater::sync`].
    pub fn run(&self, env: &dyn EnvSource) -> Result<SyncReport> {
        let workspace = self.workspace_url(env)?;
        self.sync(&workspace)
    }

    /// Record the URLs derived from `workspace` in the env file.
    ///
    /// The file is scanned once for the sentinel key. If it is found nothing
    /// is written; otherwise one line per rule is appended. The summary file,
    /// when enabled, is rewritten on every call either way.
    pub fn sync(&self, workspace: &WorkspaceUrl) -> Result<SyncReport> {
        let urls = self.config.derive_all(workspace);
        let sentinel = self
            .config
            .sentinel_key()
            .ok_or_else(|| DevUrlsError::InvalidConfig("no URL rules configured".into()))?;

        let env_file = EnvFile::new(&self.config.env_file.path);
        let created_env_file = if self.config.env_file.create_missing {
            env_file.ensure_exists()?
        } else {
            false
        };

        let outcome = if env_file.contains(self.config.env_file.detection, sentinel)? {
            info!(
                key = sentinel,
                path = %env_file.path().display(),
                "entry already present, not modifying env file"
            );
            EnvFileOutcome::AlreadyPresent
        } else {
            env_file.append(&urls)?;
            info!(
                entries = urls.len(),
                path = %env_file.path().display(),
                "appended derived URLs to env file"
            );
            EnvFileOutcome::Appended
        };

        let summary = if self.config.summary.enabled {
            let text = summary::render_summary(&self.config.summary, &urls)?;
            summary::write_summary(&self.config.summary.path, &text)?;
            Some(self.config.summary.path.clone())
        } else {
            None
        };

        Ok(SyncReport {
            workspace_url: workspace.to_string(),
            urls,
            sentinel: sentinel.to_string(),
            env_file: env_file.path().to_path_buf(),
            outcome,
            summary,
            created_env_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devurls_core::{Detection, UrlRule};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.env_file.path = dir.path().join(".env");
        config.summary.path = dir.path().join("admin-login.txt");
        config
    }

    fn workspace_env(url: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("GITPOD_WORKSPACE_URL".to_string(), url.to_string());
        vars
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = Config {
            urls: vec![],
            ..Config::default()
        };
        assert!(matches!(
            Updater::new(config),
            Err(DevUrlsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_derive_does_not_need_env_file() {
        let updater = Updater::new(Config::default()).unwrap();
        let urls = updater
            .derive(&workspace_env("https://abcd1234.gitpod.io"))
            .unwrap();
        assert_eq!(
            urls.iter().map(|u| u.entry()).collect::<Vec<_>>(),
            vec![
                "WEBPACK_DEV_URL=https://8090-abcd1234.gitpod.io",
                "BAKED_BASE_URL=https://3030-abcd1234.gitpod.io",
            ]
        );
    }

    #[test]
    fn test_sync_appends_then_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_in(&temp_dir);
        fs::write(&config.env_file.path, "").unwrap();

        let updater = Updater::new(config.clone()).unwrap();
        let workspace = WorkspaceUrl::parse("https://abcd1234.gitpod.io").unwrap();

        let first = updater.sync(&workspace).unwrap();
        assert_eq!(first.outcome, EnvFileOutcome::Appended);
        assert_eq!(first.sentinel, "WEBPACK_DEV_URL");
        assert!(!first.created_env_file);
        assert_eq!(first.summary, None);

        let second = updater.sync(&workspace).unwrap();
        assert_eq!(second.outcome, EnvFileOutcome::AlreadyPresent);

        assert_eq!(
            fs::read_to_string(&config.env_file.path).unwrap(),
            "\nWEBPACK_DEV_URL=https://8090-abcd1234.gitpod.io\nBAKED_BASE_URL=https://3030-abcd1234.gitpod.io"
        );
        assert!(!config.summary.path.exists());
    }

    #[test]
    fn test_custom_rules_use_first_key_as_sentinel() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.urls = vec![UrlRule::new("API_URL", 4000), UrlRule::new("DOCS_URL", 4001)];
        // The second key being present does not stop the append
        fs::write(&config.env_file.path, "DOCS_URL=elsewhere").unwrap();

        let updater = Updater::new(config.clone()).unwrap();
        let report = updater.run(&workspace_env("https://w.example.dev")).unwrap();

        assert_eq!(report.outcome, EnvFileOutcome::Appended);
        assert_eq!(report.sentinel, "API_URL");
        assert_eq!(
            fs::read_to_string(&config.env_file.path).unwrap(),
            "DOCS_URL=elsewhere\nAPI_URL=https://4000-w.example.dev\nDOCS_URL=https://4001-w.example.dev"
        );
    }

    #[test]
    fn test_key_detection_ignores_commented_sentinel() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.env_file.detection = Detection::Key;
        fs::write(&config.env_file.path, "# WEBPACK_DEV_URL=old\n").unwrap();

        let updater = Updater::new(config).unwrap();
        let report = updater.run(&workspace_env("https://abcd.gitpod.io")).unwrap();
        assert_eq!(report.outcome, EnvFileOutcome::Appended);
    }

    #[test]
    fn test_create_missing_env_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.env_file.create_missing = true;

        let updater = Updater::new(config.clone()).unwrap();
        let report = updater.run(&workspace_env("https://abcd.gitpod.io")).unwrap();

        assert!(report.created_env_file);
        assert_eq!(report.outcome, EnvFileOutcome::Appended);
        assert!(
            fs::read_to_string(&config.env_file.path)
                .unwrap()
                .starts_with("\nWEBPACK_DEV_URL=")
        );
    }

    #[test]
    fn test_summary_written_on_every_run() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_in(&temp_dir);
        config.summary.enabled = true;
        fs::write(&config.env_file.path, "").unwrap();
        fs::write(&config.summary.path, "stale contents that must disappear").unwrap();

        let updater = Updater::new(config.clone()).unwrap();
        let env = workspace_env("https://abcd.gitpod.io");

        let first = updater.run(&env).unwrap();
        assert_eq!(first.summary.as_deref(), Some(config.summary.path.as_path()));
        let text = fs::read_to_string(&config.summary.path).unwrap();
        assert!(text.starts_with("Admin interface: https://3030-abcd.gitpod.io/admin\n"));
        assert!(!text.contains("stale"));

        fs::remove_file(&config.summary.path).unwrap();
        let second = updater.run(&env).unwrap();
        assert_eq!(second.outcome, EnvFileOutcome::AlreadyPresent);
        assert!(config.summary.path.exists());
    }
}
