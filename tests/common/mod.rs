use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test helper: a scratch project directory plus an isolated user config home
pub struct TestFixture {
    _temp_dir: TempDir,
    pub base_path: PathBuf,
    pub config_home: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path().join("project");
        let config_home = temp_dir.path().join("config-home");
        fs::create_dir_all(&base_path).unwrap();
        fs::create_dir_all(&config_home).unwrap();
        Self {
            _temp_dir: temp_dir,
            base_path,
            config_home,
        }
    }

    pub fn env_path(&self) -> PathBuf {
        self.base_path.join(".env")
    }

    pub fn write_env(&self, content: &str) {
        fs::write(self.env_path(), content).unwrap();
    }

    pub fn read_env(&self) -> String {
        fs::read_to_string(self.env_path()).unwrap()
    }

    pub fn write_project_config(&self, content: &str) {
        fs::write(self.base_path.join("devurls.toml"), content).unwrap();
    }

    /// A `devurls` command running in the project directory with a clean environment
    pub fn command(&self, workspace_url: Option<&str>) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_devurls"));
        cmd.current_dir(&self.base_path)
            .env_remove("GITPOD_WORKSPACE_URL")
            .env_remove("DEVURLS_CONFIG")
            .env_remove("RUST_LOG")
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("HOME", &self.config_home)
            .env("NO_COLOR", "1");
        if let Some(url) = workspace_url {
            cmd.env("GITPOD_WORKSPACE_URL", url);
        }
        cmd
    }

    pub fn run(&self, workspace_url: Option<&str>, args: &[&str]) -> Output {
        self.command(workspace_url).args(args).output().unwrap()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
