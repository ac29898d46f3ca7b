//! # devurls
//!
//! Records the public URLs of a cloud workspace's dev servers in a project's
//! `.env` file.
//!
//! A workspace URL such as `https://abcd1234.gitpod.io` is read from the
//! environment, and each configured port becomes a URL of the form
//! `https://<port>-abcd1234.gitpod.io`. With the default rules that yields:
//!
//! ```text
//! WEBPACK_DEV_URL=https://8090-abcd1234.gitpod.io
//! BAKED_BASE_URL=https://3030-abcd1234.gitpod.io
//! ```
//!
//! The env file is only ever appended to, and only when the first rule's key
//! is not already present, so running the updater on every workspace start is
//! safe.
//!
//! ```no_run
//! use devurls::{Config, ProcessEnv, Updater};
//!
//! let updater = Updater::new(Config::default())?;
//! let report = updater.run(&ProcessEnv)?;
//! println!("{:?}", report.outcome);
//! # Ok::<(), devurls::DevUrlsError>(())
//! ```

pub mod config;
pub mod env;
pub mod envfile;
mod error;
pub mod export;
pub mod logging;
pub mod summary;
pub mod sync;


pub use config::{ConfigOverrides, ConfigSource, LoadedConfig, load_config};
pub use env::{EnvSource, ProcessEnv};
pub use envfile::EnvFile;
pub use error::{DevUrlsError, Result};
pub use export::{ExportFormat, format_urls};
pub use sync::{EnvFileOutcome, SyncReport, Updater};

// Re-export core types for convenience
pub use devurls_core::{
    Config, DerivedUrl, Detection, EnvFileConfig, ParseError, SummaryConfig, UrlRule,
    WorkspaceConfig, WorkspaceUrl,
};
