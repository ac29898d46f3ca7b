//! Error types for devurls operations

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use devurls_core::ParseError;

/// The main error type for devurls operations
///
/// Nothing in the library recovers from these; they propagate to the caller,
/// which for the CLI means a non-zero exit with the message below.
#[derive(Error, Debug)]
pub enum DevUrlsError {
    #[error("Environment variable '{0}' is not set")]
    MissingEnvironmentVariable(String),
    #[error("Invalid workspace URL '{value}': {reason}")]
    InvalidWorkspaceUrl { value: String, reason: String },
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Dotenv error: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Summary references '{0}' but no URL was derived for it")]
    SummaryUrlMissing(String),
    #[error("User interaction error: {0}")]
    InquireError(#[from] inquire::InquireError),
}

/// A type alias for `Result<T, DevUrlsError>`
pub type Result<T> = std::result::Result<T, DevUrlsError>;

impl DevUrlsError {
    /// Attach a path to an I/O error, promoting the two precondition
    /// failures callers care about to their own variants.
    pub(crate) fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DevUrlsError::FileNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => DevUrlsError::PermissionDenied(path.to_path_buf()),
            _ => DevUrlsError::Io(err),
        }
    }
}

impl From<ParseError> for DevUrlsError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(io_err) => DevUrlsError::Io(io_err),
            ParseError::Toml(toml_err) => DevUrlsError::Toml(toml_err),
            ParseError::InvalidUrl { value, reason } => {
                DevUrlsError::InvalidWorkspaceUrl { value, reason }
            }
            ParseError::Validation(msg) => DevUrlsError::InvalidConfig(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_promotes_not_found_and_permission() {
        let path = Path::new("/tmp/.env");

        let err = DevUrlsError::from_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(err, DevUrlsError::FileNotFound(ref p) if p == path));

        let err = DevUrlsError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(err, DevUrlsError::PermissionDenied(ref p) if p == path));

        let err = DevUrlsError::from_io(io::Error::from(io::ErrorKind::InvalidData), path);
        assert!(matches!(err, DevUrlsError::Io(_)));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: DevUrlsError = ParseError::InvalidUrl {
            value: "ftp://x".into(),
            reason: "expected an https:// URL".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid workspace URL 'ftp://x': expected an https:// URL"
        );

        let err: DevUrlsError = ParseError::Validation("bad".into()).into();
        assert!(matches!(err, DevUrlsError::InvalidConfig(ref m) if m == "bad"));
    }

    #[test]
    fn test_prompt_errors_convert() {
        let err: DevUrlsError = inquire::InquireError::OperationCanceled.into();
        assert!(matches!(
            err,
            DevUrlsError::InquireError(inquire::InquireError::OperationCanceled)
        ));
        assert!(err.to_string().starts_with("User interaction error:"));
    }

    #[test]
    fn test_missing_variable_message() {
        let err = DevUrlsError::MissingEnvironmentVariable("GITPOD_WORKSPACE_URL".into());
        assert_eq!(
            err.to_string(),
            "Environment variable 'GITPOD_WORKSPACE_URL' is not set"
        );
    }
}
