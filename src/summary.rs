//! The human-readable login summary written next to the env file.

use crate::{DevUrlsError, Result};
use devurls_core::{DerivedUrl, SummaryConfig};
use std::fs;
use std::path::Path;
use tracing::debug;

/// The admin interface URL: the `url_key` URL with `admin_path` appended.
pub fn admin_url(config: &SummaryConfig, urls: &[DerivedUrl]) -> Result<String> {
    let base = urls
        .iter()
        .find(|url| url.key == config.url_key)
        .ok_or_else(|| DevUrlsError::SummaryUrlMissing(config.url_key.clone()))?;
    Ok(format!("{}{}", base.url, config.admin_path))
}

/// Render the summary text.
pub fn render_summary(config: &SummaryConfig, urls: &[DerivedUrl]) -> Result<String> {
    let admin = admin_url(config, urls)?;

    let mut output = String::new();
    output.push_str(&format!("Admin interface: {}\n", admin));
    if !config.instructions.is_empty() {
        output.push('\n');
        output.push_str(config.instructions.trim_end());
        output.push('\n');
    }
    Ok(output)
}

/// Replace the contents of the summary file with `text`.
pub fn write_summary(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| DevUrlsError::from_io(e, path))?;
    debug!(path = %path.display(), "wrote summary file");
    Ok(())
}
