//! Printing derived URLs for shells and other tools, without writing any file.

use crate::Result;
use devurls_core::DerivedUrl;
use serde_json::{Map, Value};

/// Output format of `devurls urls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `KEY=URL`, the same lines the env file receives
    #[default]
    Dotenv,
    /// `export KEY="URL"`, suitable for `eval "$(devurls urls --export)"`
    Shell,
    /// A JSON object mapping keys to URLs
    Json,
}

pub fn format_urls(urls: &[DerivedUrl], format: ExportFormat) -> Result<String> {
    let output = match format {
        ExportFormat::Dotenv => urls
            .iter()
            .map(|url| format!("{}\n", url.entry()))
            .collect(),
        ExportFormat::Shell => urls
            .iter()
            .map(|url| format!("export {}=\"{}\"\n", url.key, shell_escape(&url.url)))
            .collect(),
        ExportFormat::Json => {
            let object: Map<String, Value> = urls
                .iter()
                .map(|url| (url.key.clone(), Value::String(url.url.clone())))
                .collect();
            let mut text = serde_json::to_string_pretty(&Value::Object(object))?;
            text.push('\n');
            text
        }
    };
    Ok(output)
}

// Escape for a double-quoted POSIX shell string
fn shell_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
