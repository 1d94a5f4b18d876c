use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Target list was empty.")]
    Empty,
    #[error("Invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported scheme '{scheme}' in target URL '{url}'. Use http or https.")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("Failed to read URL file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("URL file '{path}' has a CSV header without a 'url' column.")]
    MissingUrlColumn { path: PathBuf },
    #[error("URL file '{path}' did not contain any URLs.")]
    FileEmpty { path: PathBuf },
}
