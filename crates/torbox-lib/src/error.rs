use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TorboxError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CLI argument validation failed: {details}")]
    CliArgumentValidation { details: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Expected a successful HTTP status from {url}, got: {status}")]
    Remote { status: StatusCode, url: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Directory creation failed at {path}: {reason}")]
    DirectoryCreation { path: PathBuf, reason: String },

    #[error("Remote file name '{name}' does not map to a path inside the output directory")]
    UnsafePath { name: String },

    #[error("Nothing matches '{hint}'")]
    NotFound { hint: String },

    #[error("'{hint}' matches {count} jobs with the same name")]
    AmbiguousSelection { hint: String, count: usize },

    #[error("{count} downloaded files failed checksum verification")]
    ChecksumMismatches { count: usize },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
