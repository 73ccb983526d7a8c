use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.torbox.app/v1/api";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Bearer credential for the remote service
    pub api_key: Option<String>,
    pub api_base_url: String,
    /// Directory that remote file paths are resolved against
    pub output_dir: PathBuf,
    pub transfer: TransferConfig,
    pub selection: SelectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            transfer: TransferConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TransferConfig {
    /// Attempts per file, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failed attempt
    pub backoff_base_ms: u64,
    /// Continue partial files with a byte-range request instead of restarting
    pub resume: bool,
}

impl TransferConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_base_ms: 1000,
            resume: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    pub name_collision: NameCollisionPolicy,
}

/// What to do when an exact name hint matches several jobs.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NameCollisionPolicy {
    #[default]
    FirstMatch,
    Error,
}
