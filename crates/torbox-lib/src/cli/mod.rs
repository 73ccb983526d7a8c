mod args;
mod download;
mod list;
mod params;
mod resolved_command;

pub use args::{Args, Command, parse_args};
pub use download::{DownloadSummary, execute_download, run_download};
pub use list::{run_list, write_list};
pub use params::{DownloadMode, DownloadParams, ListParams};
pub use resolved_command::{ResolvedCommand, resolve_command};

/// Shared HTTP client for API calls and file transfers.
pub fn build_http_client() -> Result<reqwest::Client, crate::error::TorboxError> {
    reqwest::Client::builder()
        .user_agent(concat!("torbox/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Into::into)
}
