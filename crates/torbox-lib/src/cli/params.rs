use crate::config::Config;
use crate::output::{CommandDelimiter, ListingFormat};

#[derive(Debug, Clone)]
pub struct ListParams {
    pub app_config: Config,
    pub format: ListingFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Transfer,
    /// Resolve links but only print the commands that would download them
    EmitCommands(CommandDelimiter),
}

#[derive(Debug, Clone)]
pub struct DownloadParams {
    pub app_config: Config,
    pub hint: Option<String>,
    pub file_hint: Option<String>,
    pub mode: DownloadMode,
}
