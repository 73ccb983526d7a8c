use crate::cli::args::Command;
use crate::cli::params::{DownloadMode, DownloadParams, ListParams};
use crate::config::load_config;
use crate::error::TorboxError;
use crate::output::CommandDelimiter;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    List(ListParams),
    Download(DownloadParams),
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, TorboxError> {
    match command {
        Command::List {
            config_path,
            format,
        } => {
            let app_config = load_config(config_path.as_deref())?;
            Ok(ResolvedCommand::List(ListParams { app_config, format }))
        }
        Command::Download {
            config_path,
            hint,
            file_hint,
            output_dir,
            no_download,
            nul_delimited,
            max_attempts,
        } => {
            let mut app_config = load_config(config_path.as_deref())?;

            if let Some(output_dir) = output_dir {
                app_config.output_dir = PathBuf::from(output_dir);
            }
            if let Some(max_attempts) = max_attempts {
                app_config.transfer.max_attempts = max_attempts;
            }
            if app_config.transfer.max_attempts == 0 {
                return Err(TorboxError::CliArgumentValidation {
                    details: "max-attempts must be greater than 0.".to_string(),
                });
            }

            let mode = if nul_delimited {
                DownloadMode::EmitCommands(CommandDelimiter::Nul)
            } else if no_download {
                DownloadMode::EmitCommands(CommandDelimiter::Newline)
            } else {
                DownloadMode::Transfer
            };

            Ok(ResolvedCommand::Download(DownloadParams {
                app_config,
                hint: hint.filter(|hint| !hint.is_empty()),
                file_hint: file_hint.filter(|hint| !hint.is_empty()),
                mode,
            }))
        }
    }
}
