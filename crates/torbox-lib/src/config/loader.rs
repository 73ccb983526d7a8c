use super::Config;
use crate::error::TorboxError;
use config::{Config as ConfigBuilder, Environment, File};

/// Looked up (without extension) in the working directory when no file is given.
pub const DEFAULT_CONFIG_NAME: &str = "torbox";

pub const ENV_PREFIX: &str = "TORBOX";

/// Layers serde defaults, the config file and `TORBOX_*` environment variables.
///
/// An explicitly named file must exist; the default one is optional.
pub fn load_config(config_path: Option<&str>) -> Result<Config, TorboxError> {
    let file = match config_path {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let config_builder = ConfigBuilder::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config_builder.try_deserialize().map_err(Into::into)
}
