mod loader;
mod model;

pub use loader::{DEFAULT_CONFIG_NAME, ENV_PREFIX, load_config};
pub use model::{Config, DEFAULT_API_BASE_URL, NameCollisionPolicy, SelectionConfig, TransferConfig};
