mod client;
mod fetch_catalog;
mod resolve_link;

pub use client::ApiClient;
pub(crate) use client::redact_token;
pub use fetch_catalog::fetch_catalog;
pub use resolve_link::resolve_link;
