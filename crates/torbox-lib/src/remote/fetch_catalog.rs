use super::ApiClient;
use crate::catalog::{Catalog, CatalogSnapshot};
use crate::error::TorboxError;

const LISTING_PATH: &str = "torrents/mylist";

/// Retrieves the current job listing. A single attempt; any failure is fatal to the caller.
pub async fn fetch_catalog(client: &ApiClient) -> Result<CatalogSnapshot, TorboxError> {
    let url = client.endpoint(LISTING_PATH)?;
    tracing::debug!(url = %url, "Requesting job listing");

    let response = client.send(client.get(url.clone())).await?;
    let raw = response.bytes().await?.to_vec();

    let (catalog, detail) = Catalog::parse(&raw).map_err(|e| TorboxError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!(jobs = catalog.jobs.len(), detail = %detail, "Job listing retrieved");

    Ok(CatalogSnapshot { raw, catalog })
}
