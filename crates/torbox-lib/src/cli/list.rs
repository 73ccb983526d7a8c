use crate::cli::ListParams;
use crate::cli::build_http_client;
use crate::error::TorboxError;
use crate::output::write_listing;
use crate::remote::{ApiClient, fetch_catalog};
use std::io::Write;

pub async fn run_list(params: ListParams) -> Result<(), TorboxError> {
    write_list(params, &mut std::io::stdout()).await
}

pub async fn write_list(params: ListParams, out: &mut impl Write) -> Result<(), TorboxError> {
    let ListParams { app_config, format } = params;

    let client = ApiClient::new(build_http_client()?, &app_config)?;
    let snapshot = fetch_catalog(&client).await?;
    tracing::debug!("Listing {} torrents", snapshot.catalog.jobs.len());

    write_listing(&snapshot, format, out)?;
    Ok(())
}
