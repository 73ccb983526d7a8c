use super::ApiClient;
use super::client::redact_token;
use crate::catalog::Envelope;
use crate::error::TorboxError;
use url::Url;

const REQUEST_DOWNLOAD_PATH: &str = "torrents/requestdl";

/// Exchanges a job/file pair for a short-lived direct download URL.
///
/// The link is only valid for a limited time; it is not cached.
pub async fn resolve_link(client: &ApiClient, job_id: i64, file_id: i64) -> Result<Url, TorboxError> {
    let mut url = client.endpoint(REQUEST_DOWNLOAD_PATH)?;
    url.query_pairs_mut()
        .append_pair("token", client.api_key())
        .append_pair("torrent_id", &job_id.to_string())
        .append_pair("file_id", &file_id.to_string());
    let display_url = redact_token(&url);
    tracing::debug!(url = %display_url, job_id, file_id, "Requesting download link");

    let response = client.send(client.get(url)).await?;
    let body = response.bytes().await?;

    let envelope: Envelope<Option<String>> =
        serde_json::from_slice(&body).map_err(|e| TorboxError::Decode {
            url: display_url.clone(),
            reason: e.to_string(),
        })?;
    let link = envelope.data.ok_or_else(|| TorboxError::Decode {
        url: display_url.clone(),
        reason: format!("no download link in response: {}", envelope.detail),
    })?;

    Url::parse(&link).map_err(|e| TorboxError::Decode {
        url: display_url,
        reason: format!("invalid download link {link}: {e}"),
    })
}
