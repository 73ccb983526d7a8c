use crate::config::Config;
use crate::error::TorboxError;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

/// Authenticated access to the remote service's API endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    pub fn new(http: Client, config: &Config) -> Result<Self, TorboxError> {
        // Keep the trailing slash so `join` appends instead of replacing the last segment.
        let base = format!("{}/", config.api_base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| TorboxError::CliArgumentValidation {
            details: format!("Invalid API base URL {}: {}", config.api_base_url, e),
        })?;

        let api_key = config.api_key.clone().unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!(
                "TORBOX_API_KEY is not set; requests will likely fail to authenticate"
            );
        }

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, TorboxError> {
        self.base_url
            .join(path)
            .map_err(|e| TorboxError::Unexpected(eyre::eyre!("Invalid endpoint {path}: {e}")))
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.api_key)
    }

    /// Sends the request, turning any non-success status into [`TorboxError::Remote`].
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, TorboxError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TorboxError::Remote {
                status,
                url: redact_token(response.url()),
            });
        }
        Ok(response)
    }
}

/// Renders a URL for logs and errors without the credential query parameter.
pub(crate) fn redact_token(url: &Url) -> String {
    let mut redacted = url.clone();
    if url.query_pairs().any(|(key, _)| key == "token") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "token" { "***".to_string() } else { value.into_owned() };
                (key.into_owned(), value)
            })
            .collect();
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}
