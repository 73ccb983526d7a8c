use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub const API_KEY: &str = "test-api-key";

/// What the link endpoint puts in `data` for an authorized request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkResponse {
    Signed,
    NullData,
    NotAUrl,
}

/// Request counters and knobs shared with the handlers.
pub struct MockState {
    pub base_url: String,
    pub listing_body: Mutex<String>,
    pub files: HashMap<(i64, i64), Vec<u8>>,
    /// Download requests answered with 503 before content is served
    pub failures_remaining: AtomicUsize,
    pub honor_range: AtomicBool,
    /// Answer range requests with a 206 that starts at byte 0
    pub skew_range: AtomicBool,
    pub link_response: Mutex<LinkResponse>,
    pub listing_requests: AtomicUsize,
    pub link_requests: AtomicUsize,
    pub download_requests: AtomicUsize,
    pub range_headers: Mutex<Vec<Option<String>>>,
}

/// In-process stand-in for the remote API and its file CDN.
pub struct MockService {
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockService {
    pub async fn start(listing_body: String, files: HashMap<(i64, i64), Vec<u8>>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock service");
        let addr = listener.local_addr().expect("Mock service has no address");

        let state = Arc::new(MockState {
            base_url: format!("http://{addr}"),
            listing_body: Mutex::new(listing_body),
            files,
            failures_remaining: AtomicUsize::new(0),
            honor_range: AtomicBool::new(true),
            skew_range: AtomicBool::new(false),
            link_response: Mutex::new(LinkResponse::Signed),
            listing_requests: AtomicUsize::new(0),
            link_requests: AtomicUsize::new(0),
            download_requests: AtomicUsize::new(0),
            range_headers: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/api/torrents/mylist", get(mylist))
            .route("/v1/api/torrents/requestdl", get(requestdl))
            .route("/dl/:job_id/:file_id", get(download))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock service failed");
        });

        Self { state, handle }
    }

    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    pub fn api_base_url(&self) -> String {
        format!("{}/v1/api", self.state.base_url)
    }

    pub fn fail_next_downloads(&self, count: usize) {
        self.state.failures_remaining.store(count, Ordering::SeqCst);
    }

    pub fn set_honor_range(&self, honor: bool) {
        self.state.honor_range.store(honor, Ordering::SeqCst);
    }

    pub fn set_skew_range(&self, skew: bool) {
        self.state.skew_range.store(skew, Ordering::SeqCst);
    }

    pub fn set_link_response(&self, response: LinkResponse) {
        *self.state.link_response.lock().unwrap() = response;
    }

    pub fn set_listing_body(&self, body: impl Into<String>) {
        *self.state.listing_body.lock().unwrap() = body.into();
    }

    pub fn listing_requests(&self) -> usize {
        self.state.listing_requests.load(Ordering::SeqCst)
    }

    pub fn link_requests(&self) -> usize {
        self.state.link_requests.load(Ordering::SeqCst)
    }

    pub fn download_requests(&self) -> usize {
        self.state.download_requests.load(Ordering::SeqCst)
    }

    pub fn range_headers(&self) -> Vec<Option<String>> {
        self.state.range_headers.lock().unwrap().clone()
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case(&format!("bearer {API_KEY}")))
}

fn api_error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "success": false, "detail": detail, "data": null }))).into_response()
}

async fn mylist(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.listing_requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        tracing::debug!("Rejecting listing request without a valid bearer token");
        return api_error(StatusCode::FORBIDDEN, "Invalid API key");
    }

    let body = state.listing_body.lock().unwrap().clone();
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn requestdl(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.link_requests.fetch_add(1, Ordering::SeqCst);
    if params.get("token").map(String::as_str) != Some(API_KEY) {
        tracing::debug!("Rejecting link request with an invalid token");
        return api_error(StatusCode::FORBIDDEN, "Invalid token");
    }

    let (Some(job_id), Some(file_id)) = (params.get("torrent_id"), params.get("file_id")) else {
        return api_error(StatusCode::BAD_REQUEST, "Missing torrent_id or file_id");
    };

    let mode = *state.link_response.lock().unwrap();
    tracing::debug!(%job_id, %file_id, ?mode, "Answering link request");
    let data = match mode {
        LinkResponse::Signed => json!(format!("{}/dl/{job_id}/{file_id}?sig=abc", state.base_url)),
        LinkResponse::NullData => json!(null),
        LinkResponse::NotAUrl => json!("not a url"),
    };

    Json(json!({
        "success": true,
        "detail": "Download link generated.",
        "data": data,
    }))
    .into_response()
}

async fn download(
    State(state): State<Arc<MockState>>,
    Path((job_id, file_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Response {
    state.download_requests.fetch_add(1, Ordering::SeqCst);
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.range_headers.lock().unwrap().push(range.clone());

    if state
        .failures_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let Some(content) = state.files.get(&(job_id, file_id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let offset = range
        .as_deref()
        .and_then(|range| range.strip_prefix("bytes="))
        .and_then(|range| range.strip_suffix('-'))
        .and_then(|start| start.parse::<usize>().ok());

    tracing::debug!(job_id, file_id, ?offset, "Serving download");
    match offset {
        Some(_) if state.skew_range.load(Ordering::SeqCst) => (
            StatusCode::PARTIAL_CONTENT,
            [(
                header::CONTENT_RANGE,
                format!("bytes 0-{}/{}", content.len().saturating_sub(1), content.len()),
            )],
            content.clone(),
        )
            .into_response(),
        Some(offset) if state.honor_range.load(Ordering::SeqCst) && offset <= content.len() => (
            StatusCode::PARTIAL_CONTENT,
            [(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", offset, content.len().saturating_sub(1), content.len()),
            )],
            content[offset..].to_vec(),
        )
            .into_response(),
        _ => (StatusCode::OK, content.clone()).into_response(),
    }
}
