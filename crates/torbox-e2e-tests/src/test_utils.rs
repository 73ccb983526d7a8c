use crate::mock_service::API_KEY;
use digest::Digest;
use eyre::Result;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;
use torbox_lib::config::{Config, SelectionConfig, TransferConfig};

pub const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

pub fn md5_hex(content: &[u8]) -> String {
    hex::encode(md5::Md5::digest(content))
}

pub fn file_json(id: i64, name: &str, content: &[u8], md5: Option<&str>) -> Value {
    json!({
        "id": id,
        "md5": md5,
        "name": name,
        "short_name": name.rsplit('/').next().unwrap_or(name),
        "size": content.len(),
        "mimetype": "application/octet-stream",
    })
}

pub fn job_json(id: i64, name: &str, progress: f64, files: Vec<Value>) -> Value {
    let size: u64 = files.iter().filter_map(|file| file["size"].as_u64()).sum();
    json!({
        "id": id,
        "hash": format!("{id:040x}"),
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:05:00Z",
        "name": name,
        "size": size,
        "active": progress < 1.0,
        "download_state": if progress < 1.0 { "downloading" } else { "cached" },
        "download_finished": progress >= 1.0,
        "progress": progress,
        "files": files,
    })
}

pub fn listing_json(jobs: Vec<Value>) -> String {
    json!({
        "success": true,
        "detail": "Torrents list retrieved successfully.",
        "data": jobs,
    })
    .to_string()
}

/// One completed job 42 "Example" holding file 7 `Example/a.txt` with content `hello`.
pub fn example_listing() -> String {
    listing_json(vec![job_json(
        42,
        "Example",
        1.0,
        vec![file_json(7, "Example/a.txt", b"hello", Some(HELLO_MD5))],
    )])
}

pub fn create_test_config(api_base_url: &str, output_dir: &Path) -> Config {
    Config {
        api_key: Some(API_KEY.to_string()),
        api_base_url: api_base_url.to_string(),
        output_dir: output_dir.to_path_buf(),
        transfer: TransferConfig {
            max_attempts: 10,
            backoff_base_ms: 1,
            resume: true,
        },
        selection: SelectionConfig::default(),
    }
}

/// Scratch output directory and a config pointing at `api_base_url`.
pub fn setup_test_environment(api_base_url: &str) -> Result<(TempDir, Config)> {
    let temp_dir = tempfile::tempdir()?;
    let config = create_test_config(api_base_url, temp_dir.path());
    Ok((temp_dir, config))
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("torbox_lib=debug,torbox_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
