use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response wrapper used by every endpoint of the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub detail: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub name: String,
    /// Total size in bytes
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_finished: bool,
    /// Fraction in [0, 1]
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<File>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    /// Unique within the owning job
    pub id: i64,
    /// Path relative to the download root, may contain directory separators
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default, rename = "mimetype", alias = "mime_type")]
    pub mime_type: Option<String>,
}

impl File {
    /// Expected MD5 digest, lowercased; `None` when the service did not publish one.
    pub fn expected_md5(&self) -> Option<String> {
        self.md5
            .as_deref()
            .map(str::trim)
            .filter(|md5| !md5.is_empty())
            .map(str::to_ascii_lowercase)
    }

    /// The name used for matching: the short name, or the last path segment of the name.
    pub fn display_name(&self) -> &str {
        if self.short_name.is_empty() {
            self.name.rsplit('/').next().unwrap_or(&self.name)
        } else {
            &self.short_name
        }
    }
}

/// Jobs in the order the remote service listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub jobs: Vec<Job>,
}

impl Catalog {
    pub fn parse(body: &[u8]) -> Result<(Self, String), serde_json::Error> {
        let envelope: Envelope<Option<Vec<Job>>> = serde_json::from_slice(body)?;
        let jobs = envelope.data.unwrap_or_default();
        Ok((Self { jobs }, envelope.detail))
    }
}

/// One listing call: the verbatim payload alongside its parsed form.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub raw: Vec<u8>,
    pub catalog: Catalog,
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
