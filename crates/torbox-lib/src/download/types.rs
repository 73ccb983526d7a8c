use super::destination_path;
use crate::catalog::File;
use crate::error::TorboxError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a remote file goes and what it must look like once there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferTarget {
    pub destination: PathBuf,
    pub expected_size: Option<u64>,
    pub expected_md5: Option<String>,
}

impl TransferTarget {
    pub fn for_file(output_dir: &Path, file: &File) -> Result<Self, TorboxError> {
        let destination =
            destination_path(output_dir, &file.name).ok_or_else(|| TorboxError::UnsafePath {
                name: file.name.clone(),
            })?;

        Ok(Self {
            destination,
            // The listing reports 0 when the size is not known yet.
            expected_size: (file.size > 0).then_some(file.size),
            expected_md5: file.expected_md5(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Downloaded,
    /// Already present and acceptable; no network access happened.
    Skipped,
    ChecksumMismatch { expected: String, actual: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReport {
    pub outcome: Outcome,
    /// HTTP attempts made; 0 when skipped
    pub attempts: u32,
    /// Total time spent sleeping between attempts
    pub backoff: Duration,
    /// Bytes written during this transfer, excluding a resumed prefix
    pub bytes_written: u64,
}

impl TransferReport {
    pub fn skipped() -> Self {
        Self {
            outcome: Outcome::Skipped,
            attempts: 0,
            backoff: Duration::ZERO,
            bytes_written: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64, md5: Option<&str>) -> File {
        File {
            id: 7,
            name: name.to_string(),
            short_name: String::new(),
            size,
            md5: md5.map(str::to_string),
            mime_type: None,
        }
    }

    #[test]
    fn test_target_for_file() {
        let target = TransferTarget::for_file(
            Path::new("downloads"),
            &file("Example/a.txt", 5, Some("ABC")),
        )
        .unwrap();

        assert_eq!(target.destination, PathBuf::from("downloads/Example/a.txt"));
        assert_eq!(target.expected_size, Some(5));
        assert_eq!(target.expected_md5.as_deref(), Some("abc"));
    }

    #[test]
    fn test_zero_size_is_unknown() {
        let target = TransferTarget::for_file(Path::new("."), &file("a", 0, None)).unwrap();
        assert_eq!(target.expected_size, None);
        assert_eq!(target.expected_md5, None);
    }

    #[test]
    fn test_unsafe_name_rejected() {
        assert!(matches!(
            TransferTarget::for_file(Path::new("."), &file("..", 1, None)),
            Err(TorboxError::UnsafePath { .. })
        ));
    }
}
