use super::Md5Verifier;
use crate::error::TorboxError;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read size used when hashing files on disk.
pub const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// State of a local file relative to what the remote service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
    /// Not on disk or not readable; the normal state before a first download.
    Missing,
    /// Size matches (or is unknown) but there is no checksum to compare against.
    Unknown,
}

impl Verdict {
    /// Whether a download can be skipped.
    pub fn is_acceptable(self) -> bool {
        matches!(self, Verdict::Match | Verdict::Unknown)
    }
}

/// Compares a local file against an expected size and MD5 without modifying it.
///
/// A size difference is reported as `Mismatch` without reading the content.
pub async fn verify(
    path: &Path,
    expected_size: Option<u64>,
    expected_md5: Option<&str>,
) -> Result<Verdict, TorboxError> {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(err) => {
            tracing::trace!(path = %path.display(), error = %err, "Not readable, treating as missing");
            return Ok(Verdict::Missing);
        }
    };
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Ok(Verdict::Missing);
    }

    if let Some(expected_size) = expected_size
        && metadata.len() != expected_size
    {
        tracing::debug!(
            path = %path.display(),
            expected_size,
            actual_size = metadata.len(),
            "Size differs"
        );
        return Ok(Verdict::Mismatch);
    }

    if expected_md5.is_none_or(|md5| md5.trim().is_empty()) {
        return Ok(Verdict::Unknown);
    }
    let mut verifier = Md5Verifier::new(expected_md5);
    hash_reader_into(file, path, &mut verifier).await?;

    Ok(match verifier.verify() {
        Ok(verdict) => verdict,
        Err(err) => {
            tracing::debug!(path = %path.display(), "{}", err);
            Verdict::Mismatch
        }
    })
}

/// Feeds the whole file at `path` into `verifier`, returning the number of bytes read.
pub async fn hash_file_into(path: &Path, verifier: &mut Md5Verifier) -> Result<u64, TorboxError> {
    let file = tokio::fs::File::open(path).await?;
    hash_reader_into(file, path, verifier).await
}

async fn hash_reader_into(
    file: tokio::fs::File,
    path: &Path,
    verifier: &mut Md5Verifier,
) -> Result<u64, TorboxError> {
    let mut reader = tokio::io::BufReader::new(file);
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
            TorboxError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;
        if bytes_read == 0 {
            break;
        }
        verifier.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

    fn write_temp(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let verdict = verify(&dir.path().join("absent"), Some(5), Some(HELLO_MD5))
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Missing);
    }

    #[tokio::test]
    async fn test_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(verify(dir.path(), None, None).await.unwrap(), Verdict::Missing);
    }

    #[tokio::test]
    async fn test_matching_content() {
        let (_dir, path) = write_temp(b"hello");
        assert_eq!(verify(&path, Some(5), Some(HELLO_MD5)).await.unwrap(), Verdict::Match);
    }

    #[tokio::test]
    async fn test_uppercase_expected_digest_matches() {
        let (_dir, path) = write_temp(b"hello");
        let verdict = verify(&path, Some(5), Some(&HELLO_MD5.to_uppercase()))
            .await
            .unwrap();
        assert_eq!(verdict, Verdict::Match);
    }

    #[tokio::test]
    async fn test_same_size_different_content() {
        let (_dir, path) = write_temp(b"jello");
        assert_eq!(
            verify(&path, Some(5), Some(HELLO_MD5)).await.unwrap(),
            Verdict::Mismatch
        );
    }

    #[tokio::test]
    async fn test_size_mismatch_short_circuits() {
        let (_dir, path) = write_temp(b"hel");
        assert_eq!(
            verify(&path, Some(5), Some(HELLO_MD5)).await.unwrap(),
            Verdict::Mismatch
        );
        // An unknown checksum does not rescue a wrong size.
        assert_eq!(verify(&path, Some(5), None).await.unwrap(), Verdict::Mismatch);
    }

    #[tokio::test]
    async fn test_unknown_checksum_never_mismatches() {
        let (_dir, path) = write_temp(b"whatever");
        assert_eq!(verify(&path, Some(8), None).await.unwrap(), Verdict::Unknown);
        assert_eq!(verify(&path, Some(8), Some("")).await.unwrap(), Verdict::Unknown);
        assert!(Verdict::Unknown.is_acceptable());
    }

    #[tokio::test]
    async fn test_larger_than_buffer() {
        let content = vec![0xabu8; HASH_BUFFER_SIZE * 2 + 17];
        let (_dir, path) = write_temp(&content);

        let mut verifier = Md5Verifier::new(None);
        let read = hash_file_into(&path, &mut verifier).await.unwrap();
        assert_eq!(read, content.len() as u64);
        assert_eq!(verifier.bytes_hashed(), content.len() as u64);
    }
}
