use super::retry::{RetryDecision, RetryPolicy};
use super::types::{Outcome, TransferReport, TransferTarget};
use crate::config::TransferConfig;
use crate::error::TorboxError;
use crate::output::ShellCommand;
use crate::remote::redact_token;
use crate::verification::{
    HASH_BUFFER_SIZE, Md5Verifier, Verdict, VerificationError, hash_file_into, verify,
};
use futures::StreamExt;
use reqwest::header::{CONTENT_RANGE, HeaderMap, RANGE};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Downloads resolved links to disk, one file at a time.
#[derive(Debug, Clone)]
pub struct TransferEngine {
    http: Client,
    policy: RetryPolicy,
    resume: bool,
}

struct Connected {
    response: Response,
    attempts: u32,
    backoff: Duration,
}

impl TransferEngine {
    pub fn new(http: Client, config: &TransferConfig) -> Self {
        Self {
            http,
            policy: RetryPolicy::from(config),
            resume: config.resume,
        }
    }

    /// Checks the destination before any network access.
    pub async fn preflight(&self, target: &TransferTarget) -> Result<Verdict, TorboxError> {
        verify(
            &target.destination,
            target.expected_size,
            target.expected_md5.as_deref(),
        )
        .await
    }

    /// Downloads `url` to the target unless an acceptable copy is already there.
    pub async fn fetch(
        &self,
        url: &Url,
        target: &TransferTarget,
    ) -> Result<TransferReport, TorboxError> {
        let verdict = self.preflight(target).await?;
        if verdict.is_acceptable() {
            tracing::debug!(
                output = %target.destination.display(),
                ?verdict,
                "File exists with acceptable content, skipping download"
            );
            return Ok(TransferReport::skipped());
        }
        self.transfer(url, target, verdict).await
    }

    /// Downloads `url` to the target given the destination's pre-flight `verdict`.
    pub async fn transfer(
        &self,
        url: &Url,
        target: &TransferTarget,
        verdict: Verdict,
    ) -> Result<TransferReport, TorboxError> {
        let output_path = &target.destination;

        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TorboxError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })?;
        }

        let mut resume_offset = self.resume_offset(target, verdict).await?;
        let Connected {
            mut response,
            mut attempts,
            mut backoff,
        } = self.connect(url, resume_offset).await?;

        if resume_offset > 0
            && response.status() == StatusCode::PARTIAL_CONTENT
            && content_range_start(response.headers()) != Some(resume_offset)
        {
            tracing::warn!(
                output = %output_path.display(),
                offset = resume_offset,
                content_range = ?response.headers().get(CONTENT_RANGE),
                "Server answered the range request from another offset, restarting download"
            );
            drop(response);
            tokio::fs::remove_file(output_path).await?;
            resume_offset = 0;

            let restarted = self.connect(url, resume_offset).await?;
            response = restarted.response;
            attempts += restarted.attempts;
            backoff += restarted.backoff;
        }

        let mut hasher = Md5Verifier::new(target.expected_md5.as_deref());
        let appending = resume_offset > 0 && response.status() == StatusCode::PARTIAL_CONTENT;
        if appending {
            hash_file_into(output_path, &mut hasher).await?;
            tracing::info!(
                output = %output_path.display(),
                offset = resume_offset,
                "Resuming partial download"
            );
        } else if resume_offset > 0 {
            tracing::info!(
                output = %output_path.display(),
                "Server ignored the range request, restarting download"
            );
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.create(true);
        if resume_offset > 0 && !appending {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let file = options.open(output_path).await?;
        let mut writer = tokio::io::BufWriter::with_capacity(HASH_BUFFER_SIZE, file);

        tracing::info!(
            output = %output_path.display(),
            expected_md5 = target.expected_md5.as_deref().unwrap_or("unknown"),
            "Downloading"
        );

        let mut stream = response.bytes_stream();
        let mut bytes_written = 0u64;
        while let Some(chunk) = stream.next().await {
            let buffer = chunk?;
            hasher.update(&buffer);
            writer.write_all(&buffer).await?;
            bytes_written += buffer.len() as u64;
        }
        writer.flush().await?;

        let outcome = match hasher.verify() {
            Ok(Verdict::Unknown) => {
                tracing::warn!(
                    output = %output_path.display(),
                    "No checksum published for this file, download not verified"
                );
                Outcome::Downloaded
            }
            Ok(_) => {
                tracing::info!(output = %output_path.display(), "Downloaded and verified");
                Outcome::Downloaded
            }
            Err(VerificationError::VerificationFailed { expected, actual }) => {
                tracing::warn!(
                    output = %output_path.display(),
                    %expected,
                    %actual,
                    "MD5 of downloaded file does not match the expected MD5"
                );
                Outcome::ChecksumMismatch { expected, actual }
            }
        };

        Ok(TransferReport {
            outcome,
            attempts,
            backoff,
            bytes_written,
        })
    }

    /// Builds the shell command that would perform the same download.
    pub fn command_for(url: &Url, target: &TransferTarget) -> ShellCommand {
        ShellCommand::new("wget")
            .arg("--continue")
            .arg("--output-document")
            .arg(target.destination.to_string_lossy())
            .arg(url.as_str())
    }

    /// Offset to continue from, removing a stale destination that cannot be continued.
    async fn resume_offset(
        &self,
        target: &TransferTarget,
        verdict: Verdict,
    ) -> Result<u64, TorboxError> {
        if verdict != Verdict::Mismatch {
            return Ok(0);
        }

        let output_path = &target.destination;
        let existing = tokio::fs::metadata(output_path).await?.len();
        if self.resume
            && existing > 0
            && target.expected_size.is_some_and(|size| existing < size)
        {
            return Ok(existing);
        }

        tracing::info!(
            output = %output_path.display(),
            "File exists with incorrect content, deleting"
        );
        tokio::fs::remove_file(output_path).await?;
        Ok(0)
    }

    /// Requests the link until it answers with a usable status.
    ///
    /// Bad statuses are retried with exponential backoff; a transport error
    /// aborts immediately.
    async fn connect(&self, url: &Url, resume_offset: u64) -> Result<Connected, TorboxError> {
        let mut backoff = Duration::ZERO;
        let mut attempt = 0;

        loop {
            let mut request = self.http.get(url.clone());
            if resume_offset > 0 {
                request = request.header(RANGE, format!("bytes={resume_offset}-"));
            }

            let response = request.send().await?;
            let status = response.status();
            if status == StatusCode::OK
                || (resume_offset > 0 && status == StatusCode::PARTIAL_CONTENT)
            {
                return Ok(Connected {
                    response,
                    attempts: attempt + 1,
                    backoff,
                });
            }

            match self.policy.decide(attempt) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        %status,
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Download request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    backoff += delay;
                    attempt += 1;
                }
                RetryDecision::NoRetry => {
                    return Err(TorboxError::Remote {
                        status,
                        url: redact_token(url),
                    });
                }
            }
        }
    }
}

/// First byte position of a `Content-Range: bytes START-END/TOTAL` header.
fn content_range_start(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(CONTENT_RANGE)?.to_str().ok()?;
    let range = value.trim().strip_prefix("bytes ")?;
    let (start, _) = range.split_once('-')?;
    start.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HELLO_MD5: &str = "5d41402abc4b2a76b9719d911017c592";

    fn engine() -> TransferEngine {
        TransferEngine::new(Client::new(), &TransferConfig::default())
    }

    fn target(destination: PathBuf) -> TransferTarget {
        TransferTarget {
            destination,
            expected_size: Some(5),
            expected_md5: Some(HELLO_MD5.to_string()),
        }
    }

    // Nothing listens on the discard port, so any network access would fail the test.
    fn unreachable_url() -> Url {
        Url::parse("http://127.0.0.1:9/never").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_skips_matching_file_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"hello").unwrap();

        let report = engine().fetch(&unreachable_url(), &target(path)).await.unwrap();
        assert_eq!(report, TransferReport::skipped());
    }

    #[tokio::test]
    async fn test_fetch_skips_unknown_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"jello").unwrap();

        let mut target = target(path);
        target.expected_md5 = None;
        let report = engine().fetch(&unreachable_url(), &target).await.unwrap();
        assert_eq!(report.outcome, Outcome::Skipped);
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/a.txt");

        let result = engine().fetch(&unreachable_url(), &target(path.clone())).await;
        assert!(matches!(result, Err(TorboxError::Transport(_))));
        // Directories are prepared before connecting.
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_transfer_reports_directory_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("child.txt");

        let result = engine()
            .transfer(&unreachable_url(), &target(path), Verdict::Missing)
            .await;
        match result {
            Err(TorboxError::DirectoryCreation { path, .. }) => assert_eq!(path, blocker),
            other => panic!("expected DirectoryCreation, got {other:?}"),
        }
    }

    #[test]
    fn test_content_range_start() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_range_start(&headers), None);

        headers.insert(CONTENT_RANGE, "bytes 2-4/5".parse().unwrap());
        assert_eq!(content_range_start(&headers), Some(2));

        headers.insert(CONTENT_RANGE, "bytes */5".parse().unwrap());
        assert_eq!(content_range_start(&headers), None);
    }

    #[test]
    fn test_command_for() {
        let url = Url::parse("https://cdn.example/d/7?token=x&name=a b").unwrap();
        let target = target(PathBuf::from("downloads/Example/a.txt"));

        let command = TransferEngine::command_for(&url, &target);
        assert_eq!(
            command.args(),
            [
                "wget",
                "--continue",
                "--output-document",
                "downloads/Example/a.txt",
                url.as_str()
            ]
        );
    }
}
