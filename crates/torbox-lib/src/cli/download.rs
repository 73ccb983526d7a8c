use crate::cli::build_http_client;
use crate::cli::{DownloadMode, DownloadParams};
use crate::download::{Outcome, TransferEngine, TransferTarget};
use crate::error::TorboxError;
use crate::remote::{ApiClient, fetch_catalog, resolve_link};
use crate::selection::{select_files, select_jobs};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub mismatched: usize,
    /// Commands printed instead of downloading
    pub emitted: usize,
}

impl DownloadSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Downloaded => self.downloaded += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::ChecksumMismatch { .. } => self.mismatched += 1,
        }
    }
}

pub async fn run_download(params: DownloadParams) -> Result<(), TorboxError> {
    let summary = execute_download(params, &mut std::io::stdout()).await?;

    if summary.mismatched > 0 {
        return Err(TorboxError::ChecksumMismatches {
            count: summary.mismatched,
        });
    }
    tracing::info!("Download completed successfully");
    Ok(())
}

/// Downloads (or prints commands for) every selected file, in catalog order.
///
/// Checksum mismatches are counted and the batch continues; every other
/// error stops at the failing file.
pub async fn execute_download(
    params: DownloadParams,
    out: &mut impl Write,
) -> Result<DownloadSummary, TorboxError> {
    let DownloadParams {
        app_config,
        hint,
        file_hint,
        mode,
    } = params;

    let http = build_http_client()?;
    let client = ApiClient::new(http.clone(), &app_config)?;
    let engine = TransferEngine::new(http, &app_config.transfer);

    tracing::info!("Fetching torrent list");
    let snapshot = fetch_catalog(&client).await?;

    let jobs = select_jobs(
        &snapshot.catalog,
        hint.as_deref(),
        app_config.selection.name_collision,
    )?;
    let files = select_files(&jobs, file_hint.as_deref())?;
    tracing::info!(
        "Processing {} files from {} torrents",
        files.len(),
        jobs.len()
    );

    let mut summary = DownloadSummary::default();
    for selected in files {
        let (job, file) = (selected.job, selected.file);
        let target = TransferTarget::for_file(&app_config.output_dir, file)?;

        match mode {
            DownloadMode::EmitCommands(delimiter) => {
                let url = resolve_link(&client, job.id, file.id).await?;
                TransferEngine::command_for(&url, &target).write_to(out, delimiter)?;
                summary.emitted += 1;
            }
            DownloadMode::Transfer => {
                let verdict = engine.preflight(&target).await?;
                if verdict.is_acceptable() {
                    tracing::info!(
                        job = job.id,
                        file = file.id,
                        output = %target.destination.display(),
                        "Already downloaded, skipping"
                    );
                    summary.record(&Outcome::Skipped);
                    continue;
                }

                let url = resolve_link(&client, job.id, file.id).await?;
                let report = engine.transfer(&url, &target, verdict).await?;
                tracing::debug!(
                    job = job.id,
                    file = file.id,
                    attempts = report.attempts,
                    bytes = report.bytes_written,
                    "Transfer finished"
                );
                summary.record(&report.outcome);
            }
        }
    }
    out.flush()?;

    tracing::info!(
        downloaded = summary.downloaded,
        skipped = summary.skipped,
        mismatched = summary.mismatched,
        emitted = summary.emitted,
        "Finished"
    );
    Ok(summary)
}
