use super::format_size;
use crate::catalog::{CatalogSnapshot, Job};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// The listing payload exactly as the remote service sent it
    Json,
    /// `id progress size<TAB>name`
    Machine,
    /// `id percent% size  name`
    Human,
}

pub fn write_listing(
    snapshot: &CatalogSnapshot,
    format: ListingFormat,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match format {
        ListingFormat::Json => {
            out.write_all(&snapshot.raw)?;
            writeln!(out)?;
        }
        ListingFormat::Machine => {
            for job in &snapshot.catalog.jobs {
                writeln!(out, "{}", machine_line(job))?;
            }
        }
        ListingFormat::Human => {
            for job in &snapshot.catalog.jobs {
                writeln!(out, "{}", human_line(job))?;
            }
        }
    }
    out.flush()
}

// Progress is truncated, not rounded, so 99.9% never shows as complete.
fn truncated_percent(job: &Job) -> u64 {
    (job.progress.clamp(0.0, 1.0) * 100.0) as u64
}

fn machine_line(job: &Job) -> String {
    format!(
        "{} {:.2} {}\t{}",
        job.id,
        truncated_percent(job) as f64 / 100.0,
        job.size,
        job.name
    )
}

fn human_line(job: &Job) -> String {
    format!(
        "{} {}% {}  {}",
        job.id,
        truncated_percent(job),
        format_size(job.size),
        job.name
    )
}
