use super::matcher::{hint_matches, is_glob};
use crate::catalog::{Catalog, File, Job};
use crate::config::NameCollisionPolicy;
use crate::error::TorboxError;

/// A file together with the job it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct SelectedFile<'a> {
    pub job: &'a Job,
    pub file: &'a File,
}

/// Picks the jobs a hint refers to, in catalog order.
///
/// Resolution order: no hint selects everything, then an exact job id, then an
/// exact name, then a glob over job names. A glob selects every job it
/// matches; an exact name shared by several jobs is resolved by `policy`.
pub fn select_jobs<'a>(
    catalog: &'a Catalog,
    hint: Option<&str>,
    policy: NameCollisionPolicy,
) -> Result<Vec<&'a Job>, TorboxError> {
    let Some(hint) = hint else {
        return Ok(catalog.jobs.iter().collect());
    };

    if let Some(id) = job_id(hint)
        && let Some(job) = catalog.jobs.iter().find(|job| job.id == id)
    {
        return Ok(vec![job]);
    }

    let exact: Vec<&Job> = catalog.jobs.iter().filter(|job| job.name == hint).collect();
    match (exact.len(), policy) {
        (0, _) => {}
        (1, _) | (_, NameCollisionPolicy::FirstMatch) => {
            if exact.len() > 1 {
                tracing::warn!(
                    hint,
                    count = exact.len(),
                    id = exact[0].id,
                    "Several jobs share this name, using the first"
                );
            }
            return Ok(vec![exact[0]]);
        }
        (count, NameCollisionPolicy::Error) => {
            return Err(TorboxError::AmbiguousSelection {
                hint: hint.to_string(),
                count,
            });
        }
    }

    let matched: Vec<&Job> = if is_glob(hint) {
        catalog
            .jobs
            .iter()
            .filter(|job| hint_matches(hint, &job.name))
            .collect()
    } else {
        Vec::new()
    };

    if matched.is_empty() {
        return Err(TorboxError::NotFound {
            hint: hint.to_string(),
        });
    }
    Ok(matched)
}

/// Only the canonical decimal spelling names a job id; `+1` or `042` stay names.
fn job_id(hint: &str) -> Option<i64> {
    if !hint.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    hint.parse().ok().filter(|id: &i64| id.to_string() == hint)
}

/// Expands jobs into their files, optionally filtered by a hint over the files' short names.
pub fn select_files<'a>(
    jobs: &[&'a Job],
    file_hint: Option<&str>,
) -> Result<Vec<SelectedFile<'a>>, TorboxError> {
    let selected: Vec<SelectedFile<'a>> = jobs
        .iter()
        .flat_map(|&job| job.files.iter().map(move |file| SelectedFile { job, file }))
        .filter(|selected| {
            file_hint.is_none_or(|hint| hint_matches(hint, selected.file.display_name()))
        })
        .collect();

    if let Some(hint) = file_hint
        && selected.is_empty()
    {
        return Err(TorboxError::NotFound {
            hint: hint.to_string(),
        });
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: i64, name: &str) -> File {
        File {
            id,
            name: name.to_string(),
            short_name: name.rsplit('/').next().unwrap().to_string(),
            size: 1,
            md5: None,
            mime_type: None,
        }
    }

    fn job(id: i64, name: &str, files: Vec<File>) -> Job {
        Job {
            id,
            hash: String::new(),
            created_at: None,
            updated_at: None,
            name: name.to_string(),
            size: 0,
            active: false,
            download_state: "completed".to_string(),
            download_finished: true,
            progress: 1.0,
            files,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            jobs: vec![
                job(
                    1,
                    "Movie.2020",
                    vec![file(1, "Movie.2020/movie.mkv"), file(2, "Movie.2020/movie.nfo")],
                ),
                job(2, "Show.S01", vec![file(1, "Show.S01/e01.mkv")]),
                job(3, "1", vec![file(1, "1/readme.txt")]),
                job(4, "Show.S01", vec![file(1, "Show.S01/e02.mkv")]),
            ],
        }
    }

    fn ids(jobs: &[&Job]) -> Vec<i64> {
        jobs.iter().map(|job| job.id).collect()
    }

    #[test]
    fn test_no_hint_selects_all() {
        let catalog = catalog();
        let jobs = select_jobs(&catalog, None, NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_numeric_hint_prefers_job_id() {
        let catalog = catalog();
        let jobs = select_jobs(&catalog, Some("1"), NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![1]);
    }

    #[test]
    fn test_numeric_hint_falls_back_to_name() {
        let mut catalog = catalog();
        catalog.jobs.retain(|job| job.id != 1);
        let jobs = select_jobs(&catalog, Some("1"), NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![3]);
    }

    #[test]
    fn test_non_canonical_numeric_hint_is_a_name() {
        let mut catalog = catalog();
        catalog.jobs.push(job(5, "+1", vec![file(1, "+1/a.txt")]));
        catalog.jobs.push(job(6, "04", vec![file(1, "04/a.txt")]));

        let jobs = select_jobs(&catalog, Some("+1"), NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![5]);
        let jobs = select_jobs(&catalog, Some("04"), NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![6]);
        let jobs = select_jobs(&catalog, Some("4"), NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![4]);
    }

    #[test]
    fn test_exact_name_collision_first_match() {
        let catalog = catalog();
        let jobs = select_jobs(&catalog, Some("Show.S01"), NameCollisionPolicy::FirstMatch).unwrap();
        assert_eq!(ids(&jobs), vec![2]);
    }

    #[test]
    fn test_exact_name_collision_error() {
        let catalog = catalog();
        let result = select_jobs(&catalog, Some("Show.S01"), NameCollisionPolicy::Error);
        assert!(matches!(
            result,
            Err(TorboxError::AmbiguousSelection { count: 2, .. })
        ));
    }

    #[test]
    fn test_glob_selects_every_match() {
        let catalog = catalog();
        let jobs = select_jobs(&catalog, Some("*.S0?"), NameCollisionPolicy::Error).unwrap();
        assert_eq!(ids(&jobs), vec![2, 4]);
    }

    #[test]
    fn test_no_match_is_not_found() {
        let catalog = catalog();
        let result = select_jobs(&catalog, Some("Missing"), NameCollisionPolicy::FirstMatch);
        assert!(matches!(result, Err(TorboxError::NotFound { hint }) if hint == "Missing"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let catalog = catalog();
        assert!(select_jobs(&catalog, Some("movie.2020"), NameCollisionPolicy::FirstMatch).is_err());
    }

    #[test]
    fn test_select_files_with_and_without_hint() {
        let catalog = catalog();
        let jobs = select_jobs(&catalog, Some("Movie.2020"), NameCollisionPolicy::FirstMatch).unwrap();

        let all = select_files(&jobs, None).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|selected| selected.job.id == 1));

        let mkv = select_files(&jobs, Some("*.mkv")).unwrap();
        assert_eq!(mkv.len(), 1);
        assert_eq!(mkv[0].file.name, "Movie.2020/movie.mkv");

        assert!(matches!(
            select_files(&jobs, Some("*.srt")),
            Err(TorboxError::NotFound { .. })
        ));
    }
}
