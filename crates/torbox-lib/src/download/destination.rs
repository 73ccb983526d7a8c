use std::path::{Component, Path, PathBuf};

/// Joins a remote file name onto `output_dir`, keeping only plain path components.
///
/// Root, prefix, `.` and `..` components are dropped so a remote name can
/// never point outside `output_dir`. Returns `None` if nothing is left.
pub fn destination_path(output_dir: &Path, remote_name: &str) -> Option<PathBuf> {
    let relative: PathBuf = Path::new(remote_name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(output_dir.join(relative))
    }
}
