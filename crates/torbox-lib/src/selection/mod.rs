mod matcher;
mod selector;

pub use matcher::{hint_matches, is_glob};
pub use selector::{SelectedFile, select_files, select_jobs};
