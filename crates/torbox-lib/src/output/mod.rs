mod listing;
mod shell;
mod size;

pub use listing::{ListingFormat, write_listing};
pub use shell::{CommandDelimiter, ShellCommand, quote_arg};
pub use size::format_size;
