mod destination;
mod engine;
mod retry;
mod types;

pub use destination::destination_path;
pub use engine::TransferEngine;
pub use retry::{RetryDecision, RetryPolicy};
pub use types::{Outcome, TransferReport, TransferTarget};
