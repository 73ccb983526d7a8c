pub mod content_digest_hasher;
mod integrity;

pub use content_digest_hasher::{Md5Verifier, VerificationError};
pub use integrity::{HASH_BUFFER_SIZE, Verdict, hash_file_into, verify};
