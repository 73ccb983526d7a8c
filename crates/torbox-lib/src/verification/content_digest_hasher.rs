use super::Verdict;
use digest::Digest;
use md5::Md5;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Verification failed: expected {expected}, got {actual}")]
    VerificationFailed { expected: String, actual: String },
}

/// Running MD5 over a stream of chunks, checked against an optional expected digest.
pub struct Md5Verifier {
    hasher: Md5,
    expected_digest: Option<String>,
    bytes_hashed: u64,
}

impl Md5Verifier {
    /// `expected_digest` is hex, compared case-insensitively; empty means unknown.
    #[inline]
    pub fn new(expected_digest: Option<&str>) -> Self {
        Self {
            hasher: Md5::new(),
            expected_digest: expected_digest
                .map(str::trim)
                .filter(|digest| !digest.is_empty())
                .map(str::to_ascii_lowercase),
            bytes_hashed: 0,
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        Digest::update(&mut self.hasher, data);
        self.bytes_hashed += data.len() as u64;
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed
    }

    /// `Match` or `Unknown` (no expected digest) on success.
    pub fn verify(self) -> Result<Verdict, VerificationError> {
        let actual_digest = hex::encode(self.hasher.finalize());

        match self.expected_digest {
            None => Ok(Verdict::Unknown),
            Some(expected) if expected == actual_digest => Ok(Verdict::Match),
            Some(expected) => Err(VerificationError::VerificationFailed {
                expected,
                actual: actual_digest,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunked_update_matches() {
        let mut verifier = Md5Verifier::new(Some("5d41402abc4b2a76b9719d911017c592"));
        verifier.update(b"he");
        verifier.update(b"llo");

        assert_eq!(verifier.bytes_hashed(), 5);
        assert_eq!(verifier.verify(), Ok(Verdict::Match));
    }

    #[test]
    fn test_expected_digest_is_case_insensitive() {
        let mut verifier = Md5Verifier::new(Some("5D41402ABC4B2A76B9719D911017C592"));
        verifier.update(b"hello");
        assert_eq!(verifier.verify(), Ok(Verdict::Match));
    }

    #[test]
    fn test_mismatch_reports_both_digests() {
        let mut verifier = Md5Verifier::new(Some("5d41402abc4b2a76b9719d911017c592"));
        verifier.update(b"hello\n");

        assert_eq!(
            verifier.verify(),
            Err(VerificationError::VerificationFailed {
                expected: "5d41402abc4b2a76b9719d911017c592".to_string(),
                actual: "b1946ac92492d2347c6235b4d2611184".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_expected_digest_is_unknown() {
        let mut verifier = Md5Verifier::new(Some(""));
        verifier.update(b"anything");
        assert_eq!(verifier.verify(), Ok(Verdict::Unknown));
    }
}
