use crate::error::{CheckError, Result};
use digest::Digest;
use sha1::Sha1;
use sha2::Sha256;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Md5,
    Sha1,
}

impl DigestAlgorithm {
    /// Evaluation order used when several digests are configured.
    pub const ALL: [DigestAlgorithm; 3] = [
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn hex_digest<D: Digest>(bytes: &[u8]) -> String {
    hex::encode(D::digest(bytes))
}

/// Lowercase hex digest of `bytes`.
pub fn calculate_digest(algorithm: DigestAlgorithm, bytes: &[u8]) -> String {
    match algorithm {
        DigestAlgorithm::Sha256 => hex_digest::<Sha256>(bytes),
        DigestAlgorithm::Sha1 => hex_digest::<Sha1>(bytes),
        DigestAlgorithm::Md5 => format!("{:x}", md5::compute(bytes)),
    }
}

/// Compares case-sensitively; an uppercase expectation never matches.
pub fn verify_digest(algorithm: DigestAlgorithm, bytes: &[u8], expected: &str) -> Result<()> {
    let calculated = calculate_digest(algorithm, bytes);

    if calculated != expected {
        return Err(CheckError::Comparison(format!(
            "{algorithm} mismatch: expected {expected:?} got {calculated:?}"
        )));
    }

    Ok(())
}
