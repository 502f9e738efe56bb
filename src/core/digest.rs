//! Content digests used as file identity
//!
//! Two algorithms are supported: MD5 (128-bit) and SHA-256 (256-bit). A
//! digest match is treated as proof of identical content.

use md5::Md5;
use serde::Serialize;
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

use super::error::DedupError;

/// Raw digest bytes; `Display` renders lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Digest length in bits
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Turns whole-file content into a digest.
///
/// Selected once per run. Implementations must be deterministic: the same
/// bytes always produce the same digest.
pub trait ContentHasher {
    fn digest(&self, content: &[u8]) -> Digest;
}

/// Hash algorithm selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HashAlgorithm {
    #[serde(rename = "MD5")]
    Md5,
    #[default]
    #[serde(rename = "SHA256")]
    Sha256,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha256 => "SHA256",
        }
    }

    pub fn output_bits(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 128,
            HashAlgorithm::Sha256 => 256,
        }
    }
}

impl ContentHasher for HashAlgorithm {
    fn digest(&self, content: &[u8]) -> Digest {
        match self {
            HashAlgorithm::Md5 => Digest::from_bytes(Md5::digest(content).to_vec()),
            HashAlgorithm::Sha256 => Digest::from_bytes(Sha256::digest(content).to_vec()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = DedupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            _ => Err(DedupError::InvalidConfiguration(format!(
                "unsupported hash algorithm: {} (expected MD5 or SHA256)",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        let digest = HashAlgorithm::Sha256.digest(b"test content");
        assert_eq!(
            digest.to_string(),
            "6ae8a75555209fd6c44157c0aed8016e763ff435a19cf186f76863140143ff72"
        );
        assert_eq!(digest.bits(), 256);
    }

    #[test]
    fn test_md5_known_value() {
        let digest = HashAlgorithm::Md5.digest(b"hello");
        assert_eq!(digest.to_string(), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(digest.bits(), 128);
    }

    #[test]
    fn test_digest_is_deterministic() {
        for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha256] {
            let first = algorithm.digest(b"same bytes");
            let second = algorithm.digest(b"same bytes");
            assert_eq!(first, second);
            assert_eq!(first.bits(), algorithm.output_bits());
        }
    }

    #[test]
    fn test_algorithms_disagree() {
        let md5 = HashAlgorithm::Md5.digest(b"hello");
        let sha = HashAlgorithm::Sha256.digest(b"hello");
        assert_ne!(md5, sha);
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("MD5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_parse_unsupported_algorithm() {
        let err = "CRC32".parse::<HashAlgorithm>().unwrap_err();
        assert!(matches!(err, DedupError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("CRC32"));
    }
}
