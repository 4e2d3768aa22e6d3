//! Checksum verification for downloaded archives.

use sha2::{Digest as _, Sha256, Sha512};

use crate::{InstallError, Result};

/// Supported checksum types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumType {
    Sha256,
    Sha512,
}

impl ChecksumType {
    /// Detect checksum type from length of hex string
    pub fn from_hex_length(len: usize) -> Option<Self> {
        match len {
            64 => Some(ChecksumType::Sha256),
            128 => Some(ChecksumType::Sha512),
            _ => None,
        }
    }

    /// Compute the hex digest of a byte slice
    pub fn hex_of(&self, bytes: &[u8]) -> String {
        match self {
            ChecksumType::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(bytes);
                format!("{:x}", hasher.finalize())
            }
            ChecksumType::Sha512 => {
                let mut hasher = Sha512::new();
                hasher.update(bytes);
                format!("{:x}", hasher.finalize())
            }
        }
    }
}

/// A validated expected digest.
///
/// Published checksum data is not always well-formed, so the hex string
/// is validated up front: every character must be a hex digit and the
/// length must correspond to a known algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    kind: ChecksumType,
    hex: String,
}

impl Digest {
    /// Parse and validate a hex digest string
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s.trim().to_ascii_lowercase();

        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(InstallError::InvalidDigest {
                digest: s.to_string(),
                reason: format!("non-hex character '{}'", bad),
            });
        }

        let kind = ChecksumType::from_hex_length(hex.len()).ok_or_else(|| {
            InstallError::InvalidDigest {
                digest: s.to_string(),
                reason: format!(
                    "{} hex characters does not match a supported algorithm (expected 64 or 128)",
                    hex.len()
                ),
            }
        })?;

        Ok(Self { kind, hex })
    }

    /// Check whether the digest of `bytes` matches this digest
    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.kind.hex_of(bytes) == self.hex
    }

    /// The expected hex string (lowercased)
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// The detected checksum type
    pub fn kind(&self) -> ChecksumType {
        self.kind
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex)
    }
}

/// Compute the SHA-256 hex digest of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    ChecksumType::Sha256.hex_of(bytes)
}
