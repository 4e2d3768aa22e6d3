use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    // Descriptor/manifest errors
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid digest '{digest}': {reason}")]
    InvalidDigest { digest: String, reason: String },

    // Network errors
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    // Verification errors
    #[error("Checksum mismatch for {name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    // Archive errors
    #[error("Archive entry not found: {entry}")]
    ArchiveEntryNotFound { entry: String },

    #[error("Failed to read archive: {0}")]
    ArchiveRead(String),

    // Installation errors
    #[error("Write failed for {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TestError {
    #[error("Smoke test failed for {path}: {reason}")]
    ExecutionFailed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, InstallError>;
