//! Archive entry extraction (tar, tar.gz).

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::{InstallError, Result};

/// Supported archive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Tar,
    TarGz,
}

impl ArchiveType {
    /// Detect archive type from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
            Some(ArchiveType::TarGz)
        } else if path_str.ends_with(".tar") {
            Some(ArchiveType::Tar)
        } else {
            None
        }
    }

    /// Detect archive type from the payload's magic bytes.
    ///
    /// Release URLs do not always carry a useful extension, so the
    /// gzip magic (0x1f 0x8b) is the authoritative signal.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b {
            ArchiveType::TarGz
        } else {
            ArchiveType::Tar
        }
    }
}

/// Capability to pull a single named entry out of an archive payload
pub trait Extractor: Send + Sync {
    fn extract(&self, bytes: &[u8], entry: &str) -> Result<Vec<u8>>;
}

/// Extractor for tar and gzipped tar archives
pub struct TarExtractor;

impl TarExtractor {
    pub fn new() -> Self {
        Self
    }

    fn find_entry<R: Read>(reader: R, wanted: &str) -> Result<Vec<u8>> {
        let wanted = normalize_entry(wanted);
        let mut archive = tar::Archive::new(reader);

        for entry in archive
            .entries()
            .map_err(|e| InstallError::ArchiveRead(format!("failed to read tar: {}", e)))?
        {
            let mut entry = entry
                .map_err(|e| InstallError::ArchiveRead(format!("failed to read tar entry: {}", e)))?;

            let path = entry
                .path()
                .map_err(|e| InstallError::ArchiveRead(format!("invalid path in tar: {}", e)))?;

            if normalize_entry(&path.to_string_lossy()) != wanted {
                continue;
            }

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|e| InstallError::ArchiveRead(format!("failed to extract entry: {}", e)))?;
            return Ok(bytes);
        }

        Err(InstallError::ArchiveEntryNotFound {
            entry: wanted.to_string(),
        })
    }
}

impl Default for TarExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TarExtractor {
    fn extract(&self, bytes: &[u8], entry: &str) -> Result<Vec<u8>> {
        match ArchiveType::from_bytes(bytes) {
            ArchiveType::TarGz => Self::find_entry(GzDecoder::new(bytes), entry),
            ArchiveType::Tar => Self::find_entry(bytes, entry),
        }
    }
}

/// Strip an insignificant leading `./` from an entry path
fn normalize_entry(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}
