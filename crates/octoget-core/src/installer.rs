//! The fetch-verify-extract-install pipeline.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::archive::{Extractor, TarExtractor};
use crate::descriptor::PackageDescriptor;
use crate::fetch::{Fetcher, HttpFetcher, Progress};
use crate::{InstallError, Result};

/// Handle to a binary produced by a successful install
#[derive(Debug, Clone)]
pub struct InstalledBinary {
    pub(crate) path: PathBuf,
}

impl InstalledBinary {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Installer driving one fetch-verify-extract-install sequence.
///
/// Both capabilities are trait parameters so unit tests can run the
/// whole pipeline against in-memory payloads.
pub struct Installer<F: Fetcher, E: Extractor> {
    fetcher: F,
    extractor: E,
}

impl Installer<HttpFetcher, TarExtractor> {
    /// Installer wired with the real HTTP fetcher and tar extractor
    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new()?,
            extractor: TarExtractor::new(),
        })
    }
}

impl<F: Fetcher, E: Extractor> Installer<F, E> {
    /// Installer with explicit capabilities
    pub fn with_capabilities(fetcher: F, extractor: E) -> Self {
        Self { fetcher, extractor }
    }

    /// Run the install pipeline for a descriptor.
    ///
    /// The pipeline is fail-fast: each step aborts the run, and nothing
    /// is written to the install directory before the downloaded bytes
    /// match the expected digest.
    pub async fn install(
        &self,
        descriptor: &PackageDescriptor,
        progress: Option<&Progress>,
    ) -> Result<InstalledBinary> {
        log::info!(
            "installing {} {} from {}",
            descriptor.name,
            descriptor.version,
            descriptor.source_url
        );

        let bytes = self.fetcher.fetch(&descriptor.source_url, progress).await?;

        if !descriptor.expected_digest.matches(&bytes) {
            let actual = descriptor.expected_digest.kind().hex_of(&bytes);
            return Err(InstallError::ChecksumMismatch {
                name: descriptor.name.clone(),
                expected: descriptor.expected_digest.hex().to_string(),
                actual,
            });
        }
        log::debug!("digest verified ({} bytes)", bytes.len());

        let payload = self
            .extractor
            .extract(&bytes, &descriptor.binary_path_in_archive)?;

        let target = descriptor.install_path();
        write_executable(&target, &payload)?;

        log::info!("installed {}", target.display());
        Ok(InstalledBinary { path: target })
    }
}

/// Write `bytes` to `target` with executable permissions.
///
/// The payload goes to a temporary file in the destination directory
/// first and is renamed into place, so a failed write never leaves a
/// partial binary at the final path.
fn write_executable(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = target.parent().ok_or_else(|| InstallError::WriteFailed {
        path: target.to_path_buf(),
        reason: "target has no parent directory".to_string(),
    })?;

    std::fs::create_dir_all(dir).map_err(|e| InstallError::WriteFailed {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| InstallError::WriteFailed {
        path: target.to_path_buf(),
        reason: e.to_string(),
    })?;

    temp.write_all(bytes).map_err(|e| InstallError::WriteFailed {
        path: target.to_path_buf(),
        reason: e.to_string(),
    })?;
    temp.flush().map_err(|e| InstallError::WriteFailed {
        path: target.to_path_buf(),
        reason: e.to_string(),
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o755)).map_err(
            |e| InstallError::WriteFailed {
                path: target.to_path_buf(),
                reason: e.to_string(),
            },
        )?;
    }

    temp.persist(target).map_err(|e| InstallError::WriteFailed {
        path: target.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(())
}
