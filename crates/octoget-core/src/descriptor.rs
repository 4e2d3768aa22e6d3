//! Package descriptor and manifest loading.
//!
//! The descriptor is the static record driving one install run: what to
//! fetch, the digest it must match, which archive entry to install and
//! where. It is built once per invocation from a small TOML manifest
//! (or assembled directly in tests) and never mutated.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::checksum::Digest;
use crate::platform;
use crate::{InstallError, Result};

/// Resolved descriptor for a single install invocation
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    /// Identifier of the binary to install
    pub name: String,
    /// Semantic version of the release
    pub version: String,
    /// Fully rendered URL of the release archive
    pub source_url: String,
    /// Validated digest the downloaded archive must match
    pub expected_digest: Digest,
    /// Path of the executable inside the archive
    pub binary_path_in_archive: String,
    /// Destination directory for the installed binary
    pub install_dir: PathBuf,
}

impl PackageDescriptor {
    /// Final on-disk path the binary will be installed to
    pub fn install_path(&self) -> PathBuf {
        let file_name = Path::new(&self.binary_path_in_archive)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.binary_path_in_archive.clone());

        self.install_dir.join(file_name)
    }
}

/// The manifest file structure (octoget.toml)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub package: PackageSection,

    #[serde(default)]
    pub install: InstallSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageSection {
    /// Binary name (e.g. "octopus")
    pub name: String,

    /// Release version (e.g. "0.1.0")
    pub version: String,

    /// Archive URL; `{version}`, `{os}` and `{arch}` placeholders are
    /// rendered against the version above and the host platform
    pub source_url: String,

    /// Expected hex digest of the archive
    pub sha256: String,

    /// Path of the executable inside the archive
    pub binary: String,
}

/// Optional installation settings
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallSection {
    /// Destination directory; `~` is expanded
    pub dir: Option<String>,
}

impl Manifest {
    /// Load and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            InstallError::InvalidDescriptor(format!(
                "failed to read manifest {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| InstallError::InvalidDescriptor(format!("failed to parse manifest: {}", e)))
    }

    /// Resolve the manifest into a descriptor.
    ///
    /// `dir_override` wins over the manifest's `[install] dir`, which
    /// wins over the default directory.
    pub fn into_descriptor(self, dir_override: Option<&Path>) -> Result<PackageDescriptor> {
        let expected_digest = Digest::parse(&self.package.sha256)?;

        let source_url = render_source_url(&self.package.source_url, &self.package.version);
        url::Url::parse(&source_url).map_err(|e| {
            InstallError::InvalidDescriptor(format!("invalid source URL {}: {}", source_url, e))
        })?;

        if self.package.binary.trim().is_empty() {
            return Err(InstallError::InvalidDescriptor(
                "binary path in archive must not be empty".to_string(),
            ));
        }

        let install_dir = match dir_override {
            Some(dir) => dir.to_path_buf(),
            None => match self.install.dir {
                Some(dir) => PathBuf::from(shellexpand::tilde(&dir).into_owned()),
                None => default_install_dir(),
            },
        };

        Ok(PackageDescriptor {
            name: self.package.name,
            version: self.package.version,
            source_url,
            expected_digest,
            binary_path_in_archive: self.package.binary,
            install_dir,
        })
    }
}

/// Render `{version}`, `{os}` and `{arch}` placeholders in a source URL
pub fn render_source_url(template: &str, version: &str) -> String {
    template
        .replace("{version}", version)
        .replace("{os}", platform::release_os())
        .replace("{arch}", platform::release_arch())
}

/// Default bin directory: `$OCTOGET_HOME/bin`, falling back to
/// `~/.octoget/bin`
pub fn default_install_dir() -> PathBuf {
    octoget_home().join("bin")
}

fn octoget_home() -> PathBuf {
    if let Some(home) = std::env::var_os("OCTOGET_HOME") {
        return PathBuf::from(home);
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".octoget");
    }

    PathBuf::from("/tmp/.octoget")
}
