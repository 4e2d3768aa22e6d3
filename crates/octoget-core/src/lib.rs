pub mod archive;
pub mod checksum;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod http;
pub mod installer;
pub mod platform;
pub mod smoke;

pub use archive::{ArchiveType, Extractor, TarExtractor};
pub use checksum::{sha256_hex, ChecksumType, Digest};
pub use descriptor::{default_install_dir, Manifest, PackageDescriptor};
pub use error::{InstallError, Result, TestError};
pub use fetch::{Fetcher, HttpFetcher, Progress};
pub use installer::{InstalledBinary, Installer};
pub use smoke::{smoke_test, smoke_test_with_arg};
