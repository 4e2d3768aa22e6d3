//! Host platform naming for release assets.
//!
//! Upstream release archives are named after the goreleaser convention,
//! e.g. `octopus_0.1.0_Darwin_x86_64.tar.gz`, so the OS and architecture
//! vocabulary here follows those asset names rather than Rust's target
//! triples.

/// OS component of a release asset name (`Linux`, `Darwin`, `Windows`).
pub fn release_os() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

/// Architecture component of a release asset name.
pub fn release_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x86_64",
        "aarch64" => "arm64",
        "x86" => "i386",
        "arm" => "armv7",
        other => other,
    }
}

/// Combined platform identifier, for display and logging.
pub fn platform() -> String {
    format!("{}_{}", release_os(), release_arch())
}
