//! End-to-end install tests over a local HTTP server.

use std::io::Write;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use octoget_core::checksum::{sha256_hex, Digest};
use octoget_core::descriptor::PackageDescriptor;
use octoget_core::installer::Installer;
use octoget_core::smoke::smoke_test;
use octoget_core::InstallError;

fn tar_gz_with_entry(name: &str, data: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append_data(&mut header, name, data).unwrap();
    let tar_bytes = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    encoder.finish().unwrap()
}

/// Serve `body` from an ephemeral port, answering every request until
/// the returned server handle is dropped.
fn serve(body: Vec<u8>) -> (Arc<tiny_http::Server>, String) {
    let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
    let addr = server.server_addr().to_ip().unwrap();

    let handle = server.clone();
    std::thread::spawn(move || {
        while let Ok(request) = handle.recv() {
            let _ = request.respond(tiny_http::Response::from_data(body.clone()));
        }
    });

    let url = format!("http://{}/octopus_0.1.0_Linux_x86_64.tar.gz", addr);
    (server, url)
}

fn descriptor(url: String, digest: &str, install_dir: &std::path::Path) -> PackageDescriptor {
    PackageDescriptor {
        name: "octopus".to_string(),
        version: "0.1.0".to_string(),
        source_url: url,
        expected_digest: Digest::parse(digest).unwrap(),
        binary_path_in_archive: "octopus".to_string(),
        install_dir: install_dir.to_path_buf(),
    }
}

#[tokio::test]
#[cfg_attr(not(unix), ignore)]
async fn install_and_smoke_test_end_to_end() {
    let script = b"#!/bin/sh\necho 'octopus version 0.1.0'\nexit 0\n";
    let archive = tar_gz_with_entry("octopus", script);
    let digest = sha256_hex(&archive);

    let (_server, url) = serve(archive);
    let temp = TempDir::new().unwrap();

    let installer = Installer::new().unwrap();
    let binary = installer
        .install(&descriptor(url, &digest, temp.path()), None)
        .await
        .unwrap();

    assert_eq!(binary.path(), temp.path().join("octopus"));
    assert_eq!(std::fs::read(binary.path()).unwrap(), script);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(binary.path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    smoke_test(&binary).unwrap();
}

#[tokio::test]
async fn tampered_digest_aborts_before_any_write() {
    let archive = tar_gz_with_entry("octopus", b"#!/bin/sh\nexit 0\n");
    let tampered = sha256_hex(b"not the archive");

    let (_server, url) = serve(archive);
    let temp = TempDir::new().unwrap();

    let installer = Installer::new().unwrap();
    let err = installer
        .install(&descriptor(url, &tampered, temp.path()), None)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::ChecksumMismatch { .. }));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn http_error_status_is_fetch_failed() {
    let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").unwrap());
    let addr = server.server_addr().to_ip().unwrap();

    let handle = server.clone();
    std::thread::spawn(move || {
        while let Ok(request) = handle.recv() {
            let response = tiny_http::Response::from_string("not found").with_status_code(404);
            let _ = request.respond(response);
        }
    });

    let url = format!("http://{}/missing.tar.gz", addr);
    let temp = TempDir::new().unwrap();
    let digest = sha256_hex(b"irrelevant");

    let installer = Installer::new().unwrap();
    let err = installer
        .install(&descriptor(url, &digest, temp.path()), None)
        .await
        .unwrap_err();

    match err {
        InstallError::FetchFailed { reason, .. } => assert!(reason.contains("404")),
        other => panic!("expected FetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn progress_callback_sees_complete_download() {
    use std::sync::atomic::{AtomicU64, Ordering};

    let archive = tar_gz_with_entry("octopus", b"#!/bin/sh\nexit 0\n");
    let digest = sha256_hex(&archive);
    let size = archive.len() as u64;

    let (_server, url) = serve(archive);
    let temp = TempDir::new().unwrap();

    let seen = Arc::new(AtomicU64::new(0));
    let seen_in_progress = seen.clone();
    let progress = move |downloaded: u64, _total: u64| {
        seen_in_progress.store(downloaded, Ordering::SeqCst);
    };

    let installer = Installer::new().unwrap();
    installer
        .install(&descriptor(url, &digest, temp.path()), Some(&progress))
        .await
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), size);
}
