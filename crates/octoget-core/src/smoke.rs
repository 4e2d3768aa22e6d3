//! Post-install smoke test.

use std::process::Command;

use crate::error::TestError;
use crate::installer::InstalledBinary;

/// Flag passed to the installed binary by the default smoke test
pub const VERSION_FLAG: &str = "--version";

/// Run the installed binary once with `--version` and check it exits 0.
///
/// A single deterministic invocation, no retries: failure to launch or
/// a non-zero exit fails the test.
pub fn smoke_test(binary: &InstalledBinary) -> Result<(), TestError> {
    smoke_test_with_arg(binary, VERSION_FLAG)
}

/// Run the installed binary once with the given flag
pub fn smoke_test_with_arg(binary: &InstalledBinary, arg: &str) -> Result<(), TestError> {
    log::debug!("smoke test: {} {}", binary.path().display(), arg);

    let output = Command::new(binary.path()).arg(arg).output().map_err(|e| {
        TestError::ExecutionFailed {
            path: binary.path().to_path_buf(),
            reason: format!("failed to launch: {}", e),
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TestError::ExecutionFailed {
            path: binary.path().to_path_buf(),
            reason: match output.status.code() {
                Some(code) if stderr.trim().is_empty() => format!("exited with status {}", code),
                Some(code) => format!("exited with status {}: {}", code, stderr.trim()),
                None => "terminated by signal".to_string(),
            },
        });
    }

    Ok(())
}
