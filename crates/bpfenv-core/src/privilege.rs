//! Effective-uid gate for kernel object operations.

use bpfenv_common::error::{BpfEnvError, Result};

/// Fails unless `euid` is root.
///
/// # Errors
///
/// Returns `PermissionDenied` for any non-zero uid.
pub fn require_root(euid: u32) -> Result<()> {
    if euid != 0 {
        tracing::warn!(euid, "this program must be run as root");
        return Err(BpfEnvError::PermissionDenied {
            message: "this program must be run as root".into(),
        });
    }
    Ok(())
}

/// Returns the effective uid of the calling process.
pub fn effective_uid() -> u32 {
    nix::unistd::geteuid().as_raw()
}
