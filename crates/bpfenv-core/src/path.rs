//! Bounded path formatting.
//!
//! Capacities count a terminator byte the way `PATH_MAX` does, so a path
//! fits only when its length is strictly below the capacity.

use std::path::{Path, PathBuf};

use bpfenv_common::error::{BpfEnvError, Result};

/// Fails with [`BpfEnvError::PathTooLong`] unless `path` fits `capacity`.
///
/// # Errors
///
/// Returns `PathTooLong` when `path` is `capacity` bytes or longer.
pub fn ensure_fits(path: &Path, capacity: usize) -> Result<()> {
    let len = path.as_os_str().len();
    if len >= capacity {
        return Err(BpfEnvError::PathTooLong { len, capacity });
    }
    Ok(())
}

/// Joins `base` and an optional `subdir` as `base/subdir`.
///
/// The subdirectory is appended textually: it is never interpreted as an
/// absolute path that replaces `base`.
///
/// # Errors
///
/// Returns `PathTooLong` when the joined path does not fit `capacity`.
pub fn bounded_path(base: &Path, subdir: Option<&str>, capacity: usize) -> Result<PathBuf> {
    let path = match subdir {
        Some(sub) => {
            let mut joined = base.as_os_str().to_owned();
            joined.push("/");
            joined.push(sub);
            PathBuf::from(joined)
        }
        None => base.to_path_buf(),
    };
    ensure_fits(&path, capacity)?;
    Ok(path)
}
