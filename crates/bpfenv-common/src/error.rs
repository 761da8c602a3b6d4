//! Unified error types for the bpfenv workspace.
//!
//! Propagation policy: privilege and mount-resolution failures reach the
//! caller; lock-limit and version-resolution failures are logged and
//! absorbed by the bootstrap sequence because both have safe fallbacks.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BpfEnvError {
    /// The bpffs mount point is absent and could not be established.
    #[error("{kind} not found: {detail}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// What was searched for.
        detail: String,
    },

    /// The operation needs elevated privilege.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Description of the denied operation.
        message: String,
    },

    /// The lockable-memory limit could not be read or raised.
    #[error("memlock limit unavailable: {message}")]
    LimitUnavailable {
        /// What went wrong.
        message: String,
        /// Underlying OS error, if any.
        #[source]
        source: Option<std::io::Error>,
    },

    /// A formatted path would not fit its destination capacity.
    #[error("path too long: {len} bytes does not fit capacity {capacity}")]
    PathTooLong {
        /// Length of the formatted path in bytes.
        len: usize,
        /// Capacity of the destination, terminator included.
        capacity: usize,
    },

    /// A system pseudo-file held no usable record.
    #[error("no usable {what} found, using fallback")]
    ParseFallback {
        /// What was being parsed.
        what: &'static str,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid or unsupported on this platform.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BpfEnvError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn path_too_long_reports_both_sizes() {
        let err = BpfEnvError::PathTooLong {
            len: 20,
            capacity: 16,
        };
        let msg = err.to_string();
        assert!(msg.contains("20"), "got: {msg}");
        assert!(msg.contains("16"), "got: {msg}");
    }

    #[test]
    fn limit_unavailable_exposes_os_source() {
        let err = BpfEnvError::LimitUnavailable {
            message: "couldn't raise rlimit".into(),
            source: Some(std::io::Error::from_raw_os_error(1)),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn limit_unavailable_without_source() {
        let err = BpfEnvError::LimitUnavailable {
            message: "current rlimit is infinity or 0".into(),
            source: None,
        };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("infinity or 0"));
    }
}
