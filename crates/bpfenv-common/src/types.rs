//! Domain primitive types used across the bpfenv workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::VERSION_CAPACITY;

/// Soft and hard `RLIMIT_MEMLOCK` values, in bytes.
///
/// `u64::MAX` stands for "unlimited" regardless of the platform's `rlim_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitPair {
    /// Current (soft) limit.
    pub soft: u64,
    /// Maximum (hard) limit.
    pub hard: u64,
}

impl LimitPair {
    /// Sentinel for an unlimited value.
    pub const UNLIMITED: u64 = u64::MAX;

    /// Creates a limit pair.
    #[must_use]
    pub const fn new(soft: u64, hard: u64) -> Self {
        Self { soft, hard }
    }

    /// Returns `true` if the soft limit is unlimited.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.soft == Self::UNLIMITED
    }
}

/// How loudly a caller wants mount-resolution failures reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Importance {
    /// The caller cannot continue without bpffs; failures log at warn.
    #[default]
    Required,
    /// The caller probes opportunistically; failures log at debug.
    Optional,
}

/// Where an active libbpf version string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionSource {
    /// Found in the process memory mappings.
    Runtime,
    /// Fixed when the binary was built.
    CompileTime,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime => write!(f, "runtime"),
            Self::CompileTime => write!(f, "compile-time"),
        }
    }
}

/// A libbpf version string bounded to [`VERSION_CAPACITY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryVersion {
    value: String,
    source: VersionSource,
}

impl LibraryVersion {
    /// Creates a version, truncating `value` to at most
    /// `VERSION_CAPACITY - 1` bytes on a char boundary.
    #[must_use]
    pub fn new(value: &str, source: VersionSource) -> Self {
        let mut end = value.len().min(VERSION_CAPACITY - 1);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        Self {
            value: value[..end].to_owned(),
            source,
        }
    }

    /// Returns the version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns where the version came from.
    #[must_use]
    pub const fn source(&self) -> VersionSource {
        self.source
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
