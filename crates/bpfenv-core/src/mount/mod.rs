//! bpffs mount-point resolution.
//!
//! Resolution runs at most once per [`MountResolver`]: known candidates are
//! probed with `statfs(2)`, then the live mount table is scanned, and as a
//! last resort the canonical directory is created and re-checked. The
//! outcome, failure included, is cached for the resolver's lifetime.

pub mod probe;
pub mod table;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use bpfenv_common::config::BootstrapConfig;
use bpfenv_common::constants::PATH_MAX;
use bpfenv_common::error::{BpfEnvError, Result};

pub use self::probe::{HostProbe, MountProbe};
use crate::path;

/// Locates, or establishes, the bpffs mount point.
#[derive(Debug)]
pub struct MountResolver<P = HostProbe> {
    probe: P,
    default_mount: PathBuf,
    known_mounts: Vec<PathBuf>,
    fs_type: String,
    fs_magic: u32,
    mount_table: PathBuf,
    capacity: usize,
    resolved: OnceLock<Option<PathBuf>>,
}

impl<P: MountProbe> MountResolver<P> {
    /// Creates a resolver that queries the host through `probe`.
    pub fn new(config: &BootstrapConfig, probe: P) -> Self {
        Self {
            probe,
            default_mount: config.default_mount.clone(),
            known_mounts: config.known_mounts.clone(),
            fs_type: config.fs_type.clone(),
            fs_magic: config.fs_magic,
            mount_table: config.mount_table.clone(),
            capacity: config.mount_capacity,
            resolved: OnceLock::new(),
        }
    }

    /// Returns the underlying probe.
    pub const fn probe(&self) -> &P {
        &self.probe
    }

    /// Returns `true` once resolution has run, whatever its outcome.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Returns the bpffs mount point, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no mount point was found or established. The
    /// failure is permanent for this resolver.
    pub fn mount_point(&self) -> Result<&Path> {
        self.resolved
            .get_or_init(|| self.resolve())
            .as_deref()
            .ok_or_else(|| BpfEnvError::NotFound {
                kind: "bpffs mount",
                detail: format!(
                    "no {} filesystem at known mounts or in {}",
                    self.fs_type,
                    self.mount_table.display()
                ),
            })
    }

    /// Returns the mount point, or `mount/subdir` when `subdir` is given.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if resolution failed, or `PathTooLong` if the
    /// result does not fit `capacity`.
    pub fn work_dir(&self, subdir: Option<&str>, capacity: usize) -> Result<PathBuf> {
        let mount = self.mount_point()?;
        path::bounded_path(mount, subdir, capacity)
    }

    fn is_valid_mount(&self, path: &Path) -> bool {
        self.probe.fs_magic(path) == Some(self.fs_magic)
    }

    fn resolve(&self) -> Option<PathBuf> {
        let found = self.find_mount().or_else(|| self.establish_default());
        match &found {
            Some(path) => tracing::debug!(path = %path.display(), "resolved bpffs mount"),
            None => tracing::debug!("bpffs mount resolution failed"),
        }
        found
    }

    fn find_mount(&self) -> Option<PathBuf> {
        for candidate in &self.known_mounts {
            if path::ensure_fits(candidate, self.capacity).is_err() {
                continue;
            }
            if self.is_valid_mount(candidate) {
                return Some(candidate.clone());
            }
        }

        // A full mount path may not fit a shorter buffer, so only the
        // canonical capacity scans the table.
        if self.capacity != PATH_MAX {
            tracing::trace!(capacity = self.capacity, "skipping mount table scan");
            return None;
        }

        match self.probe.read_mount_table(&self.mount_table) {
            Ok(raw) => table::find_by_type(&raw, &self.fs_type, self.capacity),
            Err(e) => {
                tracing::debug!(
                    table = %self.mount_table.display(),
                    error = %e,
                    "could not read mount table"
                );
                None
            }
        }
    }

    fn establish_default(&self) -> Option<PathBuf> {
        let target = &self.default_mount;
        match self.probe.create_dir(target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "mkdir failed");
                return None;
            }
        }

        if !self.is_valid_mount(target) {
            tracing::debug!(path = %target.display(), "directory is not backed by bpffs");
            return None;
        }
        Some(target.clone())
    }
}
