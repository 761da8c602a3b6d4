//! Process bootstrap state.
//!
//! [`Bootstrap`] owns the resolve-once caches for the bpffs mount and the
//! libbpf version. Create one per process and pass it by reference; the
//! caches are [`std::sync::OnceLock`]s, so concurrent first calls are
//! serialized and every caller observes the same outcome.

use std::path::{Path, PathBuf};

use bpfenv_common::config::BootstrapConfig;
use bpfenv_common::error::Result;
use bpfenv_common::types::{Importance, LibraryVersion, LimitPair};

use crate::mount::{HostProbe, MountProbe, MountResolver};
use crate::privilege;
use crate::rlimit::{self, HostLimits, LimitSource};
use crate::version::VersionResolver;

/// Bootstrap entry points for a process that works with pinned BPF objects.
#[derive(Debug)]
pub struct Bootstrap<P = HostProbe, L = HostLimits> {
    config: BootstrapConfig,
    mounts: MountResolver<P>,
    limits: L,
    version: VersionResolver,
}

impl Bootstrap {
    /// Creates bootstrap state against the running host with build-time defaults.
    #[must_use]
    pub fn host() -> Self {
        Self::with_parts(BootstrapConfig::default(), HostProbe, HostLimits)
    }
}

impl<P: MountProbe, L: LimitSource> Bootstrap<P, L> {
    /// Creates bootstrap state with explicit host access.
    pub fn with_parts(config: BootstrapConfig, probe: P, limits: L) -> Self {
        let mounts = MountResolver::new(&config, probe);
        let version = VersionResolver::new(&config);
        Self {
            config,
            mounts,
            limits,
            version,
        }
    }

    /// Returns the configuration this state was built from.
    pub const fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Returns the mount resolver.
    pub const fn mounts(&self) -> &MountResolver<P> {
        &self.mounts
    }

    /// Returns the resolved bpffs mount point.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if bpffs is not mounted and cannot be established.
    pub fn mount_point(&self) -> Result<&Path> {
        self.mounts.mount_point()
    }

    /// Returns the working directory under the bpffs mount, optionally with
    /// `subdir` appended, bounded to `capacity` bytes.
    ///
    /// Resolution failures are logged at warn for [`Importance::Required`]
    /// callers and at debug for [`Importance::Optional`] ones.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if bpffs is unavailable, or `PathTooLong` if the
    /// path does not fit `capacity`.
    pub fn work_dir(
        &self,
        subdir: Option<&str>,
        capacity: usize,
        importance: Importance,
    ) -> Result<PathBuf> {
        if self.mounts.mount_point().is_err() {
            match importance {
                Importance::Required => {
                    tracing::warn!("could not find BPF working dir - bpffs not mounted?");
                }
                Importance::Optional => {
                    tracing::debug!("could not find BPF working dir - bpffs not mounted?");
                }
            }
        }
        self.mounts.work_dir(subdir, capacity)
    }

    /// Raises the memlock limit through this state's limit source.
    ///
    /// # Errors
    ///
    /// Returns `LimitUnavailable`; callers are expected to log and ignore it.
    pub fn raise_lock_limit(&self, minimum: Option<u64>) -> Result<()> {
        rlimit::raise_lock_limit(&self.limits, minimum)
    }

    /// Returns the current memlock limits, if readable.
    pub fn lock_limits(&self) -> Option<LimitPair> {
        self.limits.get().ok()
    }

    /// Checks that the process may operate on kernel objects.
    ///
    /// Rejects a non-root `euid`, then raises the memlock limit to
    /// `minimum` bytes (0 doubles the current limit). A failed raise is
    /// logged and does not fail the check.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if `euid` is not root.
    pub fn check_environment_as(&self, euid: u32, minimum: u64) -> Result<()> {
        privilege::require_root(euid)?;
        if let Err(e) = self.raise_lock_limit(Some(minimum)) {
            tracing::debug!(error = %e, minimum, "continuing without raising memlock limit");
        }
        Ok(())
    }

    /// [`Self::check_environment_as`] for the calling process's effective uid.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the process is not running as root.
    pub fn check_environment_with(&self, minimum: u64) -> Result<()> {
        self.check_environment_as(privilege::effective_uid(), minimum)
    }

    /// Runs the environment check with the configured minimum lock limit.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if the process is not running as root.
    pub fn check_environment(&self) -> Result<()> {
        self.check_environment_with(self.config.min_lock_limit)
    }

    /// Returns the active libbpf version.
    pub fn libbpf_version(&self) -> &LibraryVersion {
        self.version.resolve()
    }
}

#[cfg(test)]
mod tests {
    use bpfenv_common::constants::{BPF_FS_MAGIC, PATH_MAX};
    use bpfenv_common::error::BpfEnvError;

    use super::*;
    use crate::mount::tests::FakeProbe;
    use crate::rlimit::tests::FakeLimits;

    const MIB: u64 = 1024 * 1024;

    fn bootstrap(probe: FakeProbe, limits: FakeLimits) -> Bootstrap<FakeProbe, FakeLimits> {
        Bootstrap::with_parts(BootstrapConfig::default(), probe, limits)
    }

    #[test]
    fn root_check_raises_limit_to_one_mib() {
        let b = bootstrap(FakeProbe::default(), FakeLimits::new(64 * 1024, 64 * 1024));
        b.check_environment_as(0, MIB).unwrap();
        assert_eq!(b.lock_limits(), Some(LimitPair::new(MIB, MIB)));
    }

    #[test]
    fn root_check_honours_custom_minimum() {
        let b = bootstrap(FakeProbe::default(), FakeLimits::new(64 * 1024, 64 * 1024));
        b.check_environment_as(0, 4 * MIB).unwrap();
        assert_eq!(b.lock_limits(), Some(LimitPair::new(4 * MIB, 4 * MIB)));
    }

    #[test]
    fn zero_minimum_doubles_current_limit() {
        let b = bootstrap(FakeProbe::default(), FakeLimits::new(64 * 1024, 64 * 1024));
        b.check_environment_as(0, 0).unwrap();
        assert_eq!(b.lock_limits(), Some(LimitPair::new(128 * 1024, 128 * 1024)));
    }

    #[test]
    fn non_root_is_rejected_before_touching_limits() {
        let limits = FakeLimits::new(64 * 1024, 64 * 1024);
        let b = bootstrap(FakeProbe::default(), limits);
        let err = b.check_environment_as(1000, MIB).unwrap_err();
        assert!(matches!(err, BpfEnvError::PermissionDenied { .. }));
        assert_eq!(b.lock_limits(), Some(LimitPair::new(64 * 1024, 64 * 1024)));
    }

    #[test]
    fn limit_failure_does_not_fail_check() {
        let limits = FakeLimits {
            fail_set: Some(std::io::ErrorKind::PermissionDenied),
            ..FakeLimits::new(64 * 1024, 64 * 1024)
        };
        let b = bootstrap(FakeProbe::default(), limits);
        assert!(b.check_environment_as(0, MIB).is_ok());
    }

    #[test]
    fn unlimited_memlock_does_not_fail_check() {
        let b = bootstrap(
            FakeProbe::default(),
            FakeLimits::new(LimitPair::UNLIMITED, LimitPair::UNLIMITED),
        );
        assert!(b.check_environment_as(0, MIB).is_ok());
    }

    #[test]
    fn work_dir_returns_same_path_every_call() {
        let probe = FakeProbe::default().with_magic("/sys/fs/bpf", BPF_FS_MAGIC);
        let b = bootstrap(probe, FakeLimits::new(MIB, MIB));
        let first = b.work_dir(Some("xdp"), PATH_MAX, Importance::Required).unwrap();
        let second = b.work_dir(Some("xdp"), PATH_MAX, Importance::Optional).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Path::new("/sys/fs/bpf/xdp"));
    }

    #[test]
    fn work_dir_failure_is_not_found_for_either_importance() {
        let b = bootstrap(FakeProbe::default(), FakeLimits::new(MIB, MIB));
        for importance in [Importance::Required, Importance::Optional] {
            assert!(matches!(
                b.work_dir(None, PATH_MAX, importance),
                Err(BpfEnvError::NotFound { .. })
            ));
        }
        assert!(b.mounts().is_resolved());
    }

    #[test]
    fn version_is_available_without_host_access() {
        let b = bootstrap(FakeProbe::default(), FakeLimits::new(MIB, MIB));
        assert!(!b.libbpf_version().as_str().is_empty());
    }
}
