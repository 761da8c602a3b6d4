//! Integration tests for the bootstrap sequence against real files.
//!
//! The host probe is exercised for real; mount tables and memory maps are
//! fixture files in a temporary directory so no root access is needed:
//! 1. Mount-table fallback resolution
//! 2. Default directory creation and verification
//! 3. Working-directory bounds
//! 4. Version discovery from a maps fixture
//! 5. Lock-limit escalation through a custom limit source

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::Cell;
use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use bpfenv_common::config::BootstrapConfig;
use bpfenv_common::constants::PATH_MAX;
use bpfenv_common::error::BpfEnvError;
use bpfenv_common::types::{Importance, LimitPair, VersionSource};
use bpfenv_core::Bootstrap;
use bpfenv_core::mount::HostProbe;
use bpfenv_core::rlimit::LimitSource;

struct StaticLimits(Cell<LimitPair>);

impl LimitSource for StaticLimits {
    fn get(&self) -> std::io::Result<LimitPair> {
        Ok(self.0.get())
    }

    fn set(&self, limits: LimitPair) -> std::io::Result<()> {
        self.0.set(limits);
        Ok(())
    }
}

fn fixture_config(root: &Path, mounts: &str) -> BootstrapConfig {
    let table = root.join("mounts");
    std::fs::write(&table, mounts).expect("write mount table");
    BootstrapConfig {
        default_mount: root.join("bpf"),
        known_mounts: vec![root.join("bpf"), root.join("legacy")],
        mount_table: table,
        maps_file: root.join("maps"),
        compile_version: "1.1.0".into(),
        ..BootstrapConfig::default()
    }
}

fn bootstrap(config: BootstrapConfig) -> Bootstrap<HostProbe, StaticLimits> {
    Bootstrap::with_parts(
        config,
        HostProbe,
        StaticLimits(Cell::new(LimitPair::new(65_536, 65_536))),
    )
}

// ── Mount resolution ─────────────────────────────────────────────────

#[test]
fn mount_table_entry_is_resolved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let b = bootstrap(fixture_config(
        dir.path(),
        "proc /proc proc rw 0 0\nbpf /srv/pinned\\040maps bpf rw,relatime 0 0\n",
    ));
    assert_eq!(b.mount_point().unwrap(), Path::new("/srv/pinned maps"));
    assert!(!dir.path().join("bpf").exists());
}

#[test]
fn non_utf8_mount_table_entry_is_resolved_exactly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path(), "");
    std::fs::write(&config.mount_table, b"bpf /mnt/caf\xe9 bpf rw 0 0\n").unwrap();
    let b = bootstrap(config);
    let expected = PathBuf::from(OsString::from_vec(b"/mnt/caf\xe9".to_vec()));
    assert_eq!(b.mount_point().unwrap(), expected.as_path());
    assert_eq!(
        b.work_dir(Some("maps"), PATH_MAX, Importance::Required).unwrap(),
        expected.join("maps")
    );
}

#[test]
fn unverified_default_dir_is_created_but_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let b = bootstrap(fixture_config(dir.path(), "proc /proc proc rw 0 0\n"));

    let err = b
        .work_dir(Some("xdp"), PATH_MAX, Importance::Optional)
        .unwrap_err();
    assert!(matches!(err, BpfEnvError::NotFound { .. }), "got: {err}");

    let created = dir.path().join("bpf");
    assert!(created.is_dir());
    let mode = std::fs::metadata(&created).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0);
}

#[test]
fn failed_resolution_is_permanent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path(), "");
    let table = config.mount_table.clone();
    let b = bootstrap(config);
    assert!(b.mount_point().is_err());

    std::fs::write(&table, "bpf /sys/fs/bpf bpf rw 0 0\n").unwrap();
    assert!(b.mount_point().is_err());
}

#[test]
fn missing_mount_table_falls_through_to_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = fixture_config(dir.path(), "");
    config.mount_table = PathBuf::from(dir.path()).join("no-such-table");
    let b = bootstrap(config);
    assert!(b.mount_point().is_err());
    assert!(dir.path().join("bpf").is_dir());
}

#[test]
fn work_dir_too_long_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let b = bootstrap(fixture_config(dir.path(), "bpf /run/bpf bpf rw 0 0\n"));
    let err = b
        .work_dir(Some("maps"), 10, Importance::Required)
        .unwrap_err();
    assert!(matches!(err, BpfEnvError::PathTooLong { len: 13, capacity: 10 }));
    assert_eq!(
        b.work_dir(Some("maps"), PATH_MAX, Importance::Required).unwrap(),
        Path::new("/run/bpf/maps")
    );
}

// ── Version discovery ────────────────────────────────────────────────

#[cfg(feature = "dynamic-libbpf")]
#[test]
fn runtime_version_overrides_compile_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path(), "");
    std::fs::write(
        &config.maps_file,
        "7f1e00000000-7f1e00021000 r-xp 00000000 08:01 393237  /usr/lib/x86_64-linux-gnu/libbpf.so.1.3.0\n",
    )
    .unwrap();
    let b = bootstrap(config);
    assert_eq!(b.libbpf_version().as_str(), "1.3.0");
    assert_eq!(b.libbpf_version().source(), VersionSource::Runtime);
}

#[test]
fn absent_maps_falls_back_to_compile_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let b = bootstrap(fixture_config(dir.path(), ""));
    assert_eq!(b.libbpf_version().as_str(), "1.1.0");
    assert_eq!(b.libbpf_version().source(), VersionSource::CompileTime);
}

// ── Lock limits ──────────────────────────────────────────────────────

#[test]
fn environment_check_as_root_raises_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let b = bootstrap(fixture_config(dir.path(), ""));
    b.check_environment_as(0, b.config().min_lock_limit).unwrap();
    assert_eq!(b.lock_limits(), Some(LimitPair::new(1_048_576, 1_048_576)));
}

#[test]
fn raising_without_minimum_doubles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let b = bootstrap(fixture_config(dir.path(), ""));
    b.raise_lock_limit(None).unwrap();
    assert_eq!(b.lock_limits(), Some(LimitPair::new(131_072, 131_072)));
}
