//! Build-time constants and default system paths.
//!
//! Paths marked as overridable are read from the build environment with
//! `option_env!`, so packagers can relocate them without patching source.

/// Canonical bpffs mount point (`BPF_DIR_MNT` at build time).
pub const BPF_DIR_MNT: &str = match option_env!("BPF_DIR_MNT") {
    Some(path) => path,
    None => "/sys/fs/bpf",
};

/// Default install location for BPF object files (`BPF_OBJECT_PATH` at build time).
pub const BPF_OBJECT_PATH: &str = match option_env!("BPF_OBJECT_PATH") {
    Some(path) => path,
    None => "/usr/lib/bpf",
};

/// libbpf version known when this binary was built (`LIBBPF_VERSION` at build time).
pub const LIBBPF_VERSION: &str = match option_env!("LIBBPF_VERSION") {
    Some(version) => version,
    None => "1.4.0",
};

const _: () = assert!(
    !LIBBPF_VERSION.is_empty() && LIBBPF_VERSION.len() < VERSION_CAPACITY,
    "LIBBPF_VERSION must be non-empty and shorter than VERSION_CAPACITY"
);

/// Legacy bpffs location still used by some distributions.
pub const BPF_LEGACY_MNT: &str = "/bpf";

/// Filesystem type name of bpffs as listed in the mount table.
pub const BPF_FS_TYPE: &str = "bpf";

/// `f_type` reported by `statfs(2)` for bpffs.
pub const BPF_FS_MAGIC: u32 = 0xcafe_4a11;

/// Canonical path buffer size, terminator included.
pub const PATH_MAX: usize = 4096;

/// Live mount table of the calling process.
pub const PROC_MOUNTS: &str = "/proc/mounts";

/// Memory-mapping description of the calling process.
pub const PROC_SELF_MAPS: &str = "/proc/self/maps";

/// Shared-object name prefix that precedes the libbpf version in a mapping path.
pub const LIBBPF_SONAME_PREFIX: &str = "libbpf.so.";

/// Storage reserved for a version string, terminator included.
pub const VERSION_CAPACITY: usize = 10;

/// Minimum `RLIMIT_MEMLOCK` soft limit requested during the environment check (1 MiB).
pub const DEFAULT_MIN_LOCK_LIMIT: u64 = 1024 * 1024;
