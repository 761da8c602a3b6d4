//! Bootstrap configuration model.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Inputs shared by the mount, lock-limit and version resolvers.
///
/// [`Default`] yields the build-time values; other values exist mainly so
/// tests can point the resolvers at fixture files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Canonical mount point, created when no bpffs mount is found.
    pub default_mount: PathBuf,
    /// Candidate mount points probed in order before the mount table.
    pub known_mounts: Vec<PathBuf>,
    /// Filesystem type name expected in the mount table.
    pub fs_type: String,
    /// Filesystem magic expected from `statfs(2)`.
    pub fs_magic: u32,
    /// Mount table pseudo-file.
    pub mount_table: PathBuf,
    /// Capacity of the mount-point buffer. The mount-table scan only runs
    /// when this equals [`constants::PATH_MAX`].
    pub mount_capacity: usize,
    /// Memory-mapping pseudo-file scanned for the runtime libbpf version.
    pub maps_file: PathBuf,
    /// Version reported when runtime discovery finds nothing.
    pub compile_version: String,
    /// Attempt runtime version discovery at all.
    pub dynamic_libbpf: bool,
    /// Default BPF object install location.
    pub object_path: PathBuf,
    /// Lock limit requested by the environment check.
    pub min_lock_limit: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            default_mount: PathBuf::from(constants::BPF_DIR_MNT),
            known_mounts: vec![
                PathBuf::from(constants::BPF_DIR_MNT),
                PathBuf::from(constants::BPF_LEGACY_MNT),
            ],
            fs_type: constants::BPF_FS_TYPE.to_owned(),
            fs_magic: constants::BPF_FS_MAGIC,
            mount_table: PathBuf::from(constants::PROC_MOUNTS),
            mount_capacity: constants::PATH_MAX,
            maps_file: PathBuf::from(constants::PROC_SELF_MAPS),
            compile_version: constants::LIBBPF_VERSION.to_owned(),
            dynamic_libbpf: true,
            object_path: PathBuf::from(constants::BPF_OBJECT_PATH),
            min_lock_limit: constants::DEFAULT_MIN_LOCK_LIMIT,
        }
    }
}
