//! Host access used by the mount resolver.

use std::io;
use std::path::Path;

/// Filesystem queries the mount resolver depends on.
///
/// Implementors report host state only; every decision is made by
/// [`super::MountResolver`].
pub trait MountProbe {
    /// Returns the `statfs(2)` filesystem magic of `path`, or `None` if the
    /// query fails.
    fn fs_magic(&self, path: &Path) -> Option<u32>;

    /// Reads the raw bytes of the mount table at `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    fn read_mount_table(&self, table: &Path) -> io::Result<Vec<u8>>;

    /// Creates a single directory with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns the raw creation error; `AlreadyExists` is left for the
    /// caller to interpret.
    fn create_dir(&self, path: &Path) -> io::Result<()>;
}

/// [`MountProbe`] backed by the running system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl MountProbe for HostProbe {
    #[cfg(target_os = "linux")]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn fs_magic(&self, path: &Path) -> Option<u32> {
        match nix::sys::statfs::statfs(path) {
            // Filesystem magics are 32-bit; `f_type` width varies by libc.
            Ok(st) => Some(st.filesystem_type().0 as u32),
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "statfs failed");
                None
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn fs_magic(&self, _path: &Path) -> Option<u32> {
        None
    }

    fn read_mount_table(&self, table: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(table)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::DirBuilderExt;

        std::fs::DirBuilder::new().mode(0o700).create(path)
    }
}
