//! Runtime libbpf version discovery.
//!
//! libbpf exports no version query, so when it may be linked dynamically
//! the version is read from the soname of the mapped shared object, e.g.
//! `/usr/lib/libbpf.so.1.4.5` in `/proc/self/maps`. The build-time version
//! is used whenever nothing better is found.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use bpfenv_common::config::BootstrapConfig;
use bpfenv_common::constants::{LIBBPF_SONAME_PREFIX, LIBBPF_VERSION};
use bpfenv_common::error::{BpfEnvError, Result};
use bpfenv_common::types::{LibraryVersion, VersionSource};
use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, digit1, hex_digit1, space1},
    combinator::opt,
    sequence::preceded,
};

fn token(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|b: u8| !b.is_ascii_whitespace()).parse(input)
}

/// Parses one `/proc/<pid>/maps` record, returning its backing path if any.
///
/// Layout: `start-end perms offset major:minor inode [path]`.
fn maps_record(input: &[u8]) -> IResult<&[u8], Option<&[u8]>> {
    let (input, _) = (hex_digit1, char('-'), hex_digit1, space1).parse(input)?;
    let (input, _) = (token, space1).parse(input)?;
    let (input, _) = (hex_digit1, space1).parse(input)?;
    let (input, _) = (hex_digit1, char(':'), hex_digit1, space1).parse(input)?;
    let (input, _) = digit1.parse(input)?;
    opt(preceded(space1, token)).parse(input)
}

/// Returns the backing path of a mapping line, if the line has one.
pub fn mapping_path(line: &[u8]) -> Option<&[u8]> {
    maps_record(line).ok().and_then(|(_, path)| path)
}

/// Returns the raw version suffix of the first mapping backed by libbpf.
///
/// A path qualifies when it contains `libbpf.so.` followed by at least one
/// byte; the suffix is returned verbatim.
pub fn find_runtime_version(maps: &[u8]) -> Option<&[u8]> {
    let prefix = LIBBPF_SONAME_PREFIX.as_bytes();
    maps.split(|&b| b == b'\n')
        .filter_map(mapping_path)
        .filter_map(|path| {
            let at = path.windows(prefix.len()).position(|w| w == prefix)?;
            Some(&path[at + prefix.len()..])
        })
        .find(|suffix| !suffix.is_empty())
}

/// Reads `maps_file` and extracts the runtime libbpf version.
///
/// Bytes that are not UTF-8 are replaced before the suffix is bounded, so
/// the version never exceeds its byte capacity.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, or `ParseFallback` if no
/// libbpf mapping is present.
pub fn runtime_version(maps_file: &Path) -> Result<LibraryVersion> {
    let maps = std::fs::read(maps_file).map_err(|e| BpfEnvError::Io {
        path: maps_file.to_path_buf(),
        source: e,
    })?;
    let suffix = find_runtime_version(&maps).ok_or(BpfEnvError::ParseFallback {
        what: "libbpf mapping",
    })?;
    Ok(LibraryVersion::new(
        &String::from_utf8_lossy(suffix),
        VersionSource::Runtime,
    ))
}

/// Resolves the active libbpf version once and caches it.
#[derive(Debug)]
pub struct VersionResolver {
    compile_version: String,
    maps_file: PathBuf,
    dynamic: bool,
    resolved: OnceLock<LibraryVersion>,
}

impl VersionResolver {
    /// Creates a resolver from the bootstrap configuration.
    ///
    /// Runtime discovery needs both the `dynamic-libbpf` feature and
    /// [`BootstrapConfig::dynamic_libbpf`].
    #[must_use]
    pub fn new(config: &BootstrapConfig) -> Self {
        Self {
            compile_version: config.compile_version.clone(),
            maps_file: config.maps_file.clone(),
            dynamic: cfg!(feature = "dynamic-libbpf") && config.dynamic_libbpf,
            resolved: OnceLock::new(),
        }
    }

    /// Returns the active libbpf version. Never fails.
    pub fn resolve(&self) -> &LibraryVersion {
        self.resolved.get_or_init(|| self.discover())
    }

    fn discover(&self) -> LibraryVersion {
        let compile_version = if self.compile_version.is_empty() {
            LIBBPF_VERSION
        } else {
            &self.compile_version
        };
        let fallback = LibraryVersion::new(compile_version, VersionSource::CompileTime);
        if !self.dynamic {
            return fallback;
        }
        match runtime_version(&self.maps_file) {
            Ok(version) => {
                tracing::debug!(version = %version, "found runtime libbpf version");
                version
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "couldn't find runtime libbpf version - falling back to compile-time value"
                );
                fallback
            }
        }
    }
}
