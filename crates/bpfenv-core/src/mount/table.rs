//! Parsing of the live mount table (`/proc/mounts`) using `nom`.
//!
//! Each record is `source mountpoint fstype options dump pass`. Only the
//! first three fields are interpreted; malformed lines are skipped. The
//! table is parsed as raw bytes since mount points need not be UTF-8.

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;
use std::path::PathBuf;

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{space0, space1},
    sequence::preceded,
};

/// One mounted filesystem as listed in the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    /// Mount source (device or pseudo name), lossily decoded.
    pub source: String,
    /// Decoded mount point, byte for byte.
    pub mount_point: PathBuf,
    /// Filesystem type name, lossily decoded.
    pub fs_type: String,
}

fn field(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|b: u8| !b.is_ascii_whitespace()).parse(input)
}

fn mount_record(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8], &[u8])> {
    let (input, (source, _, mount_point, _, fs_type)) =
        (preceded(space0, field), space1, field, space1, field).parse(input)?;
    Ok((input, (source, mount_point, fs_type)))
}

/// Decodes the `\ooo` octal escapes the kernel uses for whitespace and
/// backslashes in mount points. All other bytes are kept as-is.
fn unescape(bytes: &[u8]) -> PathBuf {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(&[a, b, c]) = bytes.get(i + 1..i + 4) {
                if (b'0'..=b'3').contains(&a)
                    && (b'0'..=b'7').contains(&b)
                    && (b'0'..=b'7').contains(&c)
                {
                    out.push(((a - b'0') << 6) | ((b - b'0') << 3) | (c - b'0'));
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    PathBuf::from(OsString::from_vec(out))
}

/// Parses a single mount-table line.
pub fn parse_line(line: &[u8]) -> Option<MountEntry> {
    let (_, (source, mount_point, fs_type)) = mount_record(line).ok()?;
    Some(MountEntry {
        source: String::from_utf8_lossy(source).into_owned(),
        mount_point: unescape(mount_point),
        fs_type: String::from_utf8_lossy(fs_type).into_owned(),
    })
}

/// Iterates the well-formed entries of a mount table.
pub fn entries(table: &[u8]) -> impl Iterator<Item = MountEntry> + '_ {
    table.split(|&b| b == b'\n').filter_map(parse_line)
}

/// Returns the mount point of the first entry of type `fs_type` whose path
/// fits in `capacity` bytes, terminator included.
pub fn find_by_type(table: &[u8], fs_type: &str, capacity: usize) -> Option<PathBuf> {
    entries(table)
        .filter(|e| e.fs_type == fs_type)
        .find(|e| {
            let fits = e.mount_point.as_os_str().len() < capacity;
            if !fits {
                tracing::debug!(
                    path = %e.mount_point.display(),
                    capacity,
                    "skipping mount point that exceeds capacity"
                );
            }
            fits
        })
        .map(|e| e.mount_point)
}
