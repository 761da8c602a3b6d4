//! Formatted output helpers for CLI commands.

use bpfenv_common::types::LimitPair;

/// Formats a byte count into a human-readable string (e.g., "128.0 MiB").
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Formats a resource limit, spelling out the unlimited sentinel.
#[must_use]
pub fn format_limit(limit: u64) -> String {
    if limit == LimitPair::UNLIMITED {
        "unlimited".to_string()
    } else {
        format_bytes(limit)
    }
}
