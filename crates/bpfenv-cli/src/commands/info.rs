//! `bpfenv info` — Print a full environment report.

use std::path::PathBuf;

use bpfenv_common::types::{LibraryVersion, LimitPair};
use bpfenv_core::Bootstrap;
use clap::Args;
use serde::Serialize;

use crate::output;

/// Arguments for the `info` command.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Snapshot of the bootstrap-relevant environment.
#[derive(Debug, Serialize)]
pub struct EnvironmentReport {
    /// Resolved bpffs mount point, if any.
    pub mount_point: Option<PathBuf>,
    /// Effective uid of this process.
    pub euid: u32,
    /// Current memlock limits, if readable.
    pub lock_limits: Option<LimitPair>,
    /// Active libbpf version.
    pub libbpf_version: LibraryVersion,
    /// Default BPF object install location.
    pub object_path: PathBuf,
}

impl EnvironmentReport {
    /// Collects a report without changing the memlock limits.
    pub fn collect(bootstrap: &Bootstrap) -> Self {
        Self {
            mount_point: bootstrap.mount_point().ok().map(PathBuf::from),
            euid: bpfenv_core::privilege::effective_uid(),
            lock_limits: bootstrap.lock_limits(),
            libbpf_version: bootstrap.libbpf_version().clone(),
            object_path: bootstrap.config().object_path.clone(),
        }
    }
}

/// Executes the `info` command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(bootstrap: &Bootstrap, args: &InfoArgs) -> anyhow::Result<()> {
    let report = EnvironmentReport::collect(bootstrap);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mount = report
        .mount_point
        .as_ref()
        .map_or_else(|| "not found".to_string(), |p| p.display().to_string());
    println!("{:<16} {}", "bpffs mount", mount);
    println!("{:<16} {}", "euid", report.euid);
    match report.lock_limits {
        Some(limits) => println!(
            "{:<16} {} / {}",
            "memlock",
            output::format_limit(limits.soft),
            output::format_limit(limits.hard)
        ),
        None => println!("{:<16} unreadable", "memlock"),
    }
    println!(
        "{:<16} {} ({})",
        "libbpf",
        report.libbpf_version,
        report.libbpf_version.source()
    );
    println!("{:<16} {}", "object path", report.object_path.display());
    Ok(())
}
