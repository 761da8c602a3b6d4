//! `bpfenv workdir` — Print the bpffs working directory.

use bpfenv_common::constants::PATH_MAX;
use bpfenv_common::types::Importance;
use bpfenv_core::Bootstrap;
use clap::Args;

/// Arguments for the `workdir` command.
#[derive(Args, Debug)]
pub struct WorkdirArgs {
    /// Subdirectory to append to the mount point.
    pub subdir: Option<String>,

    /// Report a missing bpffs at debug level instead of warning.
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum path length, terminator included.
    #[arg(long, default_value_t = PATH_MAX)]
    pub capacity: usize,
}

/// Executes the `workdir` command.
///
/// # Errors
///
/// Returns an error if bpffs cannot be found or the path does not fit.
pub fn execute(bootstrap: &Bootstrap, args: &WorkdirArgs) -> anyhow::Result<()> {
    let importance = if args.quiet {
        Importance::Optional
    } else {
        Importance::Required
    };
    let dir = bootstrap.work_dir(args.subdir.as_deref(), args.capacity, importance)?;
    println!("{}", dir.display());
    Ok(())
}
