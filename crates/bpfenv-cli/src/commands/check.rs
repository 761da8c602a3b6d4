//! `bpfenv check` — Verify privilege and raise the memlock limit.

use bpfenv_core::Bootstrap;
use clap::Args;

use crate::output;

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Lock limit to request instead of the default 1 MiB (0 doubles the current limit).
    #[arg(long)]
    pub min_lock: Option<u64>,
}

/// Executes the `check` command.
///
/// A failed limit raise is reported but does not fail the command.
///
/// # Errors
///
/// Returns an error if the process is not running as root.
pub fn execute(bootstrap: &Bootstrap, args: &CheckArgs) -> anyhow::Result<()> {
    let minimum = args.min_lock.unwrap_or(bootstrap.config().min_lock_limit);
    bootstrap.check_environment_with(minimum)?;

    match bootstrap.lock_limits() {
        Some(limits) => println!(
            "environment ok: memlock soft {} / hard {}",
            output::format_limit(limits.soft),
            output::format_limit(limits.hard)
        ),
        None => println!("environment ok: memlock limit unreadable"),
    }
    Ok(())
}
