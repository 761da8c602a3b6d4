//! `bpfenv version` — Print the active libbpf version.

use bpfenv_core::Bootstrap;
use clap::Args;

/// Arguments for the `version` command.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Also print where the version came from.
    #[arg(short, long)]
    pub source: bool,
}

/// Executes the `version` command.
///
/// # Errors
///
/// This command does not fail; the signature matches the other handlers.
#[allow(clippy::unnecessary_wraps)]
pub fn execute(bootstrap: &Bootstrap, args: &VersionArgs) -> anyhow::Result<()> {
    let version = bootstrap.libbpf_version();
    if args.source {
        println!("libbpf {version} ({})", version.source());
    } else {
        println!("{version}");
    }
    Ok(())
}
