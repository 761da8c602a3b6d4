//! CLI command definitions and dispatch.

pub mod check;
pub mod info;
pub mod version;
pub mod workdir;

use bpfenv_core::Bootstrap;
use clap::{Parser, Subcommand};

/// bpfenv — bpffs and libbpf environment helper.
#[derive(Parser, Debug)]
#[command(name = "bpfenv", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log resolution steps at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the bpffs working directory, optionally with a subdirectory.
    Workdir(workdir::WorkdirArgs),
    /// Verify root privilege and raise the memlock limit.
    Check(check::CheckArgs),
    /// Print the active libbpf version.
    Version(version::VersionArgs),
    /// Print a full environment report.
    Info(info::InfoArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let bootstrap = Bootstrap::host();
    match cli.command {
        Command::Workdir(args) => workdir::execute(&bootstrap, &args),
        Command::Check(args) => check::execute(&bootstrap, &args),
        Command::Version(args) => version::execute(&bootstrap, &args),
        Command::Info(args) => info::execute(&bootstrap, &args),
    }
}

#[cfg(test)]
mod tests {
    use super::info::InfoArgs;
    use super::*;

    #[test]
    fn workdir_accepts_subdir_and_quiet() {
        let cli = Cli::try_parse_from(["bpfenv", "workdir", "xdp", "--quiet"]).unwrap();
        let Command::Workdir(args) = cli.command else {
            panic!("expected workdir");
        };
        assert_eq!(args.subdir.as_deref(), Some("xdp"));
        assert!(args.quiet);
        assert_eq!(args.capacity, bpfenv_common::constants::PATH_MAX);
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["bpfenv", "info", "--json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Info(InfoArgs { json: true })));
    }

    #[test]
    fn check_parses_min_lock() {
        let cli = Cli::try_parse_from(["bpfenv", "check", "--min-lock", "4194304"]).unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.min_lock, Some(4_194_304));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
