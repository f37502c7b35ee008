use std::path::PathBuf;

mod manifest;
mod requirements;
mod terminal;

use clap::ArgAction;
use manifest::Manifest;
use requirements::Requirements;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the module
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Calculate the neighbouring folders the module links into
    ///
    /// Writes the requirement trie of the root module as JSON.
    Requirements(Requirements),

    /// Create the module manifest
    ///
    /// Merges the module metadata with the requirements of the module and
    /// each of its submodules.
    Manifest(Manifest),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Requirements(command) => command.run(&root)?,
            Self::Manifest(command) => command.run(&root)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_manifest_command() {
        let cli = Cli::try_parse_from([
            "vnm",
            "-vv",
            "--root",
            "modules/a",
            "manifest",
            "--repo",
            "owner/modules",
            "--version",
            "1.2.3",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.root, PathBuf::from("modules/a"));
        assert!(matches!(cli.command, Command::Manifest(_)));
    }

    #[test]
    fn requirements_needs_an_output() {
        assert!(Cli::try_parse_from(["vnm", "requirements"]).is_err());
    }
}
