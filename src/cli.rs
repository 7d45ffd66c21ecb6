// File: ./src/cli.rs
//! Command-line surface shared by the binary and its tests.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "prayer-notes",
    about = "Keep a Markdown note of today's prayer times in sync",
    version
)]
pub struct Cli {
    /// Use a different directory for config and data.
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Log debug output to the terminal.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch today's times and update the note once (default).
    Sync,

    /// Keep running: sync on startup and then on a timer.
    Watch(WatchArgs),

    /// Print the rendered note without writing it.
    Preview,

    /// Inspect or create the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Override `refresh_interval_mins` from the config.
    #[arg(long)]
    pub interval_mins: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location.
    Path,
    /// Print the effective configuration as TOML.
    Show,
    /// Write a config file with default values if none exists.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn action(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_sync() {
        let cli = Cli::parse_from(["prayer-notes"]);
        assert!(matches!(cli.action(), Command::Sync));
    }

    #[test]
    fn test_global_root_after_subcommand() {
        let cli = Cli::parse_from(["prayer-notes", "watch", "--interval-mins", "5", "-r", "/tmp/x"]);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/x")));
        match cli.action() {
            Command::Watch(args) => assert_eq!(args.interval_mins, Some(5)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
