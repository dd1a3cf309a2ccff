//! CLI argument parsing, logging setup and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{handle_shell_command, handle_status_command, ShellArgs, StatusArgs};
use crate::core::MAX_LOGGING_LEVEL;

/// Status of all git repositories found under a directory
#[derive(Parser, Debug)]
#[command(name = "gitas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging level [0...3]; RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=MAX_LOGGING_LEVEL as i64)
    )]
    pub logging: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show status of each git repository found in PATH
    #[command(
        visible_alias = "ll",
        after_help = "Examples:\n  gitas status ~ --name=path -b -o=name\n  gitas status -lus\n  gitas status /home --time=false"
    )]
    Status(StatusArgs),

    /// Execute "command" for each git repository found in PATH
    #[command(
        after_help = "Examples:\n  gitas shell /home \"ls\"\n  gitas shell ~ \"git describe --abbrev=0 --tags\"\n  gitas shell \"ls | grep 'P'\""
    )]
    Shell(ShellArgs),
}

/// Maps `--logging` to the default log filter
pub fn log_filter(level: u8) -> log::LevelFilter {
    match level {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Installs the stderr logger; `RUST_LOG` overrides the level chosen here
pub fn init_logging(level: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_filter(level))
        .format_timestamp(None)
        .parse_default_env();
    // A logger may already be installed (tests)
    let _ = builder.try_init();
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        init_logging(self.logging);
        log::debug!("{self:?}");

        match self.command {
            Commands::Status(args) => handle_status_command(args).await,
            Commands::Shell(args) => handle_shell_command(args).await,
        }
    }
}
