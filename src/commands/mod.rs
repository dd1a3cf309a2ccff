//! Subcommand handlers

pub mod shell;
pub mod status;

pub use shell::{handle_shell_command, ShellArgs};
pub use status::{handle_status_command, StatusArgs};
