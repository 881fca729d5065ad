//! Command-line interface definition.
//!
//! - `snarl check [ROOT]` - analyze a source tree and report import cycles
//! - `snarl init` - write a starter `snarl.toml`

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{CheckArgs, Command, InitArgs};
pub use enums::{FailOn, ModeArg};

/// Snarl - circular import detection for Python projects
#[derive(Parser, Debug)]
#[command(
    name = "snarl",
    version,
    about = "Find and rank circular imports in Python projects",
    long_about = "Snarl builds the import graph of a Python source tree, finds every\n\
                  circular import, rates how likely each one is to break at load time,\n\
                  and suggests how to untangle it."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
