use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::{FailOn, ModeArg};

/// Available Snarl subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a source tree for circular imports
    ///
    /// Exits with status 1 when a cycle at or above --fail-on is found.
    Check(CheckArgs),

    /// Write a starter snarl.toml
    Init(InitArgs),
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Source root to analyze (default: config `root`, then the current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Extra glob patterns to exclude, relative to the root
    ///
    /// Examples:
    ///   snarl check --exclude 'migrations/**' --exclude 'scripts/*.py'
    #[arg(short = 'e', long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Do not apply the built-in excludes (VCS dirs, caches, virtualenvs, tests)
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Only report cycles of at most this many modules
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_cycle_length: Option<u64>,

    /// Stop enumerating after this many cycles
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_cycles: Option<u64>,

    /// Where import edges come from
    ///
    /// - static: parse the source files
    /// - runtime: a captured trace (requires --trace)
    /// - both: static edges plus runtime-only edges from the trace
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Captured import trace (JSON) for runtime and both modes
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Write the graph as Graphviz DOT, cycle edges highlighted
    #[arg(long, value_name = "FILE")]
    pub dot: Option<PathBuf>,

    /// Write the node/edge interchange document as JSON
    #[arg(long, value_name = "FILE")]
    pub graph: Option<PathBuf>,

    /// Lowest severity that makes the command fail
    #[arg(long, value_enum, default_value = "low")]
    pub fail_on: FailOn,

    /// Config file to use instead of snarl.toml / pyproject.toml discovery
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read and parse files on a single thread
    #[arg(long)]
    pub no_parallel: bool,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write snarl.toml into
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing snarl.toml
    #[arg(short, long)]
    pub force: bool,
}
