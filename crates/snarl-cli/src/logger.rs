//! Logging setup for the Snarl CLI.
//!
//! Library crates emit `tracing` events; this module installs the subscriber
//! that prints them to stderr.
//!
//! ```rust,no_run
//! use snarl_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false, None);
//! info!("indexing source tree");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const SNARL_TARGETS: &[&str] = &["snarl_cli", "snarl_config", "snarl_analysis", "snarl_graph"];

/// Install the global tracing subscriber.
///
/// The filter is chosen in this order:
/// 1. `--verbose`: debug for snarl crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. `level` from `settings.log_level` in the config file
/// 5. info for snarl crates
///
/// Calling it a second time in one process is a no-op.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, level: Option<&str>) {
    init_logger_with_filter(build_filter(verbose, quiet, level), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn build_filter(verbose: bool, quiet: bool, level: Option<&str>) -> EnvFilter {
    if verbose {
        snarl_filter("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| snarl_filter(level.unwrap_or("info")))
    }
}

/// `level` for every snarl crate, warnings for everything else.
fn snarl_filter(level: &str) -> EnvFilter {
    let directives: Vec<String> = SNARL_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    EnvFilter::new(format!("warn,{}", directives.join(",")))
}
