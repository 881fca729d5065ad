//! Miette rendering for CLI errors.

use miette::Report;
use snarl_analysis::{AnalyzeError, IndexError};
use snarl_config::ConfigError;

use crate::error::CliError;

/// Convert a `CliError` into a miette report, adding a hint where the fix
/// is known.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Analyze(e) => analyze_error_to_miette(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::FileNotFound(path) => miette::miette!(
            help = "Check the path; relative paths are resolved from the current directory",
            "File not found: {}",
            path.display()
        ),
        CliError::Json(e) => miette::miette!(
            help = "Trace files are produced by a runtime trace session and serialized as JSON",
            "Invalid trace file: {}",
            e
        ),
        other => miette::miette!("{}", other),
    }
}

fn analyze_error_to_miette(err: AnalyzeError) -> Report {
    match err {
        AnalyzeError::MissingTrace => miette::miette!(
            help = "Pass --trace <FILE> or use --mode static",
            "{}",
            err
        ),
        AnalyzeError::Index(IndexError::InvalidExcludePattern { ref pattern, .. }) => {
            miette::miette!(
                help = "Patterns use glob syntax, e.g. 'migrations/**' or '**/legacy_*.py'",
                "Invalid exclude pattern '{}'",
                pattern
            )
        }
        AnalyzeError::Index(IndexError::RootNotFound(ref path)) => miette::miette!(
            help = "Pass the project's source directory, e.g. `snarl check src`",
            "Source root not found: {}",
            path.display()
        ),
        _ => miette::miette!("Analysis failed: {}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::InvalidValue { field, hint } => miette::miette!(
            help = hint,
            "Invalid value for '{}' in configuration",
            field
        ),
        other => miette::miette!("Configuration error: {}", other),
    }
}
