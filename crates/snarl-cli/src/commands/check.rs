//! `snarl check`: analyze a tree and report its import cycles.

use std::fs;
use std::path::Path;

use snarl_analysis::{AnalysisReport, Analyzer, TraceLog};
use snarl_config::{ConfigOverrides, SnarlConfig};
use tracing::{debug, info};

use crate::cli::CheckArgs;
use crate::commands::Outcome;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Resolve the layered configuration for a check run.
///
/// Discovery looks in the positional root when one is given, otherwise in
/// the current directory.
pub fn load_config(args: &CheckArgs) -> Result<SnarlConfig> {
    let cwd = std::env::current_dir()?;
    let search_dir = args.root.as_deref().unwrap_or(&cwd);
    let config = SnarlConfig::load(search_dir, args.config.as_deref(), &overrides(args))?;
    Ok(config)
}

/// CLI flags as the top configuration layer. Flags that were not given
/// leave lower layers alone.
pub fn overrides(args: &CheckArgs) -> ConfigOverrides {
    ConfigOverrides {
        root: args.root.clone(),
        exclude: args.exclude.clone(),
        use_default_excludes: args.no_default_excludes.then_some(false),
        max_cycle_length: args.max_cycle_length.map(to_usize),
        mode: args.mode.map(Into::into),
        max_cycles: args.max_cycles.map(to_usize),
        parallel: args.no_parallel.then_some(false),
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Execute the check command.
///
/// 1. Build the analyzer from the resolved configuration
/// 2. Load the trace file for runtime and both modes
/// 3. Analyze and print the report (text or `--json`)
/// 4. Write `--dot` / `--graph` exports
/// 5. Map the worst severity against `--fail-on` to the outcome
pub fn execute(args: &CheckArgs, config: &SnarlConfig) -> Result<Outcome> {
    let cwd = std::env::current_dir()?;
    let analyzer_config = config.analyzer_config(&cwd);
    debug!(root = %analyzer_config.root.display(), mode = %analyzer_config.mode, "resolved configuration");

    let mut analyzer = Analyzer::with_config(analyzer_config);
    if let Some(path) = &args.trace {
        if config.mode.uses_runtime() {
            analyzer = analyzer.trace_log(read_trace(path)?);
        } else {
            ui::warning("--trace is ignored in static mode; pass --mode runtime or --mode both");
        }
    }

    let report = analyzer.analyze()?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        ui::print_cycles(&report);
        ui::print_summary(&report);
    }

    write_exports(args, &report)?;

    let outcome = outcome_for(&report, args);
    if !args.json {
        match outcome {
            Outcome::Clean if report.is_acyclic() => ui::success("No import cycles found"),
            Outcome::Clean => ui::info("Cycles found, all below the --fail-on threshold"),
            Outcome::CyclesFound => ui::error("Import cycles found"),
        }
    }
    Ok(outcome)
}

fn read_trace(path: &Path) -> Result<TraceLog> {
    let content = fs::read_to_string(path).with_path(path)?;
    let log: TraceLog = serde_json::from_str(&content)?;
    info!(events = log.len(), path = %path.display(), "loaded import trace");
    Ok(log)
}

fn write_exports(args: &CheckArgs, report: &AnalysisReport) -> Result<()> {
    if let Some(path) = &args.dot {
        write_file(path, &report.to_dot())?;
    }
    if let Some(path) = &args.graph {
        write_file(path, &report.to_document().to_json()?)?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "output directory {} does not exist",
                parent.display()
            )));
        }
    }
    fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote export");
    Ok(())
}

fn outcome_for(report: &AnalysisReport, args: &CheckArgs) -> Outcome {
    match (args.fail_on.threshold(), report.worst_severity()) {
        (Some(threshold), Some(worst)) if worst >= threshold => Outcome::CyclesFound,
        _ => Outcome::Clean,
    }
}
