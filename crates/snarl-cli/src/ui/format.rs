//! Human-readable report rendering.

use std::fmt::Write as _;

use owo_colors::Style;
use snarl_analysis::AnalysisReport;
use snarl_analysis::snarl_graph::Severity;

use super::paint;

pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::new().red().bold(),
        Severity::High => Style::new().red(),
        Severity::Medium => Style::new().yellow(),
        Severity::Low => Style::new().dimmed(),
    }
}

/// Print the counters block to stderr.
pub fn print_summary(report: &AnalysisReport) {
    eprint!("{}", render_summary(report));
}

/// Print every cycle with its fix to stdout.
pub fn print_cycles(report: &AnalysisReport) {
    print!("{}", render_cycles(report));
}

fn render_summary(report: &AnalysisReport) -> String {
    let counters = &report.counters;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} files, {} modules, {} imports, {} external",
        paint("Scanned", Style::new().bold()),
        counters.files_scanned,
        counters.modules_found,
        counters.edges_found,
        report.external_imports.len()
    );

    let tiers: Vec<String> = Severity::ALL
        .into_iter()
        .filter(|s| counters.for_severity(*s) > 0)
        .map(|s| paint(&format!("{} {s}", counters.for_severity(s)), severity_style(s)))
        .collect();
    let partial = if report.truncated { " (partial)" } else { "" };
    if tiers.is_empty() {
        let _ = writeln!(out, "{} 0{partial}", paint("Cycles", Style::new().bold()));
    } else {
        let _ = writeln!(
            out,
            "{} {}{partial}: {}",
            paint("Cycles", Style::new().bold()),
            counters.cycles_found,
            tiers.join(", ")
        );
    }
    out
}

fn render_cycles(report: &AnalysisReport) -> String {
    let mut out = String::new();
    for cycle in &report.cycles {
        let severity = cycle.severity();
        let _ = writeln!(
            out,
            "{} {}",
            paint(&format!("[{severity}]"), severity_style(severity)),
            cycle.cycle.format_chain()
        );
        for hop in &cycle.hops {
            if let Some(edge) = hop.primary_edge() {
                let _ = writeln!(
                    out,
                    "    {} -> {}  {}:{} ({})",
                    hop.from,
                    hop.to,
                    edge.file.display(),
                    edge.line,
                    edge.kind
                );
            }
        }
        let _ = writeln!(
            out,
            "    {} {}: {}",
            paint("fix", Style::new().green()),
            cycle.suggestion.fix_type,
            cycle.suggestion.description
        );
        if let Some(example) = &cycle.suggestion.example {
            for line in example.lines() {
                let _ = writeln!(out, "      {}", paint(line, Style::new().dimmed()));
            }
        }
    }
    if !report.diagnostics.is_empty() {
        let _ = writeln!(out, "\n{}", paint("Warnings:", Style::new().yellow().bold()));
        for diagnostic in &report.diagnostics {
            let _ = writeln!(out, "  - {diagnostic}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use snarl_analysis::Analyzer;
    use std::fs;
    use tempfile::TempDir;

    fn ring_report() -> AnalysisReport {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.py"), "import b\n").unwrap();
        fs::write(temp.path().join("b.py"), "import a\n").unwrap();
        Analyzer::new()
            .root(temp.path())
            .parallel(false)
            .analyze()
            .unwrap()
    }

    #[test]
    fn summary_lists_tiers() {
        super::super::init_colors(true);
        let rendered = render_summary(&ring_report());
        assert!(rendered.contains("Cycles 1"));
        assert!(rendered.contains("1 high"));
    }

    #[test]
    fn cycles_show_hops_and_fix() {
        super::super::init_colors(true);
        let rendered = render_cycles(&ring_report());
        assert!(rendered.contains("[high] a -> b -> a"));
        assert!(rendered.contains("a.py:1 (absolute)"));
        assert!(rendered.contains("fix "));
    }
}
