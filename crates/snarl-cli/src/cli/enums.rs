use clap::ValueEnum;
use snarl_analysis::Mode;
use snarl_analysis::snarl_graph::Severity;

/// Capture mode
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ModeArg {
    /// Parse the source tree
    Static,
    /// Use a captured import trace
    Runtime,
    /// Static edges plus runtime-only edges
    Both,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Static => Mode::Static,
            ModeArg::Runtime => Mode::Runtime,
            ModeArg::Both => Mode::Both,
        }
    }
}

/// Severity threshold for a failing exit status
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum FailOn {
    /// Any cycle fails
    #[default]
    Low,
    Medium,
    High,
    /// Only self-imports and star-import cycles fail
    Critical,
    /// Always exit 0 when the analysis itself succeeds
    Never,
}

impl FailOn {
    /// Minimum failing severity, `None` for `never`.
    pub fn threshold(self) -> Option<Severity> {
        match self {
            Self::Low => Some(Severity::Low),
            Self::Medium => Some(Severity::Medium),
            Self::High => Some(Severity::High),
            Self::Critical => Some(Severity::Critical),
            Self::Never => None,
        }
    }
}
