//! Command implementations.

pub mod check;
pub mod init;

use std::process::ExitCode;

/// How a successful command run should end the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// Cycles at or above the failure threshold were found.
    CyclesFound,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::CyclesFound => ExitCode::from(1),
        }
    }
}
