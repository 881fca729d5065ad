//! Snarl CLI - circular import detection for Python projects.
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `check` and `init`
//! - [`error`] - `CliError` and miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use snarl_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false, None);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
