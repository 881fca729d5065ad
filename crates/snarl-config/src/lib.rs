//! # snarl-config
//!
//! Discovery and layered loading of Snarl settings.
//!
//! Settings come from `snarl.toml` or the `[tool.snarl]` table of
//! `pyproject.toml`, then `SNARL_*` environment variables, then CLI flags,
//! each layer overriding the previous one.
//!
//! ```toml
//! # snarl.toml
//! exclude = ["migrations/**"]
//! max_cycle_length = 8
//! mode = "static"
//!
//! [settings]
//! log_level = "info"
//! ```

mod config;
mod discovery;
mod error;
mod settings;
mod validation;

pub use config::{ConfigOverrides, ENV_PREFIX, SnarlConfig};
pub use discovery::{ConfigDiscovery, ConfigSource};
pub use error::{ConfigError, Result};
pub use settings::GlobalSettings;
