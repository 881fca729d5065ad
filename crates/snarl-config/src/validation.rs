//! Schema validation for loaded configuration.

use globset::Glob;

use crate::config::SnarlConfig;
use crate::error::{ConfigError, Result};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl SnarlConfig {
    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<()> {
        if self.max_cycle_length == Some(0) {
            return Err(ConfigError::invalid(
                "max_cycle_length",
                "must be at least 1; omit it for no limit",
            ));
        }

        if self.max_cycles == 0 {
            return Err(ConfigError::invalid("max_cycles", "must be at least 1"));
        }

        for pattern in &self.exclude {
            if let Err(err) = Glob::new(pattern) {
                return Err(ConfigError::invalid(
                    "exclude",
                    format!("'{pattern}' is not a valid glob: {err}"),
                ));
            }
        }

        if let Some(level) = &self.settings.log_level {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::invalid(
                    "settings.log_level",
                    format!("'{level}' is not one of {}", LOG_LEVELS.join(", ")),
                ));
            }
        }

        Ok(())
    }
}
