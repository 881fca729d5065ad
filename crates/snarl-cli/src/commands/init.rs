//! `snarl init`: write a starter configuration file.

use std::fs;

use tracing::debug;

use crate::cli::InitArgs;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

pub const TEMPLATE: &str = r#"# Snarl configuration
# CLI flags and SNARL_* environment variables override these values.

# Source root, relative to the working directory
# root = "src"

# Extra glob patterns to skip; the built-in excludes still apply
exclude = []
use_default_excludes = true

# Only report cycles of at most this many modules
# max_cycle_length = 8

# static | runtime | both
mode = "static"

max_cycles = 10000
parallel = true

[settings]
# log_level = "info"
"#;

pub fn execute(args: &InitArgs) -> Result<()> {
    if !args.dir.is_dir() {
        return Err(CliError::FileNotFound(args.dir.clone()));
    }
    let path = args.dir.join("snarl.toml");
    if path.exists() && !args.force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        )));
    }

    fs::write(&path, TEMPLATE).with_path(&path)?;
    debug!(path = %path.display(), "wrote config template");
    ui::success(&format!("Created {}", path.display()));
    Ok(())
}
