//! Terminal output helpers.
//!
//! Status lines go to stderr so `--json` output on stdout stays clean.
//!
//! ```no_run
//! use snarl_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("No import cycles found");
//! ui::warning("2 files skipped");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::{OwoColorize, Style};

pub use format::{print_cycles, print_summary, severity_style};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether output is colored.
///
/// `--no-color` and `NO_COLOR` disable colors, `FORCE_COLOR` enables them,
/// otherwise colors follow whether stderr is a terminal.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply `style` when colors are enabled.
pub(crate) fn paint(text: &str, style: Style) -> String {
    if colors_enabled() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}
