use std::io::IsTerminal;

use owo_colors::{AnsiColors, OwoColorize};

use crate::notify::{Toast, ToastLevel};

pub mod board;
pub mod tables;

pub use board::render_board;
pub use tables::{render_columns, render_stats};

/// Applies colors only when the output stream is a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    color: bool,
}

impl Styler {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn for_stdout() -> Self {
        Self::new(std::io::stdout().is_terminal())
    }

    pub fn for_stderr() -> Self {
        Self::new(std::io::stderr().is_terminal())
    }

    pub fn paint(&self, text: &str, color: AnsiColors) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn format_toast(toast: &Toast, styler: &Styler) -> String {
    let prefix = match toast.level {
        ToastLevel::Info => "info",
        ToastLevel::Error => "error",
        ToastLevel::Success => "ok",
    };
    styler.paint(&format!("{prefix}: {}", toast.message), toast.color())
}
