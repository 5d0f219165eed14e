//! Toast notification system
//!
//! The board reports outcomes through a fire-and-forget `Notifier`. Hosts
//! decide how toasts are presented; `ToastLog` keeps them for later display.

use std::time::Instant;

use owo_colors::AnsiColors;
use parking_lot::Mutex;

/// A toast notification message
#[derive(Debug, Clone)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
    /// When the toast was created
    pub timestamp: Instant,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Informational message, e.g. usage hints
    Info,
    /// Error message
    Error,
    /// Success message
    Success,
}

impl Toast {
    /// Create a new toast with the given message and level
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    /// Get the color associated with this toast's level
    pub fn color(&self) -> AnsiColors {
        match self.level {
            ToastLevel::Info => AnsiColors::Cyan,
            ToastLevel::Error => AnsiColors::Red,
            ToastLevel::Success => AnsiColors::Green,
        }
    }
}

/// Sink for user-visible notifications; no result is consumed
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Notifier that records every toast in order
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    /// Remove and return all recorded toasts
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock())
    }

    pub fn count(&self, level: ToastLevel) -> usize {
        self.toasts.lock().iter().filter(|t| t.level == level).count()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => tracing::warn!(message = %toast.message, "error toast"),
            _ => tracing::debug!(message = %toast.message, "toast"),
        }
        self.toasts.lock().push(toast);
    }
}
