//! Transient notifications ("toasts") and the shared failure reporting path.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info, warn};

use crate::config::DEFAULT_TOAST_LIFE_MS;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub life: Duration,
}

impl Toast {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
            life: Duration::from_millis(DEFAULT_TOAST_LIFE_MS),
        }
    }

    pub fn success(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, summary, detail)
    }

    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary, detail)
    }

    pub fn with_life(mut self, life: Duration) -> Self {
        self.life = life;
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Writes toasts to stderr and mirrors them into the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    pub life: Option<Duration>,
}

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        let toast = match self.life {
            Some(life) => toast.with_life(life),
            None => toast,
        };
        match toast.severity {
            Severity::Error => error!("{}: {}", toast.summary, toast.detail),
            Severity::Warn => warn!("{}: {}", toast.summary, toast.detail),
            Severity::Success | Severity::Info => info!("{}: {}", toast.summary, toast.detail),
        }
        eprintln!("[{}] {} - {}", toast.severity, toast.summary, toast.detail);
    }
}

/// Keeps every toast in memory, handy for assertions.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().ok().and_then(|t| t.last().cloned())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}

/// Surfaces a failed call as an error toast.
///
/// The toast detail carries the backend's own message when it sent one.
/// Logging is left to the notifier so each failure is written once.
pub fn report(notifier: &dyn Notifier, context: &str, err: &ApiError) {
    let detail = err
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    notifier.notify(Toast::error(context, detail));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_notifies_once_per_failure() {
        let notifier = MemoryNotifier::new();
        report(&notifier, "Load bookings", &ApiError::Timeout);
        report(&notifier, "Load payments", &ApiError::NotFound("Payment not found".to_string()));
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[1].summary, "Load payments");
        assert_eq!(toasts[1].detail, "Payment not found");
    }

    #[test]
    fn test_report_uses_server_message_verbatim() {
        let notifier = MemoryNotifier::new();
        let err = ApiError::Server {
            status: 409,
            message: "Seat 12 is already booked".to_string(),
        };
        report(&notifier, "Create booking", &err);

        let toast = notifier.last().unwrap();
        assert_eq!(toast.severity, Severity::Error);
        assert_eq!(toast.summary, "Create booking");
        assert_eq!(toast.detail, "Seat 12 is already booked");
    }

    #[test]
    fn test_report_falls_back_to_error_text() {
        let notifier = MemoryNotifier::new();
        report(&notifier, "Load routes", &ApiError::Timeout);
        assert_eq!(notifier.last().unwrap().detail, "Request timed out");
    }
}
