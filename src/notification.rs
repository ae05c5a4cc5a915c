//! Operator notification boundary
//!
//! The engine never renders toasts or snackbars itself; it hands
//! human-readable messages to a [`Notifier`]. Only two things are ever
//! surfaced this way: the equipment-linked rejection and persistence
//! failures.

use std::sync::{Arc, RwLock};

/// Severity of an operator-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational message
    Info,
    /// Operation completed
    Success,
    /// Command rejected, operator action needed
    Warning,
    /// Collaborator failure
    Error,
}

/// Notification sink consumed by the editing session
pub trait Notifier: Send + Sync {
    /// Surface a message to the operator
    fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that routes messages to the tracing subscriber
///
/// The default production sink when no UI toast layer is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => tracing::info!(?severity, "{message}"),
            Severity::Warning => tracing::warn!(?severity, "{message}"),
            Severity::Error => tracing::error!(?severity, "{message}"),
        }
    }
}

/// Recording notifier for tests
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<RwLock<Vec<(String, Severity)>>>,
}

impl RecordingNotifier {
    /// Create a new recording notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications recorded so far, in order
    pub fn notifications(&self) -> Vec<(String, Severity)> {
        self.notifications.read().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.notifications
            .write()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the recorder captures messages in order with severity
    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify("saved", Severity::Success);
        notifier.notify("limit exceeded", Severity::Warning);

        let recorded = notifier.notifications();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0], ("saved".to_string(), Severity::Success));
        assert_eq!(recorded[1], ("limit exceeded".to_string(), Severity::Warning));
    }

    /// Test clones share the same record
    #[test]
    fn test_recording_notifier_shared() {
        let notifier = RecordingNotifier::new();
        let clone = notifier.clone();
        clone.notify("from clone", Severity::Info);
        assert_eq!(notifier.notifications().len(), 1);
    }

    /// Test the log notifier accepts every severity without panicking
    #[test]
    fn test_log_notifier() {
        let notifier = LogNotifier;
        notifier.notify("info", Severity::Info);
        notifier.notify("success", Severity::Success);
        notifier.notify("warning", Severity::Warning);
        notifier.notify("error", Severity::Error);
    }
}
