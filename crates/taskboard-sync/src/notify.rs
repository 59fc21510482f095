use crate::traits::NotificationSink;

/// Sends notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn show_success(&self, message: &str) {
        tracing::info!(target: "taskboard::notify", "{}", message);
    }

    fn show_error(&self, message: &str) {
        tracing::error!(target: "taskboard::notify", "{}", message);
    }
}
