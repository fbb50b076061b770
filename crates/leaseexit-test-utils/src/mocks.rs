//! Mock collaborators

use async_trait::async_trait;
use leaseexit_core::{CoreError, Notification, NotificationDispatcher};
use std::sync::Mutex;

/// Dispatcher that records everything it is asked to deliver
///
/// Construct with [`RecordingDispatcher::failing`] to simulate a delivery
/// channel outage; recorded state changes must survive that.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    delivered: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingDispatcher {
    /// A dispatcher that delivers everything
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose every delivery fails
    pub fn failing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Everything delivered so far
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().expect("dispatcher lock").clone()
    }

    /// Recipients of everything delivered so far, in delivery order
    pub fn recipients(&self) -> Vec<String> {
        self.delivered()
            .into_iter()
            .map(|notification| notification.recipient.0)
            .collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn dispatch(&self, notification: &Notification) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::NotificationError(
                "delivery channel unavailable".to_string(),
            ));
        }
        self.delivered
            .lock()
            .expect("dispatcher lock")
            .push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseexit_core::{DataPacket, NotificationType, Recipient, WorkflowId};

    fn notification() -> Notification {
        Notification::new(
            WorkflowId("wf_1716735344.000001".to_string()),
            Recipient::new("legal"),
            NotificationType::StatusUpdate,
            DataPacket::null(),
        )
    }

    #[tokio::test]
    async fn test_records_deliveries() {
        let dispatcher = RecordingDispatcher::new();
        dispatcher.dispatch(&notification()).await.unwrap();

        assert_eq!(dispatcher.delivered().len(), 1);
        assert_eq!(dispatcher.recipients(), vec!["legal"]);
    }

    #[tokio::test]
    async fn test_failing_dispatcher_errors() {
        let dispatcher = RecordingDispatcher::failing();
        let result = dispatcher.dispatch(&notification()).await;

        assert!(matches!(result, Err(CoreError::NotificationError(_))));
        assert!(dispatcher.delivered().is_empty());
    }
}
