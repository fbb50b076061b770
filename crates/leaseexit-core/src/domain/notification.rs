//! Notification audit records
//!
//! Notifications are append-only records of what was sent to whom. They are
//! written after state changes and never feed back into workflow state;
//! delivery itself belongs to the dispatcher collaborator.

use crate::{domain::ids::prefixed_id, domain::workflow::WorkflowId, DataPacket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value object: Notification ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a notification is addressed to, a role name or a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient(pub String);

impl Recipient {
    /// Create a recipient from a role or user name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of event a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A form was submitted
    FormSubmission,
    /// An approval decision is needed
    ApprovalRequired,
    /// The workflow state changed
    StatusUpdate,
    /// The workflow was rejected and needs revision
    RevisionRequired,
}

impl NotificationType {
    /// The snake_case wire name of this notification type
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::FormSubmission => "form_submission",
            NotificationType::ApprovalRequired => "approval_required",
            NotificationType::StatusUpdate => "status_update",
            NotificationType::RevisionRequired => "revision_required",
        }
    }

    /// Human-readable label used in notification subjects
    fn label(self) -> &'static str {
        match self {
            NotificationType::FormSubmission => "Form Submission",
            NotificationType::ApprovalRequired => "Approval Required",
            NotificationType::StatusUpdate => "Status Update",
            NotificationType::RevisionRequired => "Revision Required",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery status of a notification record
///
/// Records are written at dispatch time, so the only status is `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Handed to the dispatcher
    Sent,
}

/// An append-only audit record of one notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier
    pub id: NotificationId,

    /// Owning workflow
    pub workflow_id: WorkflowId,

    /// Addressee, a role or user name
    pub recipient: Recipient,

    /// What kind of event this reports
    pub notification_type: NotificationType,

    /// Event context payload
    pub data: DataPacket,

    /// Delivery status
    pub status: NotificationStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a new notification record
    pub fn new(
        workflow_id: WorkflowId,
        recipient: Recipient,
        notification_type: NotificationType,
        data: DataPacket,
    ) -> Self {
        Self {
            id: NotificationId(prefixed_id("notif_")),
            workflow_id,
            recipient,
            notification_type,
            data,
            status: NotificationStatus::Sent,
            created_at: Utc::now(),
        }
    }

    /// Subject line derived from the notification type
    pub fn subject(&self) -> String {
        format!("Update: {} Workflow", self.notification_type.label())
    }

    /// Body line derived from the payload, falling back to a generic prompt
    pub fn message(&self) -> String {
        self.data
            .field("message")
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Action required for workflow {}", self.workflow_id))
    }
}
