//!
//! Lease Exit Core - workflow engine for the lease exit approval process
//!
//! This crate defines the domain models, decision functions, and persistence
//! interfaces for tracking a lease exit case through its review steps,
//! approval chain, and exit. It has no transport of its own; a thin service
//! layer calls into it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;

/// Domain layer - core business models, entities, and rules
pub mod domain;

/// Application services - core application logic
pub mod application;

/// Core types
pub mod types;

/// Error types
pub mod error;

/// Engine configuration
pub mod config;

// Re-export key types
pub use config::EngineConfig;
pub use error::CoreError;
pub use types::DataPacket;

// Re-export main API types for easy use
pub use domain::approval::{
    validate_chain, Approval, ApprovalDecision, ApprovalId, ApprovalStatus, ApproverRole,
    ChainResult,
};
pub use domain::form::{
    form_complete, validate_form, validate_named_form, DocumentRef, Form, FormId, FormType,
    ValidationResult,
};
pub use domain::notification::{
    Notification, NotificationId, NotificationStatus, NotificationType, Recipient,
};
pub use domain::repository::{
    ApprovalRepository, FormRepository, NotificationRepository, WorkflowRepository,
};
pub use domain::routing::{recipients_for, status_message};
pub use domain::step::{next_step, StepName};
pub use domain::workflow::{Workflow, WorkflowId, WorkflowState};

// Application interfaces
pub use application::action::{ActionOutcome, WorkflowAction};
pub use application::engine::LeaseExitEngine;
pub use application::progress_service::{ProgressService, WorkflowProgress};
pub use application::workflow_service::{
    DecisionOutcome, FormSubmissionOutcome, WorkflowService, WorkflowSummary,
};

/// Collaborator that delivers notifications to their recipients
///
/// Delivery is fire-and-forget from the engine's point of view: the audit
/// record is persisted before dispatch, and a dispatch failure never rolls
/// back a state change.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one notification
    async fn dispatch(&self, notification: &Notification) -> Result<(), CoreError>;
}

/// Dispatcher that only logs, for embeddings without a delivery channel
#[derive(Debug, Default)]
pub struct TracingNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingNotificationDispatcher {
    async fn dispatch(&self, notification: &Notification) -> Result<(), CoreError> {
        tracing::info!(
            notification_id = %notification.id,
            workflow_id = %notification.workflow_id,
            recipient = %notification.recipient,
            notification_type = %notification.notification_type,
            "{}",
            notification.subject()
        );
        Ok(())
    }
}
