//! In-memory record store for the lease exit engine
//!
//! This crate provides in-memory implementations of the repository
//! interfaces defined in leaseexit-core. It is useful for development,
//! testing, and simple deployments where persistence is not required.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub mod repositories;
pub use repositories::{
    InMemoryApprovalRepository, InMemoryFormRepository, InMemoryNotificationRepository,
    InMemoryWorkflowRepository,
};

use leaseexit_core::domain::approval::Approval;
use leaseexit_core::domain::form::Form;
use leaseexit_core::domain::notification::Notification;
use leaseexit_core::domain::repository::{
    ApprovalRepository, FormRepository, NotificationRepository, WorkflowRepository,
};
use leaseexit_core::domain::workflow::Workflow;

/// Provider for in-memory record store repositories
///
/// Owns the shared maps; every repository handed out by
/// [`create_repositories`](Self::create_repositories) reads and writes the
/// same store, so the mutation side and the read side stay consistent.
pub struct InMemoryStateStoreProvider {
    // Shared storage per record kind, keyed by record ID
    workflows: Arc<RwLock<HashMap<String, Workflow>>>,
    forms: Arc<RwLock<HashMap<String, Form>>>,
    approvals: Arc<RwLock<HashMap<String, Approval>>>,
    notifications: Arc<RwLock<HashMap<String, Notification>>>,
}

impl InMemoryStateStoreProvider {
    /// Create a new in-memory record store provider
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(RwLock::new(HashMap::new())),
            forms: Arc::new(RwLock::new(HashMap::new())),
            approvals: Arc::new(RwLock::new(HashMap::new())),
            notifications: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create repositories for wiring into the engine
    pub fn create_repositories(
        &self,
    ) -> (
        Arc<dyn WorkflowRepository>,
        Arc<dyn FormRepository>,
        Arc<dyn ApprovalRepository>,
        Arc<dyn NotificationRepository>,
    ) {
        debug!("Creating in-memory repositories");

        (
            Arc::new(InMemoryWorkflowRepository::new(self.workflows.clone())),
            Arc::new(InMemoryFormRepository::new(self.forms.clone())),
            Arc::new(InMemoryApprovalRepository::new(self.approvals.clone())),
            Arc::new(InMemoryNotificationRepository::new(
                self.notifications.clone(),
            )),
        )
    }
}

impl Default for InMemoryStateStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}
