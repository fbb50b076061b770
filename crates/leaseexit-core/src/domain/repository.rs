//! Repository traits for the lease exit engine
//!
//! These traits are the engine's only persistence seam. External crates
//! implement them to provide durable storage; the engine itself never
//! assumes anything beyond per-record atomicity of `save`.

use async_trait::async_trait;

use super::approval::{Approval, ApprovalId};
use super::form::{Form, FormId};
use super::notification::{Notification, NotificationId};
use super::workflow::{Workflow, WorkflowId, WorkflowState};
use crate::CoreError;

/// Repository for workflow records
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Find a workflow by ID
    async fn find_by_id(&self, id: &WorkflowId) -> Result<Option<Workflow>, CoreError>;

    /// Save a workflow, overwriting any previous version of the record
    async fn save(&self, workflow: &Workflow) -> Result<(), CoreError>;

    /// List workflows, optionally filtered by state
    async fn list(&self, state: Option<WorkflowState>) -> Result<Vec<Workflow>, CoreError>;
}

/// Repository for form records
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Find a form by ID
    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, CoreError>;

    /// Save a form record
    async fn save(&self, form: &Form) -> Result<(), CoreError>;

    /// All forms submitted for a workflow
    async fn list_for_workflow(&self, workflow_id: &WorkflowId)
        -> Result<Vec<Form>, CoreError>;
}

/// Repository for approval records
#[async_trait]
pub trait ApprovalRepository: Send + Sync {
    /// Find an approval by ID
    async fn find_by_id(&self, id: &ApprovalId) -> Result<Option<Approval>, CoreError>;

    /// Save an approval record
    async fn save(&self, approval: &Approval) -> Result<(), CoreError>;

    /// All approvals for a workflow
    async fn list_for_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<Approval>, CoreError>;
}

/// Repository for notification audit records
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find a notification by ID
    async fn find_by_id(&self, id: &NotificationId)
        -> Result<Option<Notification>, CoreError>;

    /// Append a notification record
    async fn save(&self, notification: &Notification) -> Result<(), CoreError>;

    /// All notifications recorded for a workflow
    async fn list_for_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<Notification>, CoreError>;
}

/// Memory implementations for testing
#[cfg(feature = "testing")]
pub mod memory {
    use super::*;
    use dashmap::DashMap;
    use std::sync::Arc;

    /// In-memory workflow repository backed by a concurrent map
    pub struct MemoryWorkflowRepository {
        workflows: Arc<DashMap<String, Workflow>>,
    }

    impl MemoryWorkflowRepository {
        /// Create a new memory workflow repository
        pub fn new() -> Self {
            Self {
                workflows: Arc::new(DashMap::with_capacity(16)),
            }
        }
    }

    impl Default for MemoryWorkflowRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl WorkflowRepository for MemoryWorkflowRepository {
        async fn find_by_id(&self, id: &WorkflowId) -> Result<Option<Workflow>, CoreError> {
            Ok(self.workflows.get(&id.0).map(|workflow| workflow.clone()))
        }

        async fn save(&self, workflow: &Workflow) -> Result<(), CoreError> {
            self.workflows
                .insert(workflow.id.0.clone(), workflow.clone());
            Ok(())
        }

        async fn list(&self, state: Option<WorkflowState>) -> Result<Vec<Workflow>, CoreError> {
            let result = self
                .workflows
                .iter()
                .filter(|entry| state.map_or(true, |s| entry.state == s))
                .map(|entry| entry.clone())
                .collect();
            Ok(result)
        }
    }

    /// In-memory form repository backed by a concurrent map
    pub struct MemoryFormRepository {
        forms: Arc<DashMap<String, Form>>,
    }

    impl MemoryFormRepository {
        /// Create a new memory form repository
        pub fn new() -> Self {
            Self {
                forms: Arc::new(DashMap::with_capacity(16)),
            }
        }
    }

    impl Default for MemoryFormRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl FormRepository for MemoryFormRepository {
        async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, CoreError> {
            Ok(self.forms.get(&id.0).map(|form| form.clone()))
        }

        async fn save(&self, form: &Form) -> Result<(), CoreError> {
            self.forms.insert(form.id.0.clone(), form.clone());
            Ok(())
        }

        async fn list_for_workflow(
            &self,
            workflow_id: &WorkflowId,
        ) -> Result<Vec<Form>, CoreError> {
            let result = self
                .forms
                .iter()
                .filter(|entry| entry.workflow_id == *workflow_id)
                .map(|entry| entry.clone())
                .collect();
            Ok(result)
        }
    }

    /// In-memory approval repository backed by a concurrent map
    pub struct MemoryApprovalRepository {
        approvals: Arc<DashMap<String, Approval>>,
    }

    impl MemoryApprovalRepository {
        /// Create a new memory approval repository
        pub fn new() -> Self {
            Self {
                approvals: Arc::new(DashMap::with_capacity(16)),
            }
        }
    }

    impl Default for MemoryApprovalRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ApprovalRepository for MemoryApprovalRepository {
        async fn find_by_id(&self, id: &ApprovalId) -> Result<Option<Approval>, CoreError> {
            Ok(self.approvals.get(&id.0).map(|approval| approval.clone()))
        }

        async fn save(&self, approval: &Approval) -> Result<(), CoreError> {
            self.approvals
                .insert(approval.id.0.clone(), approval.clone());
            Ok(())
        }

        async fn list_for_workflow(
            &self,
            workflow_id: &WorkflowId,
        ) -> Result<Vec<Approval>, CoreError> {
            let result = self
                .approvals
                .iter()
                .filter(|entry| entry.workflow_id == *workflow_id)
                .map(|entry| entry.clone())
                .collect();
            Ok(result)
        }
    }

    /// In-memory notification repository backed by a concurrent map
    pub struct MemoryNotificationRepository {
        notifications: Arc<DashMap<String, Notification>>,
    }

    impl MemoryNotificationRepository {
        /// Create a new memory notification repository
        pub fn new() -> Self {
            Self {
                notifications: Arc::new(DashMap::with_capacity(16)),
            }
        }
    }

    impl Default for MemoryNotificationRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl NotificationRepository for MemoryNotificationRepository {
        async fn find_by_id(
            &self,
            id: &NotificationId,
        ) -> Result<Option<Notification>, CoreError> {
            Ok(self
                .notifications
                .get(&id.0)
                .map(|notification| notification.clone()))
        }

        async fn save(&self, notification: &Notification) -> Result<(), CoreError> {
            self.notifications
                .insert(notification.id.0.clone(), notification.clone());
            Ok(())
        }

        async fn list_for_workflow(
            &self,
            workflow_id: &WorkflowId,
        ) -> Result<Vec<Notification>, CoreError> {
            let result = self
                .notifications
                .iter()
                .filter(|entry| entry.workflow_id == *workflow_id)
                .map(|entry| entry.clone())
                .collect();
            Ok(result)
        }
    }

}
