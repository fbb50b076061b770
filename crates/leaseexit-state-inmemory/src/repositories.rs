use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use leaseexit_core::{
    domain::approval::{Approval, ApprovalId},
    domain::form::{Form, FormId},
    domain::notification::{Notification, NotificationId},
    domain::repository::{
        ApprovalRepository, FormRepository, NotificationRepository, WorkflowRepository,
    },
    domain::workflow::{Workflow, WorkflowId, WorkflowState},
    CoreError,
};

/// In-memory implementation of the WorkflowRepository
pub struct InMemoryWorkflowRepository {
    workflows: Arc<RwLock<HashMap<String, Workflow>>>,
}

impl InMemoryWorkflowRepository {
    /// Create a new in-memory workflow repository over a shared map
    pub fn new(workflows: Arc<RwLock<HashMap<String, Workflow>>>) -> Self {
        Self { workflows }
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn find_by_id(&self, id: &WorkflowId) -> Result<Option<Workflow>, CoreError> {
        let workflows = self.workflows.read().await;
        Ok(workflows.get(&id.0).cloned())
    }

    async fn save(&self, workflow: &Workflow) -> Result<(), CoreError> {
        let mut workflows = self.workflows.write().await;
        workflows.insert(workflow.id.0.clone(), workflow.clone());
        Ok(())
    }

    async fn list(&self, state: Option<WorkflowState>) -> Result<Vec<Workflow>, CoreError> {
        let workflows = self.workflows.read().await;

        let result = workflows
            .values()
            .filter(|workflow| match state {
                Some(s) => workflow.state == s,
                None => true,
            })
            .cloned()
            .collect();

        Ok(result)
    }
}

/// In-memory implementation of the FormRepository
pub struct InMemoryFormRepository {
    forms: Arc<RwLock<HashMap<String, Form>>>,
}

impl InMemoryFormRepository {
    /// Create a new in-memory form repository over a shared map
    pub fn new(forms: Arc<RwLock<HashMap<String, Form>>>) -> Self {
        Self { forms }
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, CoreError> {
        let forms = self.forms.read().await;
        Ok(forms.get(&id.0).cloned())
    }

    async fn save(&self, form: &Form) -> Result<(), CoreError> {
        let mut forms = self.forms.write().await;
        forms.insert(form.id.0.clone(), form.clone());
        Ok(())
    }

    async fn list_for_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<Form>, CoreError> {
        let forms = self.forms.read().await;

        let result = forms
            .values()
            .filter(|form| form.workflow_id == *workflow_id)
            .cloned()
            .collect();

        Ok(result)
    }
}

/// In-memory implementation of the ApprovalRepository
pub struct InMemoryApprovalRepository {
    approvals: Arc<RwLock<HashMap<String, Approval>>>,
}

impl InMemoryApprovalRepository {
    /// Create a new in-memory approval repository over a shared map
    pub fn new(approvals: Arc<RwLock<HashMap<String, Approval>>>) -> Self {
        Self { approvals }
    }
}

#[async_trait]
impl ApprovalRepository for InMemoryApprovalRepository {
    async fn find_by_id(&self, id: &ApprovalId) -> Result<Option<Approval>, CoreError> {
        let approvals = self.approvals.read().await;
        Ok(approvals.get(&id.0).cloned())
    }

    async fn save(&self, approval: &Approval) -> Result<(), CoreError> {
        let mut approvals = self.approvals.write().await;
        approvals.insert(approval.id.0.clone(), approval.clone());
        Ok(())
    }

    async fn list_for_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<Approval>, CoreError> {
        let approvals = self.approvals.read().await;

        let result = approvals
            .values()
            .filter(|approval| approval.workflow_id == *workflow_id)
            .cloned()
            .collect();

        Ok(result)
    }
}

/// In-memory implementation of the NotificationRepository
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<HashMap<String, Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Create a new in-memory notification repository over a shared map
    pub fn new(notifications: Arc<RwLock<HashMap<String, Notification>>>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, CoreError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.get(&id.0).cloned())
    }

    async fn save(&self, notification: &Notification) -> Result<(), CoreError> {
        let mut notifications = self.notifications.write().await;
        notifications.insert(notification.id.0.clone(), notification.clone());
        Ok(())
    }

    async fn list_for_workflow(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<Notification>, CoreError> {
        let notifications = self.notifications.read().await;

        let result = notifications
            .values()
            .filter(|notification| notification.workflow_id == *workflow_id)
            .cloned()
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStateStoreProvider;
    use leaseexit_core::domain::approval::ApproverRole;
    use leaseexit_core::domain::form::FormType;
    use leaseexit_core::domain::notification::{NotificationType, Recipient};
    use leaseexit_core::DataPacket;
    use serde_json::json;

    #[tokio::test]
    async fn test_workflow_round_trip() {
        let provider = InMemoryStateStoreProvider::new();
        let (workflows, _, _, _) = provider.create_repositories();

        let workflow = Workflow::new(DataPacket::new(json!({"lease_id": "L1"})));
        workflows.save(&workflow).await.unwrap();

        let found = workflows.find_by_id(&workflow.id).await.unwrap().unwrap();
        assert_eq!(found.id, workflow.id);
        assert_eq!(found.state, workflow.state);

        let missing = workflows
            .find_by_id(&WorkflowId("wf_0.000000".to_string()))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_workflow_list_filter() {
        let provider = InMemoryStateStoreProvider::new();
        let (workflows, _, _, _) = provider.create_repositories();

        let draft = Workflow::new(DataPacket::null());
        let mut started = Workflow::new(DataPacket::null());
        started.begin().unwrap();

        workflows.save(&draft).await.unwrap();
        workflows.save(&started).await.unwrap();

        assert_eq!(workflows.list(None).await.unwrap().len(), 2);

        let in_progress = workflows
            .list(Some(WorkflowState::InProgress))
            .await
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, started.id);
    }

    #[tokio::test]
    async fn test_save_is_last_write_wins() {
        let provider = InMemoryStateStoreProvider::new();
        let (workflows, _, _, _) = provider.create_repositories();

        let mut workflow = Workflow::new(DataPacket::null());
        workflows.save(&workflow).await.unwrap();

        workflow.begin().unwrap();
        workflows.save(&workflow).await.unwrap();

        let found = workflows.find_by_id(&workflow.id).await.unwrap().unwrap();
        assert_eq!(found.state, WorkflowState::InProgress);
        assert_eq!(workflows.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_child_records_scope_by_workflow() {
        let provider = InMemoryStateStoreProvider::new();
        let (_, forms, approvals, notifications) = provider.create_repositories();

        let wf_a = WorkflowId("wf_1.000000".to_string());
        let wf_b = WorkflowId("wf_2.000000".to_string());

        let form = Form::new(
            wf_a.clone(),
            FormType::InitialForm,
            "submitter",
            DataPacket::null(),
            Vec::new(),
        );
        forms.save(&form).await.unwrap();

        let approval = Approval::new(wf_a.clone(), ApproverRole::Ifm);
        approvals.save(&approval).await.unwrap();

        let notification = Notification::new(
            wf_a.clone(),
            Recipient::new("ifm"),
            NotificationType::StatusUpdate,
            DataPacket::null(),
        );
        notifications.save(&notification).await.unwrap();

        assert_eq!(forms.list_for_workflow(&wf_a).await.unwrap().len(), 1);
        assert!(forms.list_for_workflow(&wf_b).await.unwrap().is_empty());

        assert_eq!(
            approvals.find_by_id(&approval.id).await.unwrap().unwrap().id,
            approval.id
        );
        assert_eq!(
            notifications
                .find_by_id(&notification.id)
                .await
                .unwrap()
                .unwrap()
                .id,
            notification.id
        );
    }

    #[tokio::test]
    async fn test_repositories_share_one_store() {
        let provider = InMemoryStateStoreProvider::new();
        let (first, _, _, _) = provider.create_repositories();
        let (second, _, _, _) = provider.create_repositories();

        let workflow = Workflow::new(DataPacket::null());
        first.save(&workflow).await.unwrap();

        let found = second.find_by_id(&workflow.id).await.unwrap();
        assert!(found.is_some());
    }
}
