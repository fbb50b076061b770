use crate::{
    domain::approval::Approval,
    domain::form::{form_complete, Form, FormType},
    domain::notification::Notification,
    domain::repository::{
        ApprovalRepository, FormRepository, NotificationRepository, WorkflowRepository,
    },
    domain::step::StepName,
    domain::workflow::{WorkflowId, WorkflowState},
    CoreError, DataPacket,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Composite read model of one workflow and everything attached to it
///
/// A read-only join across the four record sets keyed by workflow ID. Child
/// collections come back in store-reported order; use
/// [`WorkflowProgress::sort_chronologically`] when stable order matters.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowProgress {
    /// Workflow ID
    pub id: String,

    /// Lifecycle state
    pub state: WorkflowState,

    /// Current step
    pub current_step: StepName,

    /// Opaque lease payload
    pub data: DataPacket,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Forms submitted for the workflow
    pub forms: Vec<Form>,

    /// Approval records for the workflow
    pub approvals: Vec<Approval>,

    /// Notification audit records for the workflow
    pub notifications: Vec<Notification>,
}

impl WorkflowProgress {
    /// Sort child collections by creation time, oldest first
    pub fn sort_chronologically(&mut self) {
        self.forms.sort_by_key(|form| form.created_at);
        self.approvals.sort_by_key(|approval| approval.created_at);
        self.notifications
            .sort_by_key(|notification| notification.created_at);
    }

    /// Whether at least one form of each required type is on file
    pub fn is_form_complete(&self, required: &[FormType]) -> bool {
        form_complete(&self.forms, required)
    }
}

/// Read-side service assembling workflow progress views
pub struct ProgressService {
    workflows: Arc<dyn WorkflowRepository>,
    forms: Arc<dyn FormRepository>,
    approvals: Arc<dyn ApprovalRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl ProgressService {
    /// Create a new progress service over explicit repositories
    pub fn new(
        workflows: Arc<dyn WorkflowRepository>,
        forms: Arc<dyn FormRepository>,
        approvals: Arc<dyn ApprovalRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            workflows,
            forms,
            approvals,
            notifications,
        }
    }

    /// Assemble the progress view for a workflow
    ///
    /// Returns `None` for an unknown workflow ID rather than an empty
    /// default object. Used by both the polling read endpoint and the
    /// initial-state push on stream subscription.
    pub async fn get_progress(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowProgress>, CoreError> {
        let workflow = match self.workflows.find_by_id(workflow_id).await? {
            Some(workflow) => workflow,
            None => return Ok(None),
        };

        let (forms, approvals, notifications) = futures::try_join!(
            self.forms.list_for_workflow(workflow_id),
            self.approvals.list_for_workflow(workflow_id),
            self.notifications.list_for_workflow(workflow_id),
        )?;

        tracing::debug!(
            workflow_id = %workflow.id,
            forms = forms.len(),
            approvals = approvals.len(),
            notifications = notifications.len(),
            "Progress view assembled"
        );

        Ok(Some(WorkflowProgress {
            id: workflow.id.0.clone(),
            state: workflow.state,
            current_step: workflow.current_step,
            data: workflow.lease_data.clone(),
            created_at: workflow.created_at,
            updated_at: workflow.updated_at,
            forms,
            approvals,
            notifications,
        }))
    }
}
