use crate::domain::approval::{ApprovalId, ApprovalStatus, ApproverRole};
use crate::domain::form::{FormId, FormType};
use crate::domain::notification::{NotificationId, NotificationType};
use crate::domain::step::StepName;
use crate::domain::workflow::{WorkflowId, WorkflowState};
use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Domain event trait for all events in the system
pub trait DomainEvent: Debug + Send + Sync {
    /// Returns the type of the event as a string
    fn event_type(&self) -> &'static str;

    /// Returns the workflow ID this event is associated with
    fn workflow_id(&self) -> &WorkflowId;

    /// Returns the timestamp when the event occurred
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Event: Workflow created
#[derive(Debug)]
pub struct WorkflowCreated {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The timestamp when the workflow was created
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for WorkflowCreated {
    fn event_type(&self) -> &'static str {
        "workflow.created"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Event: Workflow state changed
#[derive(Debug)]
pub struct WorkflowStateChanged {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The state the workflow left
    pub from: WorkflowState,

    /// The state the workflow entered
    pub to: WorkflowState,

    /// The timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for WorkflowStateChanged {
    fn event_type(&self) -> &'static str {
        "workflow.state_changed"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Event: Workflow advanced to the next step
#[derive(Debug)]
pub struct StepAdvanced {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The step the workflow left
    pub from: StepName,

    /// The step the workflow entered
    pub to: StepName,

    /// The timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for StepAdvanced {
    fn event_type(&self) -> &'static str {
        "workflow.step_advanced"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Event: Form submitted for a workflow
#[derive(Debug)]
pub struct FormSubmitted {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The identifier of the submitted form
    pub form_id: FormId,

    /// The type of the submitted form
    pub form_type: FormType,

    /// The timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for FormSubmitted {
    fn event_type(&self) -> &'static str {
        "form.submitted"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Event: Approval chain initiated
#[derive(Debug)]
pub struct ApprovalChainInitiated {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The identifiers of the pending approvals, in role order
    pub approval_ids: Vec<ApprovalId>,

    /// The timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for ApprovalChainInitiated {
    fn event_type(&self) -> &'static str {
        "approval_chain.initiated"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Event: Approval decision recorded
#[derive(Debug)]
pub struct ApprovalDecisionRecorded {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The identifier of the decided approval
    pub approval_id: ApprovalId,

    /// The role that decided
    pub approver_role: ApproverRole,

    /// The resulting approval status
    pub status: ApprovalStatus,

    /// The timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for ApprovalDecisionRecorded {
    fn event_type(&self) -> &'static str {
        "approval.decision_recorded"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Event: Notification recorded for dispatch
#[derive(Debug)]
pub struct NotificationRecorded {
    /// The unique identifier of the workflow
    pub workflow_id: WorkflowId,

    /// The identifier of the notification record
    pub notification_id: NotificationId,

    /// The type of the notification
    pub notification_type: NotificationType,

    /// The timestamp when the event occurred
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for NotificationRecorded {
    fn event_type(&self) -> &'static str {
        "notification.recorded"
    }

    fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
