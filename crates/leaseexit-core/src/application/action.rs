//! Typed workflow operations
//!
//! Every operation the engine supports is a variant of [`WorkflowAction`],
//! dispatched with an exhaustive match. An operation outside the defined set
//! is unrepresentable, so there is no unknown-action failure mode at
//! runtime.

use crate::{
    application::engine::LeaseExitEngine,
    application::progress_service::WorkflowProgress,
    application::workflow_service::{DecisionOutcome, FormSubmissionOutcome, WorkflowSummary},
    domain::approval::{ApprovalDecision, ApprovalId, ApproverRole, ChainResult},
    domain::form::{DocumentRef, FormType},
    domain::workflow::{Workflow, WorkflowId, WorkflowState},
    CoreError, DataPacket,
};

/// One operation against the workflow engine
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Create and start a new workflow
    CreateWorkflow {
        /// Opaque lease payload
        lease_data: DataPacket,
    },

    /// Validate and persist a form submission
    SubmitForm {
        /// Target workflow
        workflow_id: WorkflowId,
        /// Schema the data adheres to
        form_type: FormType,
        /// Who submitted the form
        submitted_by: String,
        /// Submitted payload
        data: DataPacket,
        /// Supporting document references
        documents: Vec<DocumentRef>,
    },

    /// Move a workflow to a new lifecycle state
    UpdateWorkflowState {
        /// Target workflow
        workflow_id: WorkflowId,
        /// Requested state
        new_state: WorkflowState,
    },

    /// Advance a workflow one step in the fixed sequence
    AdvanceStep {
        /// Target workflow
        workflow_id: WorkflowId,
    },

    /// Create one pending approval per required role
    InitiateChain {
        /// Target workflow
        workflow_id: WorkflowId,
    },

    /// Record an approval decision
    ApplyDecision {
        /// Target workflow
        workflow_id: WorkflowId,
        /// Deciding role
        approver_role: ApproverRole,
        /// The decision
        decision: ApprovalDecision,
        /// Approver comments
        comments: Option<String>,
    },

    /// Classify the approval chain
    ValidateChain {
        /// Target workflow
        workflow_id: WorkflowId,
    },

    /// Resubmit a rejected workflow
    Resubmit {
        /// Target workflow
        workflow_id: WorkflowId,
    },

    /// Finish a workflow that is ready for exit
    Finalize {
        /// Target workflow
        workflow_id: WorkflowId,
    },

    /// Assemble the progress view
    GetProgress {
        /// Target workflow
        workflow_id: WorkflowId,
    },

    /// List workflows as summaries
    ListWorkflows {
        /// Optional state filter
        state: Option<WorkflowState>,
    },
}

/// Result of executing one [`WorkflowAction`]
#[derive(Debug)]
pub enum ActionOutcome {
    /// A workflow was created
    WorkflowCreated(Workflow),

    /// A form submission was processed
    FormSubmitted(FormSubmissionOutcome),

    /// A workflow changed state or step
    WorkflowUpdated(Workflow),

    /// An approval chain was initiated
    ChainInitiated(Vec<ApprovalId>),

    /// A decision was recorded
    DecisionApplied(DecisionOutcome),

    /// Chain classification
    ChainValidated(ChainResult),

    /// Progress view, `None` for an unknown workflow
    Progress(Option<WorkflowProgress>),

    /// Workflow summaries
    Workflows(Vec<WorkflowSummary>),
}

impl LeaseExitEngine {
    /// Execute one typed operation
    pub async fn execute(&self, action: WorkflowAction) -> Result<ActionOutcome, CoreError> {
        match action {
            WorkflowAction::CreateWorkflow { lease_data } => {
                let workflow = self.workflow_service().create_workflow(lease_data).await?;
                Ok(ActionOutcome::WorkflowCreated(workflow))
            }
            WorkflowAction::SubmitForm {
                workflow_id,
                form_type,
                submitted_by,
                data,
                documents,
            } => {
                let outcome = self
                    .workflow_service()
                    .submit_form(&workflow_id, form_type, submitted_by, data, documents)
                    .await?;
                Ok(ActionOutcome::FormSubmitted(outcome))
            }
            WorkflowAction::UpdateWorkflowState {
                workflow_id,
                new_state,
            } => {
                let workflow = self
                    .workflow_service()
                    .update_workflow_state(&workflow_id, new_state)
                    .await?;
                Ok(ActionOutcome::WorkflowUpdated(workflow))
            }
            WorkflowAction::AdvanceStep { workflow_id } => {
                let workflow = self
                    .workflow_service()
                    .advance_workflow_step(&workflow_id)
                    .await?;
                Ok(ActionOutcome::WorkflowUpdated(workflow))
            }
            WorkflowAction::InitiateChain { workflow_id } => {
                let approval_ids = self
                    .workflow_service()
                    .initiate_chain(&workflow_id)
                    .await?;
                Ok(ActionOutcome::ChainInitiated(approval_ids))
            }
            WorkflowAction::ApplyDecision {
                workflow_id,
                approver_role,
                decision,
                comments,
            } => {
                let outcome = self
                    .workflow_service()
                    .apply_decision(&workflow_id, approver_role, decision, comments)
                    .await?;
                Ok(ActionOutcome::DecisionApplied(outcome))
            }
            WorkflowAction::ValidateChain { workflow_id } => {
                let chain = self
                    .workflow_service()
                    .validate_chain_for(&workflow_id)
                    .await?;
                Ok(ActionOutcome::ChainValidated(chain))
            }
            WorkflowAction::Resubmit { workflow_id } => {
                let workflow = self.workflow_service().resubmit(&workflow_id).await?;
                Ok(ActionOutcome::WorkflowUpdated(workflow))
            }
            WorkflowAction::Finalize { workflow_id } => {
                let workflow = self.workflow_service().finalize(&workflow_id).await?;
                Ok(ActionOutcome::WorkflowUpdated(workflow))
            }
            WorkflowAction::GetProgress { workflow_id } => {
                let progress = self.progress_service().get_progress(&workflow_id).await?;
                Ok(ActionOutcome::Progress(progress))
            }
            WorkflowAction::ListWorkflows { state } => {
                let workflows = self.workflow_service().list_workflows(state).await?;
                Ok(ActionOutcome::Workflows(workflows))
            }
        }
    }
}
