use crate::{
    config::EngineConfig,
    domain::approval::{
        validate_chain, Approval, ApprovalDecision, ApprovalId, ApproverRole, ChainResult,
    },
    domain::events::{ApprovalChainInitiated, ApprovalDecisionRecorded, FormSubmitted,
        NotificationRecorded},
    domain::form::{form_complete, validate_form, DocumentRef, Form, FormType, ValidationResult},
    domain::notification::{Notification, NotificationType, Recipient},
    domain::repository::{
        ApprovalRepository, FormRepository, NotificationRepository, WorkflowRepository,
    },
    domain::routing::{recipients_for_form, status_message_for},
    domain::step::StepName,
    domain::workflow::{Workflow, WorkflowId, WorkflowState},
    CoreError, DataPacket, NotificationDispatcher,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Outcome of a form submission
#[derive(Debug)]
pub struct FormSubmissionOutcome {
    /// The workflow after the submission was processed
    pub workflow: Workflow,

    /// The persisted form, `None` when validation failed
    pub form: Option<Form>,

    /// The validation result, returned for valid and invalid submissions alike
    pub validation: ValidationResult,
}

/// Outcome of applying an approval decision
#[derive(Debug)]
pub struct DecisionOutcome {
    /// The decided approval record
    pub approval: Approval,

    /// Chain classification after the decision landed
    pub chain: ChainResult,

    /// The workflow after any resulting state transition
    pub workflow: Workflow,
}

/// Condensed workflow listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Workflow ID
    pub id: String,

    /// Lifecycle state wire name
    pub state: String,

    /// Current step wire name
    pub current_step: String,

    /// Creation timestamp, ISO-8601
    pub created_at: String,

    /// Last update timestamp, ISO-8601
    pub updated_at: String,
}

/// Service orchestrating workflow mutations
///
/// Every operation either fully applies and returns success or fails
/// visibly; notification delivery is fire-and-forget and never rolls back a
/// persisted state change.
pub struct WorkflowService {
    config: EngineConfig,
    workflows: Arc<dyn WorkflowRepository>,
    forms: Arc<dyn FormRepository>,
    approvals: Arc<dyn ApprovalRepository>,
    notifications: Arc<dyn NotificationRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl WorkflowService {
    /// Create a new workflow service over explicit collaborators
    pub fn new(
        config: EngineConfig,
        workflows: Arc<dyn WorkflowRepository>,
        forms: Arc<dyn FormRepository>,
        approvals: Arc<dyn ApprovalRepository>,
        notifications: Arc<dyn NotificationRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        tracing::debug!(service = %config.service_name, "Workflow service constructed");
        Self {
            config,
            workflows,
            forms,
            approvals,
            notifications,
            dispatcher,
        }
    }

    /// The configuration this service runs with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn load_workflow(&self, id: &WorkflowId) -> Result<Workflow, CoreError> {
        self.workflows
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::WorkflowNotFound(id.0.clone()))
    }

    /// Record and dispatch a notification
    ///
    /// The audit record is persisted first; a store or delivery failure is
    /// logged and swallowed so the triggering state change stands.
    async fn notify(&self, workflow: &mut Workflow, notification: Notification) {
        if let Err(error) = self.notifications.save(&notification).await {
            tracing::warn!(
                workflow_id = %notification.workflow_id,
                recipient = %notification.recipient,
                %error,
                "Failed to persist notification record"
            );
            return;
        }

        workflow.record_event(Box::new(NotificationRecorded {
            workflow_id: notification.workflow_id.clone(),
            notification_id: notification.id.clone(),
            notification_type: notification.notification_type,
            timestamp: Utc::now(),
        }));

        if let Err(error) = self.dispatcher.dispatch(&notification).await {
            tracing::warn!(
                notification_id = %notification.id,
                recipient = %notification.recipient,
                %error,
                "Notification dispatch failed"
            );
        }
    }

    /// The team that opened the workflow, for revision and status updates
    ///
    /// Resolved from the earliest initial form on file; before one exists,
    /// updates go to the lease exit team.
    async fn originating_team(&self, workflow_id: &WorkflowId) -> Result<Recipient, CoreError> {
        let forms = self.forms.list_for_workflow(workflow_id).await?;
        let submitter = forms
            .iter()
            .filter(|form| form.form_type == FormType::InitialForm)
            .min_by_key(|form| form.created_at)
            .map(|form| form.submitted_by.clone());

        Ok(submitter
            .map(Recipient::new)
            .unwrap_or_else(|| Recipient::new("lease_exit_team")))
    }

    async fn notify_status(
        &self,
        workflow: &mut Workflow,
        notification_type: NotificationType,
    ) -> Result<(), CoreError> {
        let recipient = self.originating_team(&workflow.id).await?;
        let notification = Notification::new(
            workflow.id.clone(),
            recipient,
            notification_type,
            DataPacket::new(json!({
                "state": workflow.state.as_str(),
                "message": status_message_for(workflow.state),
            })),
        );
        self.notify(workflow, notification).await;
        Ok(())
    }

    /// Create a new workflow from lease data and start it
    pub async fn create_workflow(&self, lease_data: DataPacket) -> Result<Workflow, CoreError> {
        let mut workflow = Workflow::new(lease_data);
        workflow.begin()?;
        self.workflows.save(&workflow).await?;

        tracing::info!(
            workflow_id = %workflow.id,
            state = %workflow.state,
            "Workflow created"
        );

        Ok(workflow)
    }

    /// Validate and persist a form submission
    ///
    /// Validation is a pre-check gate: an invalid submission is returned as
    /// a structured result and nothing is persisted. A valid submission
    /// stores the form, advances the workflow one step, and notifies the
    /// roles routed for the form type.
    pub async fn submit_form(
        &self,
        workflow_id: &WorkflowId,
        form_type: FormType,
        submitted_by: impl Into<String>,
        data: DataPacket,
        documents: Vec<DocumentRef>,
    ) -> Result<FormSubmissionOutcome, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;

        let validation = validate_form(form_type, &data);
        if !validation.valid {
            tracing::info!(
                workflow_id = %workflow.id,
                form_type = %form_type,
                errors = validation.errors.len(),
                "Form submission failed validation"
            );
            return Ok(FormSubmissionOutcome {
                workflow,
                form: None,
                validation,
            });
        }

        let form = Form::new(
            workflow_id.clone(),
            form_type,
            submitted_by,
            data,
            documents,
        );
        self.forms.save(&form).await?;

        workflow.record_event(Box::new(FormSubmitted {
            workflow_id: workflow.id.clone(),
            form_id: form.id.clone(),
            form_type,
            timestamp: Utc::now(),
        }));
        workflow.advance_step();
        self.workflows.save(&workflow).await?;

        tracing::info!(
            workflow_id = %workflow.id,
            form_id = %form.id,
            form_type = %form_type,
            current_step = %workflow.current_step,
            "Form accepted"
        );

        for recipient in recipients_for_form(form_type) {
            let notification = Notification::new(
                workflow.id.clone(),
                recipient,
                NotificationType::FormSubmission,
                DataPacket::new(json!({
                    "form_id": form.id.0,
                    "form_type": form_type.as_str(),
                    "submitted_by": form.submitted_by,
                })),
            );
            self.notify(&mut workflow, notification).await;
        }

        Ok(FormSubmissionOutcome {
            workflow,
            form: Some(form),
            validation,
        })
    }

    /// Advance a workflow one step in the fixed sequence
    pub async fn advance_workflow_step(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Workflow, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;
        workflow.advance_step();
        self.workflows.save(&workflow).await?;

        tracing::info!(
            workflow_id = %workflow.id,
            current_step = %workflow.current_step,
            "Workflow step advanced"
        );

        Ok(workflow)
    }

    /// Move a workflow to a new lifecycle state
    pub async fn update_workflow_state(
        &self,
        workflow_id: &WorkflowId,
        new_state: WorkflowState,
    ) -> Result<Workflow, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;
        workflow.transition_to(new_state)?;
        self.workflows.save(&workflow).await?;

        tracing::info!(
            workflow_id = %workflow.id,
            state = %workflow.state,
            "Workflow state updated"
        );

        self.notify_status(&mut workflow, NotificationType::StatusUpdate)
            .await?;

        Ok(workflow)
    }

    /// Create one pending approval per required role, in role order
    ///
    /// Not idempotent: a second call would create duplicate pending rows, so
    /// re-initiation is refused while any approvals exist for the workflow.
    pub async fn initiate_chain(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<Vec<ApprovalId>, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;

        let existing = self.approvals.list_for_workflow(workflow_id).await?;
        if !existing.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Approval chain already initiated for workflow {}",
                workflow_id
            )));
        }

        let mut approval_ids = Vec::with_capacity(ApproverRole::ALL.len());
        for role in ApproverRole::ALL {
            let approval = Approval::new(workflow_id.clone(), role);
            self.approvals.save(&approval).await?;
            approval_ids.push(approval.id);
        }

        if workflow.state == WorkflowState::InProgress {
            workflow.transition_to(WorkflowState::ReadyForApproval)?;
        }
        workflow.record_event(Box::new(ApprovalChainInitiated {
            workflow_id: workflow.id.clone(),
            approval_ids: approval_ids.clone(),
            timestamp: Utc::now(),
        }));
        self.workflows.save(&workflow).await?;

        tracing::info!(
            workflow_id = %workflow.id,
            approvals = approval_ids.len(),
            "Approval chain initiated"
        );

        for role in ApproverRole::ALL {
            let notification = Notification::new(
                workflow.id.clone(),
                Recipient::new(role.as_str()),
                NotificationType::ApprovalRequired,
                DataPacket::new(json!({
                    "approver_role": role.as_str(),
                    "order": role.order(),
                })),
            );
            self.notify(&mut workflow, notification).await;
        }

        Ok(approval_ids)
    }

    /// Record an approval decision and drive any resulting state transition
    ///
    /// A rejection moves the workflow to `Rejected` and sends a revision
    /// notification to the originating team. When the chain becomes fully
    /// approved, the workflow moves to `ReadyForExit`.
    pub async fn apply_decision(
        &self,
        workflow_id: &WorkflowId,
        approver_role: ApproverRole,
        decision: ApprovalDecision,
        comments: Option<String>,
    ) -> Result<DecisionOutcome, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;

        let mut chain_records = self.approvals.list_for_workflow(workflow_id).await?;
        let position = chain_records
            .iter()
            .enumerate()
            .filter(|(_, approval)| approval.approver_role == approver_role)
            .max_by_key(|(index, approval)| (approval.updated_at, *index))
            .map(|(index, _)| index)
            .ok_or_else(|| {
                CoreError::ApprovalNotFound(format!(
                    "No approval for role {} on workflow {}",
                    approver_role, workflow_id
                ))
            })?;

        chain_records[position].apply(decision, comments)?;
        let approval = chain_records[position].clone();
        self.approvals.save(&approval).await?;

        workflow.record_event(Box::new(ApprovalDecisionRecorded {
            workflow_id: workflow.id.clone(),
            approval_id: approval.id.clone(),
            approver_role,
            status: approval.status,
            timestamp: Utc::now(),
        }));

        let chain = validate_chain(&chain_records);

        tracing::info!(
            workflow_id = %workflow.id,
            approver_role = %approver_role,
            decision = %decision,
            chain_valid = chain.valid,
            "Approval decision recorded"
        );

        match decision {
            ApprovalDecision::Rejected => {
                if workflow.state != WorkflowState::Rejected {
                    workflow.reject()?;
                }
                self.workflows.save(&workflow).await?;
                self.notify_status(&mut workflow, NotificationType::RevisionRequired)
                    .await?;
            }
            ApprovalDecision::Approved if chain.valid => {
                // A rejected workflow stays rejected until resubmission, even
                // when every role has since approved
                if matches!(
                    workflow.state,
                    WorkflowState::InProgress
                        | WorkflowState::ReadyForApproval
                        | WorkflowState::Approved
                ) {
                    workflow.mark_ready_for_exit()?;
                    if workflow.current_step == StepName::ApprovalChain {
                        workflow.advance_step();
                    }
                }
                self.workflows.save(&workflow).await?;
                self.notify_status(&mut workflow, NotificationType::StatusUpdate)
                    .await?;
            }
            ApprovalDecision::Approved => {
                self.workflows.save(&workflow).await?;
            }
        }

        Ok(DecisionOutcome {
            approval,
            chain,
            workflow,
        })
    }

    /// Whether at least one form of each configured required type is on file
    pub async fn is_form_complete(&self, workflow_id: &WorkflowId) -> Result<bool, CoreError> {
        self.load_workflow(workflow_id).await?;
        let forms = self.forms.list_for_workflow(workflow_id).await?;
        Ok(form_complete(&forms, &self.config.required_form_types))
    }

    /// Classify the approval chain for a workflow
    pub async fn validate_chain_for(
        &self,
        workflow_id: &WorkflowId,
    ) -> Result<ChainResult, CoreError> {
        self.load_workflow(workflow_id).await?;
        let approvals = self.approvals.list_for_workflow(workflow_id).await?;
        Ok(validate_chain(&approvals))
    }

    /// Resubmit a rejected workflow for another pass
    pub async fn resubmit(&self, workflow_id: &WorkflowId) -> Result<Workflow, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;
        workflow.resubmit()?;
        self.workflows.save(&workflow).await?;

        tracing::info!(workflow_id = %workflow.id, "Workflow resubmitted");

        self.notify_status(&mut workflow, NotificationType::StatusUpdate)
            .await?;

        Ok(workflow)
    }

    /// Finish a workflow that is ready for exit
    pub async fn finalize(&self, workflow_id: &WorkflowId) -> Result<Workflow, CoreError> {
        let mut workflow = self.load_workflow(workflow_id).await?;
        workflow.finalize()?;
        self.workflows.save(&workflow).await?;

        tracing::info!(workflow_id = %workflow.id, "Workflow completed");

        self.notify_status(&mut workflow, NotificationType::StatusUpdate)
            .await?;

        Ok(workflow)
    }

    /// List workflows as condensed summaries, optionally filtered by state
    pub async fn list_workflows(
        &self,
        state: Option<WorkflowState>,
    ) -> Result<Vec<WorkflowSummary>, CoreError> {
        let workflows = self.workflows.list(state).await?;

        Ok(workflows
            .into_iter()
            .map(|workflow| WorkflowSummary {
                id: workflow.id.0,
                state: workflow.state.as_str().to_string(),
                current_step: workflow.current_step.as_str().to_string(),
                created_at: workflow.created_at.to_rfc3339(),
                updated_at: workflow.updated_at.to_rfc3339(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::memory::{
        MemoryApprovalRepository, MemoryFormRepository, MemoryNotificationRepository,
        MemoryWorkflowRepository,
    };
    use crate::domain::step::StepName;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Dispatcher that records what it was asked to deliver
    #[derive(Default)]
    struct RecordingDispatcher {
        delivered: Mutex<Vec<Notification>>,
        fail: bool,
    }

    impl RecordingDispatcher {
        fn failing() -> Self {
            Self {
                delivered: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn delivered(&self) -> Vec<Notification> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationDispatcher for RecordingDispatcher {
        async fn dispatch(&self, notification: &Notification) -> Result<(), CoreError> {
            if self.fail {
                return Err(CoreError::NotificationError("channel down".to_string()));
            }
            self.delivered.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct Harness {
        service: WorkflowService,
        notifications: Arc<MemoryNotificationRepository>,
        dispatcher: Arc<RecordingDispatcher>,
    }

    fn harness() -> Harness {
        harness_with(Arc::new(RecordingDispatcher::default()))
    }

    fn harness_with(dispatcher: Arc<RecordingDispatcher>) -> Harness {
        let notifications = Arc::new(MemoryNotificationRepository::new());
        let service = WorkflowService::new(
            EngineConfig::default(),
            Arc::new(MemoryWorkflowRepository::new()),
            Arc::new(MemoryFormRepository::new()),
            Arc::new(MemoryApprovalRepository::new()),
            notifications.clone(),
            dispatcher.clone(),
        );
        Harness {
            service,
            notifications,
            dispatcher,
        }
    }

    fn lease_data() -> DataPacket {
        DataPacket::new(json!({
            "property_name": "100 Main St",
            "property_type": "office",
            "lease_end_date": "2026-12-31",
            "exit_reason": "downsizing"
        }))
    }

    fn initial_form_data() -> DataPacket {
        DataPacket::new(json!({
            "lease_id": "L1",
            "exit_date": "2026-12-31",
            "reason": "downsizing"
        }))
    }

    #[tokio::test]
    async fn test_create_workflow_starts_in_progress() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        assert_eq!(workflow.state, WorkflowState::InProgress);
        assert_eq!(workflow.current_step, StepName::InitialForm);

        let found = h
            .service
            .load_workflow(&workflow.id)
            .await
            .unwrap();
        assert_eq!(found.state, WorkflowState::InProgress);
    }

    #[tokio::test]
    async fn test_submit_valid_form_advances_and_notifies() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        let outcome = h
            .service
            .submit_form(
                &workflow.id,
                FormType::InitialForm,
                "lease_exit_team",
                initial_form_data(),
                Vec::new(),
            )
            .await
            .unwrap();

        assert!(outcome.validation.valid);
        assert!(outcome.form.is_some());
        assert_eq!(outcome.workflow.current_step, StepName::AdvisoryReview);

        // initial_form routes to advisory, ifm, legal
        let delivered = h.dispatcher.delivered();
        assert_eq!(delivered.len(), 3);
        let recipients: Vec<String> =
            delivered.iter().map(|n| n.recipient.0.clone()).collect();
        assert_eq!(recipients, vec!["advisory", "ifm", "legal"]);

        let records = h
            .notifications
            .list_for_workflow(&workflow.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_submit_invalid_form_persists_nothing() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        let outcome = h
            .service
            .submit_form(
                &workflow.id,
                FormType::InitialForm,
                "lease_exit_team",
                DataPacket::new(json!({"lease_id": "L1", "exit_date": "2025-01-01"})),
                Vec::new(),
            )
            .await
            .unwrap();

        assert!(!outcome.validation.valid);
        assert!(outcome.form.is_none());
        assert!(outcome
            .validation
            .errors
            .contains(&"Missing required field: reason".to_string()));

        // No step advancement, no notifications
        assert_eq!(outcome.workflow.current_step, StepName::InitialForm);
        assert!(h.dispatcher.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_submit_form_for_unknown_workflow() {
        let h = harness();
        let result = h
            .service
            .submit_form(
                &WorkflowId("wf_0.000000".to_string()),
                FormType::InitialForm,
                "nobody",
                initial_form_data(),
                Vec::new(),
            )
            .await;

        assert!(matches!(result, Err(CoreError::WorkflowNotFound(_))));
    }

    #[tokio::test]
    async fn test_initiate_chain_creates_five_pending_approvals() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        let ids = h.service.initiate_chain(&workflow.id).await.unwrap();
        assert_eq!(ids.len(), 5);

        let chain = h.service.validate_chain_for(&workflow.id).await.unwrap();
        assert!(!chain.valid);
        assert_eq!(chain.pending.len(), 5);
        assert!(chain.errors.is_empty());

        // One approval_required notification per role, in role order
        let delivered = h.dispatcher.delivered();
        assert_eq!(delivered.len(), 5);
        assert!(delivered
            .iter()
            .all(|n| n.notification_type == NotificationType::ApprovalRequired));

        // Chain initiation moves the lifecycle forward
        let reloaded = h.service.load_workflow(&workflow.id).await.unwrap();
        assert_eq!(reloaded.state, WorkflowState::ReadyForApproval);
    }

    #[tokio::test]
    async fn test_initiate_chain_refuses_reinitiation() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        h.service.initiate_chain(&workflow.id).await.unwrap();
        let second = h.service.initiate_chain(&workflow.id).await;

        assert!(matches!(second, Err(CoreError::ValidationError(_))));

        // Still exactly five approvals
        let chain = h.service.validate_chain_for(&workflow.id).await.unwrap();
        assert_eq!(chain.pending.len(), 5);
    }

    #[tokio::test]
    async fn test_rejection_moves_workflow_to_rejected() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();
        h.service
            .submit_form(
                &workflow.id,
                FormType::InitialForm,
                "north_region_team",
                initial_form_data(),
                Vec::new(),
            )
            .await
            .unwrap();
        h.service.initiate_chain(&workflow.id).await.unwrap();

        let outcome = h
            .service
            .apply_decision(
                &workflow.id,
                ApproverRole::Legal,
                ApprovalDecision::Rejected,
                Some("missing sublease terms".to_string()),
            )
            .await
            .unwrap();

        assert!(!outcome.chain.valid);
        assert_eq!(outcome.workflow.state, WorkflowState::Rejected);
        assert_eq!(outcome.approval.comments.as_deref(), Some("missing sublease terms"));

        // Revision notification went to the initial form's submitter
        let revision: Vec<Notification> = h
            .dispatcher
            .delivered()
            .into_iter()
            .filter(|n| n.notification_type == NotificationType::RevisionRequired)
            .collect();
        assert_eq!(revision.len(), 1);
        assert_eq!(revision[0].recipient.0, "north_region_team");
    }

    #[tokio::test]
    async fn test_full_approval_moves_workflow_to_ready_for_exit() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();
        h.service.initiate_chain(&workflow.id).await.unwrap();

        for role in ApproverRole::ALL {
            h.service
                .apply_decision(&workflow.id, role, ApprovalDecision::Approved, None)
                .await
                .unwrap();
        }

        let chain = h.service.validate_chain_for(&workflow.id).await.unwrap();
        assert!(chain.valid);

        let reloaded = h.service.load_workflow(&workflow.id).await.unwrap();
        assert_eq!(reloaded.state, WorkflowState::ReadyForExit);
    }

    #[tokio::test]
    async fn test_reversed_rejection_still_requires_resubmission() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();
        h.service.initiate_chain(&workflow.id).await.unwrap();

        for role in [
            ApproverRole::Advisory,
            ApproverRole::Ifm,
            ApproverRole::Legal,
            ApproverRole::Mac,
        ] {
            h.service
                .apply_decision(&workflow.id, role, ApprovalDecision::Approved, None)
                .await
                .unwrap();
        }
        h.service
            .apply_decision(
                &workflow.id,
                ApproverRole::Pjm,
                ApprovalDecision::Rejected,
                None,
            )
            .await
            .unwrap();

        // The rejecting role reverses itself without a resubmission: the
        // chain reads valid, but the workflow stays rejected
        let outcome = h
            .service
            .apply_decision(
                &workflow.id,
                ApproverRole::Pjm,
                ApprovalDecision::Approved,
                None,
            )
            .await
            .unwrap();
        assert!(outcome.chain.valid);
        assert_eq!(outcome.workflow.state, WorkflowState::Rejected);

        // Resubmission and a fresh decision complete the pass
        h.service.resubmit(&workflow.id).await.unwrap();
        let outcome = h
            .service
            .apply_decision(
                &workflow.id,
                ApproverRole::Pjm,
                ApprovalDecision::Approved,
                None,
            )
            .await
            .unwrap();
        assert_eq!(outcome.workflow.state, WorkflowState::ReadyForExit);
    }

    #[tokio::test]
    async fn test_decision_for_missing_role_errors() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        let result = h
            .service
            .apply_decision(
                &workflow.id,
                ApproverRole::Mac,
                ApprovalDecision::Approved,
                None,
            )
            .await;

        assert!(matches!(result, Err(CoreError::ApprovalNotFound(_))));
    }

    #[tokio::test]
    async fn test_dispatch_failure_never_rolls_back_state() {
        let h = harness_with(Arc::new(RecordingDispatcher::failing()));
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();
        h.service.initiate_chain(&workflow.id).await.unwrap();

        let outcome = h
            .service
            .apply_decision(
                &workflow.id,
                ApproverRole::Advisory,
                ApprovalDecision::Rejected,
                None,
            )
            .await
            .unwrap();

        // Delivery failed, but the rejection stands and the audit record exists
        assert_eq!(outcome.workflow.state, WorkflowState::Rejected);
        let records = h
            .notifications
            .list_for_workflow(&workflow.id)
            .await
            .unwrap();
        assert!(!records.is_empty());
    }

    #[tokio::test]
    async fn test_update_workflow_state_rejects_illegal_move() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        let result = h
            .service
            .update_workflow_state(&workflow.id, WorkflowState::Draft)
            .await;

        assert!(matches!(result, Err(CoreError::StateTransitionError(_))));
    }

    #[tokio::test]
    async fn test_list_workflows_filters_by_state() {
        let h = harness();
        let a = h.service.create_workflow(lease_data()).await.unwrap();
        let b = h.service.create_workflow(lease_data()).await.unwrap();
        h.service.initiate_chain(&b.id).await.unwrap();

        let all = h.service.list_workflows(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let in_progress = h
            .service
            .list_workflows(Some(WorkflowState::InProgress))
            .await
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, a.id.0);
        assert_eq!(in_progress[0].state, "in_progress");
    }

    #[tokio::test]
    async fn test_form_completeness_uses_configured_set() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();

        assert!(!h.service.is_form_complete(&workflow.id).await.unwrap());

        // The default config requires all five form types
        h.service
            .submit_form(
                &workflow.id,
                FormType::InitialForm,
                "lease_exit_team",
                initial_form_data(),
                Vec::new(),
            )
            .await
            .unwrap();
        assert!(!h.service.is_form_complete(&workflow.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_resubmit_and_finalize() {
        let h = harness();
        let workflow = h.service.create_workflow(lease_data()).await.unwrap();
        h.service.initiate_chain(&workflow.id).await.unwrap();

        h.service
            .apply_decision(
                &workflow.id,
                ApproverRole::Pjm,
                ApprovalDecision::Rejected,
                None,
            )
            .await
            .unwrap();

        let resubmitted = h.service.resubmit(&workflow.id).await.unwrap();
        assert_eq!(resubmitted.state, WorkflowState::InProgress);

        for role in ApproverRole::ALL {
            h.service
                .apply_decision(&workflow.id, role, ApprovalDecision::Approved, None)
                .await
                .unwrap();
        }

        let finalized = h.service.finalize(&workflow.id).await.unwrap();
        assert_eq!(finalized.state, WorkflowState::Completed);

        // Completed is terminal
        assert!(h.service.finalize(&workflow.id).await.is_err());
    }
}
