use crate::{
    domain::events::{DomainEvent, StepAdvanced, WorkflowCreated, WorkflowStateChanged},
    domain::ids::prefixed_id,
    domain::step::StepName,
    CoreError, DataPacket,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle phase of a workflow, distinct from the finer-grained step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Workflow record exists but has not started
    Draft,

    /// Workflow is moving through its review steps
    InProgress,

    /// Forms are complete and the approval chain is collecting decisions
    ReadyForApproval,

    /// Every required approver role has approved
    Approved,

    /// An approver rejected; awaiting revision and resubmission
    Rejected,

    /// Cleared for the lease exit itself
    ReadyForExit,

    /// Lease exit finished; terminal
    Completed,
}

impl WorkflowState {
    /// Forward position in the lifecycle; rejection sits outside the line
    fn rank(self) -> Option<u8> {
        match self {
            WorkflowState::Draft => Some(0),
            WorkflowState::InProgress => Some(1),
            WorkflowState::ReadyForApproval => Some(2),
            WorkflowState::Approved => Some(3),
            WorkflowState::ReadyForExit => Some(4),
            WorkflowState::Completed => Some(5),
            WorkflowState::Rejected => None,
        }
    }

    /// The snake_case wire name of this state
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowState::Draft => "draft",
            WorkflowState::InProgress => "in_progress",
            WorkflowState::ReadyForApproval => "ready_for_approval",
            WorkflowState::Approved => "approved",
            WorkflowState::Rejected => "rejected",
            WorkflowState::ReadyForExit => "ready_for_exit",
            WorkflowState::Completed => "completed",
        }
    }

    /// Parse a wire name into a state, `None` for unknown names
    pub fn parse(name: &str) -> Option<WorkflowState> {
        const ALL: [WorkflowState; 7] = [
            WorkflowState::Draft,
            WorkflowState::InProgress,
            WorkflowState::ReadyForApproval,
            WorkflowState::Approved,
            WorkflowState::Rejected,
            WorkflowState::ReadyForExit,
            WorkflowState::Completed,
        ];
        ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value object: Workflow ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub String);

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate: a single lease exit case progressing through steps and states
#[derive(Debug, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier
    pub id: WorkflowId,

    /// Opaque lease payload: property name/type, lease end date, exit reason
    pub lease_data: DataPacket,

    /// Coarse lifecycle state
    pub state: WorkflowState,

    /// Current step in the fixed sequence
    pub current_step: StepName,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp, monotonically non-decreasing
    pub updated_at: DateTime<Utc>,

    /// Domain events
    #[serde(skip)]
    pub events: Vec<Box<dyn DomainEvent>>,
}

// Manually implement Clone; domain events are not cloned
impl Clone for Workflow {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            lease_data: self.lease_data.clone(),
            state: self.state,
            current_step: self.current_step,
            created_at: self.created_at,
            updated_at: self.updated_at,
            events: Vec::new(),
        }
    }
}

impl Workflow {
    /// Create a new draft workflow at the first step
    pub fn new(lease_data: DataPacket) -> Self {
        let id = WorkflowId(prefixed_id("wf_"));
        let now = Utc::now();

        let mut workflow = Self {
            id: id.clone(),
            lease_data,
            state: WorkflowState::Draft,
            current_step: StepName::InitialForm,
            created_at: now,
            updated_at: now,
            events: Vec::with_capacity(4),
        };

        workflow.record_event(Box::new(WorkflowCreated {
            workflow_id: id,
            timestamp: now,
        }));

        workflow
    }

    /// Update the timestamp; never moves backward
    #[inline]
    pub fn update_timestamp(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Move to a new lifecycle state
    ///
    /// Legal moves: any forward move along the lifecycle, an explicit
    /// rejection while the workflow is under way, and resubmission from
    /// `Rejected` back to `InProgress`. `Completed` is terminal.
    pub fn transition_to(&mut self, next: WorkflowState) -> Result<(), CoreError> {
        let legal = match (self.state, next) {
            (WorkflowState::Completed, _) => false,
            (state, next) if state == next => false,
            (WorkflowState::Rejected, WorkflowState::InProgress) => true,
            (WorkflowState::Rejected, _) => false,
            // Rejection is the one allowed backward move, and only once the
            // workflow is actually under way
            (_, WorkflowState::Rejected) => matches!(
                self.state,
                WorkflowState::InProgress
                    | WorkflowState::ReadyForApproval
                    | WorkflowState::Approved
            ),
            (state, next) => match (state.rank(), next.rank()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        };

        if !legal {
            return Err(CoreError::StateTransitionError(format!(
                "Cannot move workflow from {} to {}",
                self.state, next
            )));
        }

        let from = self.state;
        self.state = next;

        self.record_event(Box::new(WorkflowStateChanged {
            workflow_id: self.id.clone(),
            from,
            to: next,
            timestamp: Utc::now(),
        }));

        self.update_timestamp();
        Ok(())
    }

    /// Start the workflow: Draft -> InProgress
    pub fn begin(&mut self) -> Result<(), CoreError> {
        if self.state != WorkflowState::Draft {
            return Err(CoreError::StateTransitionError(format!(
                "Cannot begin workflow in state: {}",
                self.state
            )));
        }
        self.transition_to(WorkflowState::InProgress)
    }

    /// Reject the workflow following an approver rejection
    pub fn reject(&mut self) -> Result<(), CoreError> {
        self.transition_to(WorkflowState::Rejected)
    }

    /// Resubmit a rejected workflow for another pass
    pub fn resubmit(&mut self) -> Result<(), CoreError> {
        if self.state != WorkflowState::Rejected {
            return Err(CoreError::StateTransitionError(format!(
                "Cannot resubmit workflow in state: {}",
                self.state
            )));
        }
        self.transition_to(WorkflowState::InProgress)
    }

    /// Mark the workflow cleared for exit after full approval
    pub fn mark_ready_for_exit(&mut self) -> Result<(), CoreError> {
        self.transition_to(WorkflowState::ReadyForExit)
    }

    /// Finish the workflow: ReadyForExit -> Completed
    pub fn finalize(&mut self) -> Result<(), CoreError> {
        if self.state != WorkflowState::ReadyForExit {
            return Err(CoreError::StateTransitionError(format!(
                "Cannot finalize workflow in state: {}",
                self.state
            )));
        }
        self.transition_to(WorkflowState::Completed)
    }

    /// Advance to the next step in the fixed sequence
    ///
    /// Idempotent at the terminal step; no event is recorded when the step
    /// does not change.
    pub fn advance_step(&mut self) {
        let from = self.current_step;
        let to = from.successor();
        if to == from {
            return;
        }

        self.current_step = to;

        self.record_event(Box::new(StepAdvanced {
            workflow_id: self.id.clone(),
            from,
            to,
            timestamp: Utc::now(),
        }));

        self.update_timestamp();
    }

    /// Record a domain event
    pub fn record_event(&mut self, event: Box<dyn DomainEvent>) {
        self.events.push(event);
    }

    /// Get and clear all domain events
    pub fn take_events(&mut self) -> Vec<Box<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_workflow() -> Workflow {
        Workflow::new(DataPacket::new(json!({
            "property_name": "100 Main St",
            "property_type": "office",
            "lease_end_date": "2026-12-31",
            "exit_reason": "downsizing"
        })))
    }

    #[test]
    fn test_new_workflow_defaults() {
        let workflow = create_workflow();

        assert!(workflow.id.0.starts_with("wf_"));
        assert_eq!(workflow.state, WorkflowState::Draft);
        assert_eq!(workflow.current_step, StepName::InitialForm);
        assert_eq!(workflow.created_at, workflow.updated_at);
        assert_eq!(workflow.lease_data.field("exit_reason").unwrap(), "downsizing");
        assert!(!workflow.events.is_empty());
    }

    #[test]
    fn test_begin() {
        let mut workflow = create_workflow();
        workflow.take_events();

        workflow.begin().unwrap();
        assert_eq!(workflow.state, WorkflowState::InProgress);
        assert_eq!(workflow.events.len(), 1);
        assert_eq!(workflow.events[0].event_type(), "workflow.state_changed");

        // A second begin is illegal
        assert!(workflow.begin().is_err());
    }

    #[test]
    fn test_forward_transitions() {
        let mut workflow = create_workflow();
        workflow.begin().unwrap();

        workflow.transition_to(WorkflowState::ReadyForApproval).unwrap();
        workflow.transition_to(WorkflowState::Approved).unwrap();
        workflow.mark_ready_for_exit().unwrap();
        workflow.finalize().unwrap();

        assert_eq!(workflow.state, WorkflowState::Completed);
    }

    #[test]
    fn test_forward_skips_are_allowed() {
        // The lifecycle can jump forward: in_progress straight to
        // ready_for_exit when the chain approves without a separate
        // ready_for_approval pass
        let mut workflow = create_workflow();
        workflow.begin().unwrap();

        workflow.mark_ready_for_exit().unwrap();
        assert_eq!(workflow.state, WorkflowState::ReadyForExit);
    }

    #[test]
    fn test_backward_transition_is_illegal() {
        let mut workflow = create_workflow();
        workflow.begin().unwrap();
        workflow.transition_to(WorkflowState::ReadyForApproval).unwrap();

        let result = workflow.transition_to(WorkflowState::InProgress);
        assert!(matches!(result, Err(CoreError::StateTransitionError(_))));
    }

    #[test]
    fn test_rejection_and_resubmission() {
        let mut workflow = create_workflow();
        workflow.begin().unwrap();

        workflow.reject().unwrap();
        assert_eq!(workflow.state, WorkflowState::Rejected);

        // From rejected, only resubmission is legal
        assert!(workflow.transition_to(WorkflowState::Completed).is_err());
        assert!(workflow.transition_to(WorkflowState::ReadyForExit).is_err());

        workflow.resubmit().unwrap();
        assert_eq!(workflow.state, WorkflowState::InProgress);
    }

    #[test]
    fn test_rejection_from_draft_is_illegal() {
        let mut workflow = create_workflow();
        assert!(workflow.reject().is_err());
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut workflow = create_workflow();
        workflow.begin().unwrap();
        workflow.mark_ready_for_exit().unwrap();
        workflow.finalize().unwrap();

        assert!(workflow.transition_to(WorkflowState::InProgress).is_err());
        assert!(workflow.reject().is_err());
        assert!(workflow.finalize().is_err());
    }

    #[test]
    fn test_advance_step_walks_the_sequence() {
        let mut workflow = create_workflow();
        workflow.take_events();

        for expected in StepName::SEQUENCE.into_iter().skip(1) {
            workflow.advance_step();
            assert_eq!(workflow.current_step, expected);
        }

        // Terminal step is idempotent and records no further events
        let events_before = workflow.events.len();
        workflow.advance_step();
        assert_eq!(workflow.current_step, StepName::ReadyForExit);
        assert_eq!(workflow.events.len(), events_before);
    }

    #[test]
    fn test_updated_at_never_decreases() {
        let mut workflow = create_workflow();
        let initial = workflow.updated_at;

        workflow.begin().unwrap();
        assert!(workflow.updated_at >= initial);

        let after_begin = workflow.updated_at;
        workflow.advance_step();
        assert!(workflow.updated_at >= after_begin);
    }

    #[test]
    fn test_clone_drops_events() {
        let workflow = create_workflow();
        assert!(!workflow.events.is_empty());

        let cloned = workflow.clone();
        assert!(cloned.events.is_empty());
        assert_eq!(cloned.id, workflow.id);
        assert_eq!(cloned.state, workflow.state);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut workflow = create_workflow();
        workflow.begin().unwrap();
        workflow.advance_step();

        let serialized = serde_json::to_string(&workflow).unwrap();
        let deserialized: Workflow = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.id, workflow.id);
        assert_eq!(deserialized.state, WorkflowState::InProgress);
        assert_eq!(deserialized.current_step, StepName::AdvisoryReview);
        assert!(deserialized.events.is_empty());
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(WorkflowState::ReadyForExit.as_str(), "ready_for_exit");
        assert_eq!(WorkflowState::parse("in_progress"), Some(WorkflowState::InProgress));
        assert_eq!(WorkflowState::parse("nope"), None);

        let serialized = serde_json::to_string(&WorkflowState::ReadyForApproval).unwrap();
        assert_eq!(serialized, "\"ready_for_approval\"");
    }
}
