//! Builders for realistic test records

use leaseexit_core::{DataPacket, FormType, StepName, Workflow, WorkflowState};
use serde_json::json;

/// Typical lease payload for a new workflow
pub fn lease_data() -> DataPacket {
    DataPacket::new(json!({
        "property_name": "100 Main St",
        "property_type": "office",
        "lease_end_date": "2026-12-31",
        "exit_reason": "downsizing"
    }))
}

/// Form data that passes validation for the given form type
pub fn valid_form_data(form_type: FormType) -> DataPacket {
    let value = match form_type {
        FormType::InitialForm => json!({
            "lease_id": "L1",
            "exit_date": "2026-12-31",
            "reason": "downsizing",
            "property_name": "100 Main St"
        }),
        FormType::LeaseRequirements => json!({
            "lease_id": "L1",
            "requirements": ["return to white-box condition", "settle CAM charges"],
            "estimated_costs": {"restoration": 125000}
        }),
        FormType::ExitRequirementsIfm => json!({
            "lease_id": "L1",
            "condition_report": {"hvac": "serviceable", "roof": "needs repair"},
            "remediation_items": ["patch loading dock wall"]
        }),
        FormType::ExitRequirementsMac => json!({
            "lease_id": "L1",
            "asset_disposition": {"furniture": "auction", "it_equipment": "relocate"},
            "move_schedule": ["2026-11-01 pack", "2026-11-15 move"]
        }),
        FormType::ExitRequirementsPjm => json!({
            "lease_id": "L1",
            "project_plan": {"phases": 3},
            "milestones": ["vacate", "restore", "hand over keys"]
        }),
    };
    DataPacket::new(value)
}

/// Builder for workflows in a chosen lifecycle position
pub struct WorkflowBuilder {
    lease_data: DataPacket,
    state: WorkflowState,
    steps_taken: usize,
}

impl WorkflowBuilder {
    /// Start building a workflow with typical lease data
    pub fn new() -> Self {
        Self {
            lease_data: lease_data(),
            state: WorkflowState::InProgress,
            steps_taken: 0,
        }
    }

    /// Override the lease payload
    pub fn with_lease_data(mut self, lease_data: DataPacket) -> Self {
        self.lease_data = lease_data;
        self
    }

    /// Put the workflow in a specific lifecycle state
    pub fn in_state(mut self, state: WorkflowState) -> Self {
        self.state = state;
        self
    }

    /// Advance the workflow this many steps from the start of the sequence
    pub fn at_step(mut self, step: StepName) -> Self {
        self.steps_taken = step.position();
        self
    }

    /// Build the workflow
    pub fn build(self) -> Workflow {
        let mut workflow = Workflow::new(self.lease_data);

        if self.state != WorkflowState::Draft {
            workflow.begin().expect("fresh workflow must start");
        }
        if self.state != WorkflowState::Draft && self.state != WorkflowState::InProgress {
            workflow
                .transition_to(self.state)
                .expect("builder state must be forward-reachable");
        }

        for _ in 0..self.steps_taken {
            workflow.advance_step();
        }

        workflow.take_events();
        workflow
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
