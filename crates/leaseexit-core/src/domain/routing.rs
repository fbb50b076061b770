//! Static notification routing tables
//!
//! Routing is a lookup, not a decision: each form type maps to a fixed
//! recipient list and each workflow state maps to a status message. Unknown
//! keys degrade rather than error. No recipients means no notification is
//! sent, and an unknown state gets the generic message.

use crate::domain::form::FormType;
use crate::domain::notification::Recipient;
use crate::domain::workflow::WorkflowState;

/// Fallback status message for states the table does not know
pub const GENERIC_STATUS_MESSAGE: &str = "Status updated";

/// Roles to notify when a form of the given type is submitted
///
/// Unknown form type names resolve to an empty list: nothing is sent and
/// nothing fails.
pub fn recipients_for(form_type: &str) -> Vec<Recipient> {
    let roles: &[&str] = match FormType::parse(form_type) {
        Some(FormType::InitialForm) => &["advisory", "ifm", "legal"],
        Some(FormType::LeaseRequirements) => &["legal", "ifm", "accounting"],
        Some(FormType::ExitRequirementsIfm) => &["mac"],
        Some(FormType::ExitRequirementsMac) => &["pjm"],
        Some(FormType::ExitRequirementsPjm) => &["lease_exit_team"],
        None => &[],
    };

    roles.iter().map(|role| Recipient::new(*role)).collect()
}

/// Typed variant of [`recipients_for`]
pub fn recipients_for_form(form_type: FormType) -> Vec<Recipient> {
    recipients_for(form_type.as_str())
}

/// Human-readable status message for a workflow state wire name
pub fn status_message(state: &str) -> &'static str {
    match WorkflowState::parse(state) {
        Some(state) => status_message_for(state),
        None => GENERIC_STATUS_MESSAGE,
    }
}

/// Typed variant of [`status_message`]
pub fn status_message_for(state: WorkflowState) -> &'static str {
    match state {
        WorkflowState::Draft => "Workflow created and awaiting submission",
        WorkflowState::InProgress => "Workflow in progress",
        WorkflowState::ReadyForApproval => "Awaiting approval chain decisions",
        WorkflowState::Approved => "All required approvals received",
        WorkflowState::Rejected => "Workflow rejected and awaiting revision",
        WorkflowState::ReadyForExit => "Approved and ready for lease exit",
        WorkflowState::Completed => "Lease exit completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(recipients: Vec<Recipient>) -> Vec<String> {
        recipients.into_iter().map(|r| r.0).collect()
    }

    #[test]
    fn test_form_routing_table() {
        assert_eq!(
            names(recipients_for("initial_form")),
            vec!["advisory", "ifm", "legal"]
        );
        assert_eq!(
            names(recipients_for("lease_requirements")),
            vec!["legal", "ifm", "accounting"]
        );
        assert_eq!(names(recipients_for("exit_requirements_ifm")), vec!["mac"]);
        assert_eq!(names(recipients_for("exit_requirements_mac")), vec!["pjm"]);
        assert_eq!(
            names(recipients_for("exit_requirements_pjm")),
            vec!["lease_exit_team"]
        );
    }

    #[test]
    fn test_unknown_form_type_routes_nowhere() {
        assert!(recipients_for("mystery_form").is_empty());
        assert!(recipients_for("").is_empty());
    }

    #[test]
    fn test_typed_and_named_lookups_agree() {
        for form_type in FormType::ALL {
            assert_eq!(
                recipients_for_form(form_type),
                recipients_for(form_type.as_str())
            );
        }
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message("rejected"), "Workflow rejected and awaiting revision");
        assert_eq!(status_message("ready_for_exit"), "Approved and ready for lease exit");
        assert_eq!(status_message("completed"), "Lease exit completed");
    }

    #[test]
    fn test_unknown_state_gets_generic_message() {
        assert_eq!(status_message("paused"), GENERIC_STATUS_MESSAGE);
        assert_eq!(status_message(""), GENERIC_STATUS_MESSAGE);
    }
}
