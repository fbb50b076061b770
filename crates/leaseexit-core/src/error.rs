use thiserror::Error;

/// Core error type for the lease exit workflow engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Workflow not found
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// Form not found
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// Approval not found
    #[error("Approval not found: {0}")]
    ApprovalNotFound(String),

    /// Notification not found
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Illegal workflow state transition
    #[error("State transition error: {0}")]
    StateTransitionError(String),

    /// State store error
    #[error("State store error: {0}")]
    StateStoreError(String),

    /// Notification dispatch error
    #[error("Notification error: {0}")]
    NotificationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                CoreError::WorkflowNotFound("wf_1".to_string()),
                "Workflow not found: wf_1",
            ),
            (
                CoreError::FormNotFound("form_1".to_string()),
                "Form not found: form_1",
            ),
            (
                CoreError::ApprovalNotFound("appr_1".to_string()),
                "Approval not found: appr_1",
            ),
            (
                CoreError::NotificationNotFound("notif_1".to_string()),
                "Notification not found: notif_1",
            ),
            (
                CoreError::ValidationError("bad form".to_string()),
                "Validation error: bad form",
            ),
            (
                CoreError::StateTransitionError("completed is terminal".to_string()),
                "State transition error: completed is terminal",
            ),
            (
                CoreError::StateStoreError("store down".to_string()),
                "State store error: store down",
            ),
            (
                CoreError::NotificationError("no route".to_string()),
                "Notification error: no route",
            ),
            (
                CoreError::SerializationError("bad json".to_string()),
                "Serialization error: bad json",
            ),
            (CoreError::Other("other".to_string()), "other"),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: CoreError = json_error.into();

        match error {
            CoreError::SerializationError(msg) => assert!(msg.contains("expected")),
            _ => panic!("Expected SerializationError variant"),
        }
    }

    #[test]
    fn test_from_string_and_str() {
        let error: CoreError = "plain message".into();
        assert_eq!(error, CoreError::Other("plain message".to_string()));

        let error: CoreError = String::from("owned message").into();
        assert_eq!(error, CoreError::Other("owned message".to_string()));
    }
}
