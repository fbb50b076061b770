use crate::domain::form::FormType;
use serde::{Deserialize, Serialize};

/// Engine configuration
///
/// Constructed once at process start and passed into the engine explicitly;
/// there is no global configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name used in log fields to tell engine instances apart
    pub service_name: String,

    /// Form types a workflow must have on file to count as form-complete
    pub required_form_types: Vec<FormType>,
}

impl EngineConfig {
    /// Configuration with the standard required form set
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            required_form_types: FormType::ALL.to_vec(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("lease-exit-engine")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_requires_all_form_types() {
        let config = EngineConfig::default();
        assert_eq!(config.service_name, "lease-exit-engine");
        assert_eq!(config.required_form_types, FormType::ALL.to_vec());
    }

    #[test]
    fn test_required_set_can_be_narrowed() {
        let mut config = EngineConfig::new("test-engine");
        config.required_form_types = vec![FormType::InitialForm];
        assert_eq!(config.required_form_types.len(), 1);
    }
}
