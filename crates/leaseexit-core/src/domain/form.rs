//! Form records and per-type validation rules
//!
//! Each form type carries a static rule set: required fields and expected
//! field kinds. Validation is a pure pre-check gate; it never touches
//! storage. Fields not declared in a rule set are ignored, and a form type
//! with no rule set validates trivially.

use crate::{domain::ids::prefixed_id, domain::workflow::WorkflowId, DataPacket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value object: Form ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub String);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of structured submission a form carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    /// Initial lease exit request
    InitialForm,
    /// Lease requirements gathered by legal/finance
    LeaseRequirements,
    /// Exit requirements from integrated facilities management
    ExitRequirementsIfm,
    /// Exit requirements from moves/adds/changes
    ExitRequirementsMac,
    /// Exit requirements from project management
    ExitRequirementsPjm,
}

impl FormType {
    /// All form types required for a workflow to be form-complete
    pub const ALL: [FormType; 5] = [
        FormType::InitialForm,
        FormType::LeaseRequirements,
        FormType::ExitRequirementsIfm,
        FormType::ExitRequirementsMac,
        FormType::ExitRequirementsPjm,
    ];

    /// The snake_case wire name of this form type
    pub fn as_str(self) -> &'static str {
        match self {
            FormType::InitialForm => "initial_form",
            FormType::LeaseRequirements => "lease_requirements",
            FormType::ExitRequirementsIfm => "exit_requirements_ifm",
            FormType::ExitRequirementsMac => "exit_requirements_mac",
            FormType::ExitRequirementsPjm => "exit_requirements_pjm",
        }
    }

    /// Parse a wire name into a form type, `None` for unknown names
    pub fn parse(name: &str) -> Option<FormType> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a supporting document attached to a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Display label
    pub label: String,

    /// Location of the document in whatever document store is in use
    pub uri: String,
}

/// A structured data submission tied to a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique identifier
    pub id: FormId,

    /// Owning workflow
    pub workflow_id: WorkflowId,

    /// Schema the data adheres to
    pub form_type: FormType,

    /// Who submitted the form
    pub submitted_by: String,

    /// Submitted payload, shape depends on `form_type`
    pub data: DataPacket,

    /// Supporting document references
    pub documents: Vec<DocumentRef>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Form {
    /// Create a new form record
    pub fn new(
        workflow_id: WorkflowId,
        form_type: FormType,
        submitted_by: impl Into<String>,
        data: DataPacket,
        documents: Vec<DocumentRef>,
    ) -> Self {
        Self {
            id: FormId(prefixed_id("form_")),
            workflow_id,
            form_type,
            submitted_by: submitted_by.into(),
            data,
            documents,
            created_at: Utc::now(),
        }
    }
}

/// Expected primitive kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON object
    Object,
    /// JSON array
    List,
}

impl FieldKind {
    /// Whether a JSON value matches this kind
    pub fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Object => value.is_object(),
            FieldKind::List => value.is_array(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Object => "object",
            FieldKind::List => "list",
        };
        f.write_str(name)
    }
}

/// Static rule set for one form type
#[derive(Debug, Clone, Copy)]
pub struct FormRules {
    /// Fields that must be present
    pub required_fields: &'static [&'static str],

    /// Expected kinds for declared fields, required or optional
    pub field_types: &'static [(&'static str, FieldKind)],
}

impl FormRules {
    const EMPTY: FormRules = FormRules {
        required_fields: &[],
        field_types: &[],
    };
}

/// Look up the static rule set for a form type
pub fn rules_for(form_type: FormType) -> FormRules {
    match form_type {
        FormType::InitialForm => FormRules {
            required_fields: &["lease_id", "exit_date", "reason"],
            field_types: &[
                ("lease_id", FieldKind::String),
                ("exit_date", FieldKind::String),
                ("reason", FieldKind::String),
                ("property_name", FieldKind::String),
                ("property_type", FieldKind::String),
            ],
        },
        FormType::LeaseRequirements => FormRules {
            required_fields: &["lease_id", "requirements"],
            field_types: &[
                ("lease_id", FieldKind::String),
                ("requirements", FieldKind::List),
                ("estimated_costs", FieldKind::Object),
            ],
        },
        FormType::ExitRequirementsIfm => FormRules {
            required_fields: &["lease_id", "condition_report", "remediation_items"],
            field_types: &[
                ("lease_id", FieldKind::String),
                ("condition_report", FieldKind::Object),
                ("remediation_items", FieldKind::List),
            ],
        },
        FormType::ExitRequirementsMac => FormRules {
            required_fields: &["lease_id", "asset_disposition", "move_schedule"],
            field_types: &[
                ("lease_id", FieldKind::String),
                ("asset_disposition", FieldKind::Object),
                ("move_schedule", FieldKind::List),
            ],
        },
        FormType::ExitRequirementsPjm => FormRules {
            required_fields: &["lease_id", "project_plan", "milestones"],
            field_types: &[
                ("lease_id", FieldKind::String),
                ("project_plan", FieldKind::Object),
                ("milestones", FieldKind::List),
            ],
        },
    }
}

/// Outcome of validating a form against its rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when no rule was violated
    pub valid: bool,

    /// One message per violation
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// A passing result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing result carrying the violation messages
    pub fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

fn validate_against(rules: FormRules, form_data: &DataPacket) -> ValidationResult {
    let mut errors = Vec::new();

    for field in rules.required_fields {
        if !form_data.has_field(field) {
            errors.push(format!("Missing required field: {}", field));
        }
    }

    for (field, kind) in rules.field_types {
        if let Some(value) = form_data.field(field) {
            if !kind.matches(value) {
                errors.push(format!(
                    "Invalid type for field {}. Expected {}",
                    field, kind
                ));
            }
        }
    }

    if errors.is_empty() {
        ValidationResult::ok()
    } else {
        ValidationResult::invalid(errors)
    }
}

/// Validate form data against the rule set for its type
pub fn validate_form(form_type: FormType, form_data: &DataPacket) -> ValidationResult {
    validate_against(rules_for(form_type), form_data)
}

/// Validate form data against a rule set looked up by wire name
///
/// Unknown names get the empty rule set and validate trivially, mirroring
/// the fail-soft policy of the step sequencer.
pub fn validate_named_form(form_type: &str, form_data: &DataPacket) -> ValidationResult {
    match FormType::parse(form_type) {
        Some(form_type) => validate_form(form_type, form_data),
        None => validate_against(FormRules::EMPTY, form_data),
    }
}

/// Whether at least one form of each required type has been submitted
pub fn form_complete(forms: &[Form], required: &[FormType]) -> bool {
    required
        .iter()
        .all(|required_type| forms.iter().any(|form| form.form_type == *required_type))
}
