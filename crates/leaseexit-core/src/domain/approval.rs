//! Approval records and the approval chain validator
//!
//! Five approver roles gate the exit. The `order` metadata on each role is
//! informational (display and notification sequencing); approvals are
//! collected in parallel and any role may decide at any time. The chain
//! validator is a pure read over the approval set: it classifies every role
//! as pending, approved, rejected, or missing, and the chain is valid only
//! when all five roles hold an approved decision.

use crate::{domain::ids::prefixed_id, domain::workflow::WorkflowId, CoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value object: Approval ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalId(pub String);

impl fmt::Display for ApprovalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role whose sign-off is required before exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    /// Advisory team
    Advisory,
    /// Integrated facilities management
    Ifm,
    /// Legal
    Legal,
    /// Moves/adds/changes
    Mac,
    /// Project management
    Pjm,
}

impl ApproverRole {
    /// All required roles, in order
    pub const ALL: [ApproverRole; 5] = [
        ApproverRole::Advisory,
        ApproverRole::Ifm,
        ApproverRole::Legal,
        ApproverRole::Mac,
        ApproverRole::Pjm,
    ];

    /// 1-based position used for display and notification sequencing
    pub fn order(self) -> u8 {
        match self {
            ApproverRole::Advisory => 1,
            ApproverRole::Ifm => 2,
            ApproverRole::Legal => 3,
            ApproverRole::Mac => 4,
            ApproverRole::Pjm => 5,
        }
    }

    /// The snake_case wire name of this role
    pub fn as_str(self) -> &'static str {
        match self {
            ApproverRole::Advisory => "advisory",
            ApproverRole::Ifm => "ifm",
            ApproverRole::Legal => "legal",
            ApproverRole::Mac => "mac",
            ApproverRole::Pjm => "pjm",
        }
    }

    /// Parse a wire name into a role, `None` for unknown names
    pub fn parse(name: &str) -> Option<ApproverRole> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a single approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting a decision
    Pending,
    /// Approved
    Approved,
    /// Rejected
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A decision an approver can record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Sign off
    Approved,
    /// Send back for revision
    Rejected,
}

impl ApprovalDecision {
    /// The status this decision resolves to
    pub fn status(self) -> ApprovalStatus {
        match self {
            ApprovalDecision::Approved => ApprovalStatus::Approved,
            ApprovalDecision::Rejected => ApprovalStatus::Rejected,
        }
    }

    /// The snake_case wire name of this decision
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalDecision::Approved => "approved",
            ApprovalDecision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role's sign-off record for a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    /// Unique identifier
    pub id: ApprovalId,

    /// Owning workflow
    pub workflow_id: WorkflowId,

    /// The role this approval belongs to
    pub approver_role: ApproverRole,

    /// Display/sequencing order, mirrors `approver_role.order()`
    pub order: u8,

    /// Current status
    pub status: ApprovalStatus,

    /// Raw decision string, set once a decision lands
    pub decision: Option<String>,

    /// Approver comments
    pub comments: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Approval {
    /// Create a new pending approval for a role
    pub fn new(workflow_id: WorkflowId, approver_role: ApproverRole) -> Self {
        let now = Utc::now();
        Self {
            id: ApprovalId(prefixed_id("appr_")),
            workflow_id,
            approver_role,
            order: approver_role.order(),
            status: ApprovalStatus::Pending,
            decision: None,
            comments: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a decision on this approval
    ///
    /// A decision can be recorded over a previous one; the latest write wins
    /// when the chain is validated.
    pub fn apply(
        &mut self,
        decision: ApprovalDecision,
        comments: Option<String>,
    ) -> Result<(), CoreError> {
        self.status = decision.status();
        self.decision = Some(decision.as_str().to_string());
        self.comments = comments;

        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }

        Ok(())
    }
}

/// Classification of the full approval chain for one workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResult {
    /// True only when every required role holds an approved decision
    pub valid: bool,

    /// One message per missing role
    pub errors: Vec<String>,

    /// Roles still awaiting a decision
    pub pending: Vec<ApproverRole>,

    /// Roles that approved
    pub approved: Vec<ApproverRole>,

    /// Roles that rejected
    pub rejected: Vec<ApproverRole>,
}

impl ChainResult {
    /// Whether any required role has no approval record at all
    pub fn has_missing_roles(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validate the approval chain over a workflow's approval records
///
/// Iterates the required roles in order. When duplicate records exist for a
/// role, the most recently updated one is authoritative. A role with no
/// record is reported as `"Missing approval from {role}"`. Read-only and
/// idempotent over unchanged input.
pub fn validate_chain(approvals: &[Approval]) -> ChainResult {
    let mut errors = Vec::new();
    let mut pending = Vec::new();
    let mut approved = Vec::new();
    let mut rejected = Vec::new();

    for role in ApproverRole::ALL {
        let authoritative = approvals
            .iter()
            .enumerate()
            .filter(|(_, approval)| approval.approver_role == role)
            .max_by_key(|(index, approval)| (approval.updated_at, *index))
            .map(|(_, approval)| approval);

        match authoritative {
            None => errors.push(format!("Missing approval from {}", role)),
            Some(approval) => match approval.status {
                ApprovalStatus::Pending => pending.push(role),
                ApprovalStatus::Approved => approved.push(role),
                ApprovalStatus::Rejected => rejected.push(role),
            },
        }
    }

    let valid = errors.is_empty()
        && rejected.is_empty()
        && pending.is_empty()
        && approved.len() == ApproverRole::ALL.len();

    ChainResult {
        valid,
        errors,
        pending,
        approved,
        rejected,
    }
}
