//! Step sequencing for the lease exit process
//!
//! The process moves through a fixed linear sequence of named steps. The
//! sequencer is pure and deterministic: every step has exactly one successor,
//! the terminal step maps to itself, and unrecognized step names pass through
//! unchanged so custom steps never break the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named stage in the fixed lease exit sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Initial lease exit form submission
    InitialForm,
    /// Advisory team review
    AdvisoryReview,
    /// Integrated facilities management review
    IfmReview,
    /// Moves/adds/changes review
    MacReview,
    /// Project management review
    PjmReview,
    /// Management sign-off review
    ManagementReview,
    /// Approval chain collection
    ApprovalChain,
    /// Terminal step: cleared for lease exit
    ReadyForExit,
}

impl StepName {
    /// All steps in sequence order
    pub const SEQUENCE: [StepName; 8] = [
        StepName::InitialForm,
        StepName::AdvisoryReview,
        StepName::IfmReview,
        StepName::MacReview,
        StepName::PjmReview,
        StepName::ManagementReview,
        StepName::ApprovalChain,
        StepName::ReadyForExit,
    ];

    /// The unique successor of this step
    ///
    /// Total and idempotent at the terminal step: `ReadyForExit` maps to
    /// itself.
    pub fn successor(self) -> StepName {
        match self {
            StepName::InitialForm => StepName::AdvisoryReview,
            StepName::AdvisoryReview => StepName::IfmReview,
            StepName::IfmReview => StepName::MacReview,
            StepName::MacReview => StepName::PjmReview,
            StepName::PjmReview => StepName::ManagementReview,
            StepName::ManagementReview => StepName::ApprovalChain,
            StepName::ApprovalChain => StepName::ReadyForExit,
            StepName::ReadyForExit => StepName::ReadyForExit,
        }
    }

    /// Zero-based position in the sequence
    pub fn position(self) -> usize {
        Self::SEQUENCE.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Whether this is the terminal step
    pub fn is_terminal(self) -> bool {
        self == StepName::ReadyForExit
    }

    /// The snake_case wire name of this step
    pub fn as_str(self) -> &'static str {
        match self {
            StepName::InitialForm => "initial_form",
            StepName::AdvisoryReview => "advisory_review",
            StepName::IfmReview => "ifm_review",
            StepName::MacReview => "mac_review",
            StepName::PjmReview => "pjm_review",
            StepName::ManagementReview => "management_review",
            StepName::ApprovalChain => "approval_chain",
            StepName::ReadyForExit => "ready_for_exit",
        }
    }

    /// Parse a wire name into a step, `None` for unknown names
    pub fn parse(name: &str) -> Option<StepName> {
        Self::SEQUENCE.iter().copied().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a step name to its successor's name
///
/// Fail-soft on unrecognized input: the name is returned unchanged rather
/// than treated as an error, so callers holding custom step names keep
/// working.
pub fn next_step(current: &str) -> &str {
    match StepName::parse(current) {
        Some(step) => step.successor().as_str(),
        None => current,
    }
}
