//! Test utilities for the lease exit engine
//!
//! Builders for realistic records and a recording notification dispatcher,
//! shared by the integration tests of the other crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builders;
pub mod mocks;

pub use builders::{lease_data, valid_form_data, WorkflowBuilder};
pub use mocks::RecordingDispatcher;
