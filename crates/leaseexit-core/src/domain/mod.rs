/// Workflow aggregate and lifecycle states
pub mod workflow;

/// Domain events
pub mod events;

/// Step sequencing
pub mod step;

/// Form records and validation rules
pub mod form;

/// Approval records and chain validation
pub mod approval;

/// Notification audit records
pub mod notification;

/// Static notification routing tables
pub mod routing;

/// Repository interfaces
pub mod repository;

/// Record ID generation
pub mod ids;
