/// Workflow mutation service
pub mod workflow_service;

/// Progress read-model service
pub mod progress_service;

/// Typed workflow operations
pub mod action;

/// Engine assembly
pub mod engine;
