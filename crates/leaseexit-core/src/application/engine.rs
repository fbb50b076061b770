use crate::{
    application::progress_service::ProgressService,
    application::workflow_service::WorkflowService,
    config::EngineConfig,
    domain::repository::{
        ApprovalRepository, FormRepository, NotificationRepository, WorkflowRepository,
    },
    NotificationDispatcher,
};
use std::sync::Arc;

/// The assembled lease exit engine
///
/// Constructed once at process start from explicit repository and dispatcher
/// handles, then passed by reference to every consumer. There is no implicit
/// global state anywhere in the engine.
pub struct LeaseExitEngine {
    workflow_service: WorkflowService,
    progress_service: ProgressService,
}

impl LeaseExitEngine {
    /// Assemble the engine over explicit collaborators
    pub fn new(
        config: EngineConfig,
        workflows: Arc<dyn WorkflowRepository>,
        forms: Arc<dyn FormRepository>,
        approvals: Arc<dyn ApprovalRepository>,
        notifications: Arc<dyn NotificationRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        tracing::debug!(service = %config.service_name, "Lease exit engine assembled");

        let workflow_service = WorkflowService::new(
            config,
            workflows.clone(),
            forms.clone(),
            approvals.clone(),
            notifications.clone(),
            dispatcher,
        );
        let progress_service =
            ProgressService::new(workflows, forms, approvals, notifications);

        Self {
            workflow_service,
            progress_service,
        }
    }

    /// The mutation-side service
    pub fn workflow_service(&self) -> &WorkflowService {
        &self.workflow_service
    }

    /// The read-side service
    pub fn progress_service(&self) -> &ProgressService {
        &self.progress_service
    }
}
