use async_trait::async_trait;
use launchpad_types::{CampaignDetails, CampaignId, ProjectId, SubmissionPayload, VoteReceipt};
use thiserror::Error;

/// Errors returned by the project backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("project not found: {0}")]
    NotFound(ProjectId),

    #[error("network error: {0}")]
    Network(String),

    #[error("backend unavailable")]
    Unavailable,
}

/// The project backend API.
///
/// Calls are opaque: retries, timeouts and idempotency of repeated
/// submissions belong to the implementation.
#[async_trait]
pub trait ProjectBackend: Send + Sync {
    /// Create the project; returns its identifier.
    async fn init_project(&self, payload: &SubmissionPayload) -> Result<ProjectId, BackendError>;

    /// Cast the connected wallet's vote for a project.
    async fn cast_vote(&self, project_id: &ProjectId) -> Result<VoteReceipt, BackendError>;

    /// Launch the funding campaign of an approved project.
    async fn launch_campaign(&self, project_id: &ProjectId) -> Result<CampaignId, BackendError>;

    async fn campaign_details(&self, project_id: &ProjectId)
        -> Result<CampaignDetails, BackendError>;
}
