use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use launchpad_types::{
    CampaignDetails, CampaignId, CampaignStatus, ProjectId, SubmissionPayload, VoteReceipt,
};

use crate::backend::{BackendError, ProjectBackend};

#[derive(Clone, Debug)]
struct MockProject {
    goal: u64,
    votes: u32,
    campaign_id: Option<CampaignId>,
}

/// In-memory project backend for testing and local simulation.
///
/// Each endpoint can be switched to fail with a given error; call counts
/// and the last submitted payload are recorded for assertions.
#[derive(Default)]
pub struct MockProjectBackend {
    projects: Mutex<HashMap<ProjectId, MockProject>>,
    last_payload: Mutex<Option<SubmissionPayload>>,
    init_failure: Mutex<Option<BackendError>>,
    vote_failure: Mutex<Option<BackendError>>,
    launch_failure: Mutex<Option<BackendError>>,
    init_calls: AtomicUsize,
    vote_calls: AtomicUsize,
    launch_calls: AtomicUsize,
}

impl MockProjectBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `init_project` fail with `error` (or succeed again with `None`).
    pub fn fail_init(&self, error: Option<BackendError>) {
        *lock(&self.init_failure) = error;
    }

    pub fn fail_vote(&self, error: Option<BackendError>) {
        *lock(&self.vote_failure) = error;
    }

    pub fn fail_launch(&self, error: Option<BackendError>) {
        *lock(&self.launch_failure) = error;
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn vote_calls(&self) -> usize {
        self.vote_calls.load(Ordering::SeqCst)
    }

    pub fn launch_calls(&self) -> usize {
        self.launch_calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<SubmissionPayload> {
        lock(&self.last_payload).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn configured_failure(slot: &Mutex<Option<BackendError>>) -> Result<(), BackendError> {
    match lock(slot).clone() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[async_trait]
impl ProjectBackend for MockProjectBackend {
    async fn init_project(&self, payload: &SubmissionPayload) -> Result<ProjectId, BackendError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        configured_failure(&self.init_failure)?;

        let project_id = ProjectId::generate();
        lock(&self.projects).insert(
            project_id.clone(),
            MockProject {
                goal: payload.fund_amount,
                votes: 0,
                campaign_id: None,
            },
        );
        *lock(&self.last_payload) = Some(payload.clone());
        Ok(project_id)
    }

    async fn cast_vote(&self, project_id: &ProjectId) -> Result<VoteReceipt, BackendError> {
        self.vote_calls.fetch_add(1, Ordering::SeqCst);
        configured_failure(&self.vote_failure)?;

        let mut projects = lock(&self.projects);
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| BackendError::NotFound(project_id.clone()))?;
        project.votes += 1;
        Ok(VoteReceipt::new(project_id.clone()))
    }

    async fn launch_campaign(&self, project_id: &ProjectId) -> Result<CampaignId, BackendError> {
        self.launch_calls.fetch_add(1, Ordering::SeqCst);
        configured_failure(&self.launch_failure)?;

        let mut projects = lock(&self.projects);
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| BackendError::NotFound(project_id.clone()))?;
        if let Some(existing) = &project.campaign_id {
            return Err(BackendError::Rejected(format!(
                "campaign {existing} already launched"
            )));
        }
        let campaign_id = CampaignId::generate();
        project.campaign_id = Some(campaign_id.clone());
        Ok(campaign_id)
    }

    async fn campaign_details(
        &self,
        project_id: &ProjectId,
    ) -> Result<CampaignDetails, BackendError> {
        let projects = lock(&self.projects);
        let project = projects
            .get(project_id)
            .ok_or_else(|| BackendError::NotFound(project_id.clone()))?;
        let status = if project.campaign_id.is_some() {
            CampaignStatus::Live
        } else if project.votes > 0 {
            CampaignStatus::Voting
        } else {
            CampaignStatus::PendingApproval
        };
        Ok(CampaignDetails {
            project_id: project_id.clone(),
            campaign_id: project.campaign_id.clone(),
            goal: project.goal,
            raised: 0,
            backers: 0,
            votes: project.votes,
            status,
        })
    }
}
