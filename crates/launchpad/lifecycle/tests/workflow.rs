//! End-to-end workflow tests against the in-memory backend and wallet.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use launchpad_allocation::AllocationError;
use launchpad_gate::{MockWallet, WalletConnection, WalletError};
use launchpad_lifecycle::{
    ActionOutcome, BackendError, BusyIndicator, LifecycleAction, LifecycleConfig, LifecycleError,
    MockProjectBackend, ProjectBackend, ProjectLifecycle, TransitionReason,
};
use launchpad_types::{
    CampaignDetails, CampaignId, MilestoneId, MilestonePatch, Phase, ProjectDraft, ProjectId,
    StepState, SubmissionPayload, VoteReceipt,
};

struct Harness {
    lifecycle: ProjectLifecycle,
    backend: Arc<MockProjectBackend>,
    wallet: Arc<MockWallet>,
}

fn harness(wallet: MockWallet) -> Harness {
    let backend = Arc::new(MockProjectBackend::new());
    let wallet = Arc::new(wallet);
    let lifecycle =
        ProjectLifecycle::new(backend.clone(), wallet.clone(), LifecycleConfig::default())
            .unwrap();
    Harness {
        lifecycle,
        backend,
        wallet,
    }
}

fn draft() -> ProjectDraft {
    ProjectDraft::new("Riverside Makerspace", 40_000)
        .with_description("Shared workshop with tools and training")
        .with_tagline("Build it together")
        .with_category("community")
        .with_tag("maker")
        .with_tag("education")
}

/// Fill in the draft and every milestone so the Initialize data is valid.
fn prepare(lc: &mut ProjectLifecycle) {
    lc.set_draft(draft()).unwrap();
    let ids: Vec<MilestoneId> = lc.milestones().iter().map(|m| m.id).collect();
    for (i, id) in ids.into_iter().enumerate() {
        let patch = MilestonePatch::new()
            .title(format!("Stage {}", i + 1))
            .description("Tools purchased and installed")
            .delivery_date(NaiveDate::from_ymd_opt(2027, 2 + i as u32, 15).unwrap());
        lc.update_milestone(id, &patch).unwrap();
    }
}

fn assert_single_active(lc: &ProjectLifecycle) {
    let active: Vec<Phase> = lc
        .steps()
        .iter()
        .filter(|s| s.state == StepState::Active)
        .map(|s| s.phase)
        .collect();
    assert_eq!(active, vec![lc.phase()]);
}

#[tokio::test]
async fn connected_wallet_runs_full_workflow() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::connected());
    prepare(&mut lifecycle);
    assert_single_active(&lifecycle);

    let project_id = match lifecycle.submit_initialization().await.unwrap() {
        ActionOutcome::Submitted(id) => id,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert_eq!(lifecycle.phase(), Phase::Validate);
    assert_eq!(lifecycle.project_id(), Some(&project_id));
    assert!(lifecycle.milestones().is_empty());
    assert_single_active(&lifecycle);

    let payload = backend.last_payload().unwrap();
    let shares: Vec<u8> = payload.milestones.iter().map(|m| m.fund_percentage).collect();
    let amounts: Vec<u64> = payload.milestones.iter().map(|m| m.fund_amount).collect();
    assert_eq!(shares, vec![24, 32, 44]);
    assert_eq!(amounts, vec![9_600, 12_800, 17_600]);

    // Votes do not move the phase on their own
    lifecycle.cast_vote().await.unwrap();
    lifecycle.cast_vote().await.unwrap();
    assert_eq!(lifecycle.votes().len(), 2);
    assert_eq!(lifecycle.phase(), Phase::Validate);
    assert_eq!(lifecycle.campaign_details().await.unwrap().votes, 2);

    lifecycle.advance_to_launch().unwrap();
    assert_eq!(lifecycle.phase(), Phase::Launch);
    assert_single_active(&lifecycle);

    let receipt = match lifecycle.launch_campaign().await.unwrap() {
        ActionOutcome::Launched(receipt) => receipt,
        other => panic!("unexpected outcome {:?}", other),
    };
    assert_eq!(receipt.project_id, project_id);
    assert_eq!(backend.launch_calls(), 1);

    // Completing the workflow resets it
    assert_eq!(lifecycle.phase(), Phase::Initialize);
    assert!(lifecycle.project_id().is_none());
    assert!(lifecycle.state().history().is_empty());
    assert_eq!(lifecycle.milestones().len(), 3);
}

#[tokio::test]
async fn deferred_submission_runs_once_after_connection() {
    let Harness {
        mut lifecycle,
        backend,
        wallet,
    } = harness(MockWallet::disconnected());
    prepare(&mut lifecycle);

    let outcome = lifecycle.submit_initialization().await.unwrap();
    assert_eq!(outcome, ActionOutcome::AwaitingWallet { replaced: false });
    assert_eq!(backend.init_calls(), 0);
    assert!(lifecycle.is_wallet_prompt_visible());
    assert_eq!(
        lifecycle.pending_action(),
        Some(LifecycleAction::SubmitInitialization)
    );
    assert_eq!(lifecycle.phase(), Phase::Initialize);

    let outcome = lifecycle.connect_wallet().await.unwrap();
    assert!(matches!(outcome, Some(ActionOutcome::Submitted(_))));
    assert!(wallet.address().is_some());
    assert_eq!(backend.init_calls(), 1);
    assert_eq!(lifecycle.phase(), Phase::Validate);
    assert!(!lifecycle.is_wallet_prompt_visible());
    assert!(lifecycle.pending_action().is_none());

    // A repeated notification has nothing left to run
    assert_eq!(lifecycle.on_wallet_connected().await.unwrap(), None);
    assert_eq!(backend.init_calls(), 1);
}

#[tokio::test]
async fn repeated_request_while_pending_replaces_it() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::disconnected());
    prepare(&mut lifecycle);

    lifecycle.submit_initialization().await.unwrap();
    let outcome = lifecycle.submit_initialization().await.unwrap();
    assert_eq!(outcome, ActionOutcome::AwaitingWallet { replaced: true });

    lifecycle.connect_wallet().await.unwrap();
    assert_eq!(backend.init_calls(), 1);
}

#[tokio::test]
async fn connected_request_discards_stale_pending_vote() {
    let Harness {
        mut lifecycle,
        backend,
        wallet,
    } = harness(MockWallet::connected());
    prepare(&mut lifecycle);
    lifecycle.submit_initialization().await.unwrap();

    wallet.disconnect();
    assert_eq!(
        lifecycle.cast_vote().await.unwrap(),
        ActionOutcome::AwaitingWallet { replaced: false }
    );
    assert!(lifecycle.is_wallet_prompt_visible());

    // The wallet reconnects outside the prompt and the user votes again
    wallet.connect().await.unwrap();
    assert!(matches!(
        lifecycle.cast_vote().await.unwrap(),
        ActionOutcome::Voted(_)
    ));
    assert!(lifecycle.pending_action().is_none());
    assert!(!lifecycle.is_wallet_prompt_visible());

    assert_eq!(lifecycle.on_wallet_connected().await.unwrap(), None);
    assert_eq!(backend.vote_calls(), 1);
    assert_eq!(lifecycle.votes().len(), 1);
}

#[tokio::test]
async fn percentage_mismatch_blocks_submission() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::connected());
    prepare(&mut lifecycle);

    let mut corrupted = lifecycle.milestones().to_vec();
    corrupted[0].fund_percentage -= 1;
    lifecycle.restore_milestones(corrupted).unwrap();

    let err = lifecycle.submit_initialization().await.unwrap_err();
    assert_eq!(
        err,
        LifecycleError::Allocation(AllocationError::PercentageMismatch { total: 99 })
    );
    assert_eq!(lifecycle.phase(), Phase::Initialize);
    assert!(lifecycle.project_id().is_none());
    assert_eq!(backend.init_calls(), 0);
}

#[tokio::test]
async fn data_is_rechecked_when_deferred_action_runs() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::disconnected());
    prepare(&mut lifecycle);
    lifecycle.submit_initialization().await.unwrap();

    // The user blanks a title while the wallet prompt is open
    let first = lifecycle.milestones()[0].id;
    lifecycle
        .update_milestone(first, &MilestonePatch::new().title(" "))
        .unwrap();

    let err = lifecycle.connect_wallet().await.unwrap_err();
    assert_eq!(
        err,
        LifecycleError::Allocation(AllocationError::IncompleteMilestone(first, "title"))
    );
    assert_eq!(lifecycle.phase(), Phase::Initialize);
    assert_eq!(backend.init_calls(), 0);
}

#[tokio::test]
async fn backend_failure_keeps_phase_and_allows_retry() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::connected());
    prepare(&mut lifecycle);
    backend.fail_init(Some(BackendError::Network("connection reset".into())));

    let err = lifecycle.submit_initialization().await.unwrap_err();
    assert!(matches!(err, LifecycleError::Backend(BackendError::Network(_))));
    assert_eq!(lifecycle.phase(), Phase::Initialize);
    assert!(!lifecycle.is_busy());
    assert_eq!(lifecycle.milestones().len(), 3);

    backend.fail_init(None);
    assert!(matches!(
        lifecycle.submit_initialization().await.unwrap(),
        ActionOutcome::Submitted(_)
    ));
    assert_eq!(backend.init_calls(), 2);
}

#[tokio::test]
async fn failed_vote_is_not_recorded() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::connected());
    prepare(&mut lifecycle);
    lifecycle.submit_initialization().await.unwrap();

    backend.fail_vote(Some(BackendError::Rejected("already voted".into())));
    assert!(lifecycle.cast_vote().await.is_err());
    assert!(lifecycle.votes().is_empty());
    assert_eq!(lifecycle.phase(), Phase::Validate);
}

#[tokio::test]
async fn wallet_failure_keeps_pending_action() {
    let Harness {
        mut lifecycle,
        backend,
        wallet,
    } = harness(MockWallet::failing(WalletError::Rejected));
    prepare(&mut lifecycle);
    lifecycle.submit_initialization().await.unwrap();

    let err = lifecycle.connect_wallet().await.unwrap_err();
    assert_eq!(err, LifecycleError::Wallet(WalletError::Rejected));
    assert_eq!(
        lifecycle.pending_action(),
        Some(LifecycleAction::SubmitInitialization)
    );
    assert_eq!(backend.init_calls(), 0);

    wallet.fail_with(None);
    lifecycle.connect_wallet().await.unwrap();
    assert_eq!(lifecycle.phase(), Phase::Validate);
    assert_eq!(wallet.connect_calls(), 2);
}

#[tokio::test]
async fn dismissed_prompt_drops_the_action() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::disconnected());
    prepare(&mut lifecycle);
    lifecycle.submit_initialization().await.unwrap();

    assert!(lifecycle.dismiss_wallet_prompt());
    assert!(!lifecycle.is_wallet_prompt_visible());

    assert_eq!(lifecycle.connect_wallet().await.unwrap(), None);
    assert_eq!(backend.init_calls(), 0);
    assert_eq!(lifecycle.phase(), Phase::Initialize);
}

#[tokio::test]
async fn back_returns_to_validate_with_data_intact() {
    let Harness { mut lifecycle, .. } = harness(MockWallet::connected());
    prepare(&mut lifecycle);
    lifecycle.submit_initialization().await.unwrap();
    lifecycle.cast_vote().await.unwrap();
    lifecycle.advance_to_launch().unwrap();
    let project_id = lifecycle.project_id().cloned();

    lifecycle.back().unwrap();
    assert_eq!(lifecycle.phase(), Phase::Validate);
    assert_eq!(lifecycle.steps()[2].state, StepState::Pending);
    assert_eq!(lifecycle.steps()[1].state, StepState::Active);
    assert_eq!(lifecycle.project_id().cloned(), project_id);
    assert_eq!(lifecycle.votes().len(), 1);
    assert_eq!(lifecycle.state().draft().title, "Riverside Makerspace");

    let reasons: Vec<TransitionReason> = lifecycle
        .state()
        .history()
        .iter()
        .map(|r| r.reason)
        .collect();
    assert_eq!(
        reasons,
        vec![
            TransitionReason::Submitted,
            TransitionReason::Approved,
            TransitionReason::Back
        ]
    );

    // Launch is not reachable from Validate without advancing again
    assert!(matches!(
        lifecycle.launch_campaign().await,
        Err(LifecycleError::InvalidPhase { .. })
    ));
}

#[tokio::test]
async fn close_discards_everything() {
    let Harness {
        mut lifecycle,
        backend,
        ..
    } = harness(MockWallet::disconnected());
    prepare(&mut lifecycle);
    lifecycle.add_milestone().unwrap();
    lifecycle.submit_initialization().await.unwrap_err();
    assert_eq!(lifecycle.milestones().len(), 4);

    lifecycle.close();
    assert_eq!(lifecycle.phase(), Phase::Initialize);
    assert_eq!(lifecycle.milestones().len(), 3);
    assert!(lifecycle.state().draft().title.is_empty());
    assert!(lifecycle.pending_action().is_none());
    assert_eq!(backend.init_calls(), 0);
}

#[tokio::test]
async fn milestone_bounds_surface_as_errors() {
    let Harness { mut lifecycle, .. } = harness(MockWallet::connected());
    let first = lifecycle.milestones()[0].id;
    assert_eq!(
        lifecycle.remove_milestone(first),
        Err(LifecycleError::Allocation(
            AllocationError::TooFewMilestones { min: 3 }
        ))
    );
    for _ in 0..3 {
        lifecycle.add_milestone().unwrap();
    }
    assert_eq!(
        lifecycle.add_milestone(),
        Err(LifecycleError::Allocation(
            AllocationError::TooManyMilestones { max: 6 }
        ))
    );
    let total: u32 = lifecycle
        .milestones()
        .iter()
        .map(|m| u32::from(m.fund_percentage))
        .sum();
    assert_eq!(total, 100);
}

/// Records what a host holding a busy handle sees during each backend call.
#[derive(Default)]
struct BusyRecordingBackend {
    inner: MockProjectBackend,
    indicator: Mutex<Option<BusyIndicator>>,
    seen: Mutex<Vec<(&'static str, usize)>>,
}

impl BusyRecordingBackend {
    fn record(&self, call: &'static str) {
        let in_flight = self
            .indicator
            .lock()
            .unwrap()
            .as_ref()
            .map(BusyIndicator::in_flight)
            .unwrap_or_default();
        self.seen.lock().unwrap().push((call, in_flight));
    }
}

#[async_trait]
impl ProjectBackend for BusyRecordingBackend {
    async fn init_project(&self, payload: &SubmissionPayload) -> Result<ProjectId, BackendError> {
        self.record("init");
        self.inner.init_project(payload).await
    }

    async fn cast_vote(&self, project_id: &ProjectId) -> Result<VoteReceipt, BackendError> {
        self.record("vote");
        self.inner.cast_vote(project_id).await
    }

    async fn launch_campaign(&self, project_id: &ProjectId) -> Result<CampaignId, BackendError> {
        self.record("launch");
        self.inner.launch_campaign(project_id).await
    }

    async fn campaign_details(
        &self,
        project_id: &ProjectId,
    ) -> Result<CampaignDetails, BackendError> {
        self.record("details");
        self.inner.campaign_details(project_id).await
    }
}

#[tokio::test]
async fn busy_handle_reports_requests_in_flight() {
    let backend = Arc::new(BusyRecordingBackend::default());
    let mut lifecycle = ProjectLifecycle::new(
        backend.clone(),
        Arc::new(MockWallet::connected()),
        LifecycleConfig::default(),
    )
    .unwrap();
    let handle = lifecycle.busy_indicator();
    *backend.indicator.lock().unwrap() = Some(handle.clone());
    prepare(&mut lifecycle);

    lifecycle.submit_initialization().await.unwrap();
    lifecycle.cast_vote().await.unwrap();
    lifecycle.campaign_details().await.unwrap();
    lifecycle.advance_to_launch().unwrap();
    lifecycle.launch_campaign().await.unwrap();

    assert_eq!(
        *backend.seen.lock().unwrap(),
        vec![("init", 1), ("vote", 1), ("details", 1), ("launch", 1)]
    );
    assert!(!handle.is_busy());
    assert!(!lifecycle.is_busy());
}

#[tokio::test]
async fn busy_handle_clears_after_failed_request() {
    let backend = Arc::new(BusyRecordingBackend::default());
    backend.inner.fail_init(Some(BackendError::Unavailable));
    let mut lifecycle = ProjectLifecycle::new(
        backend.clone(),
        Arc::new(MockWallet::connected()),
        LifecycleConfig::default(),
    )
    .unwrap();
    let handle = lifecycle.busy_indicator();
    *backend.indicator.lock().unwrap() = Some(handle.clone());
    prepare(&mut lifecycle);

    assert!(lifecycle.submit_initialization().await.is_err());
    assert_eq!(*backend.seen.lock().unwrap(), vec![("init", 1)]);
    assert_eq!(handle.in_flight(), 0);
}
