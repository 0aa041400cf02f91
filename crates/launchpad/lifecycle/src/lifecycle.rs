use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use launchpad_allocation::MilestoneSet;
use launchpad_gate::{GateDecision, WalletConnection, WalletGate};
use launchpad_types::{
    CampaignDetails, LaunchReceipt, Milestone, MilestoneId, MilestonePatch, Phase, ProjectDraft,
    ProjectId, Step, SubmissionPayload, VoteReceipt,
};
use tracing::{debug, info, warn};

use crate::backend::ProjectBackend;
use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, LifecycleResult};
use crate::state::LifecycleState;

/// A state-changing action that must run with a connected wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    SubmitInitialization,
    CastVote,
    LaunchCampaign,
}

impl LifecycleAction {
    pub fn name(self) -> &'static str {
        match self {
            LifecycleAction::SubmitInitialization => "submit the project",
            LifecycleAction::CastVote => "vote",
            LifecycleAction::LaunchCampaign => "launch the campaign",
        }
    }

    /// The phase the action belongs to.
    pub fn phase(self) -> Phase {
        match self {
            LifecycleAction::SubmitInitialization => Phase::Initialize,
            LifecycleAction::CastVote => Phase::Validate,
            LifecycleAction::LaunchCampaign => Phase::Launch,
        }
    }
}

/// Result of requesting a gated action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Held by the wallet gate until a wallet connects
    AwaitingWallet { replaced: bool },
    Submitted(ProjectId),
    Voted(VoteReceipt),
    /// The campaign is live and the workflow has been reset
    Launched(LaunchReceipt),
}

/// Number of backend requests in flight.
///
/// Clones share one counter, so a host can keep a handle from
/// [`ProjectLifecycle::busy_indicator`] and read it while a request holds
/// the lifecycle mutably, e.g. to disable its submit control.
#[derive(Clone, Debug, Default)]
pub struct BusyIndicator(Arc<AtomicUsize>);

impl BusyIndicator {
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn enter(&self) -> BusyGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        BusyGuard(&self.0)
    }
}

/// Releases one in-flight slot when dropped, including when the owning
/// future is cancelled mid-request.
struct BusyGuard<'a>(&'a AtomicUsize);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The project workflow for one UI session.
///
/// Gated operations take `&mut self`, so a second submission cannot start
/// while one is outstanding. A host that renders while a request runs reads
/// a [`BusyIndicator`] handle taken beforehand.
pub struct ProjectLifecycle {
    state: LifecycleState,
    gate: WalletGate<LifecycleAction>,
    backend: Arc<dyn ProjectBackend>,
    wallet: Arc<dyn WalletConnection>,
    busy: BusyIndicator,
}

impl ProjectLifecycle {
    /// Open a workflow at the Initialize phase.
    pub fn new(
        backend: Arc<dyn ProjectBackend>,
        wallet: Arc<dyn WalletConnection>,
        config: LifecycleConfig,
    ) -> LifecycleResult<Self> {
        config.validate()?;
        Ok(Self {
            state: LifecycleState::new(config),
            gate: WalletGate::new(),
            backend,
            wallet,
            busy: BusyIndicator::default(),
        })
    }

    // ── Read model ───────────────────────────────────────────────────

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn steps(&self) -> &[Step] {
        self.state.steps()
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        self.state.project_id()
    }

    pub fn milestones(&self) -> &[Milestone] {
        self.state.milestones().milestones()
    }

    pub fn votes(&self) -> &[VoteReceipt] {
        self.state.votes()
    }

    /// Whether a backend request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// A shared handle on the in-flight counter.
    pub fn busy_indicator(&self) -> BusyIndicator {
        self.busy.clone()
    }

    /// Whether the host should show the wallet connection prompt.
    pub fn is_wallet_prompt_visible(&self) -> bool {
        self.gate.is_prompt_visible()
    }

    pub fn pending_action(&self) -> Option<LifecycleAction> {
        self.gate.pending().copied()
    }

    // ── Initialize editing ───────────────────────────────────────────

    pub fn draft_mut(&mut self) -> LifecycleResult<&mut ProjectDraft> {
        self.state.draft_mut()
    }

    pub fn set_draft(&mut self, draft: ProjectDraft) -> LifecycleResult<()> {
        *self.state.draft_mut()? = draft;
        Ok(())
    }

    pub fn add_milestone(&mut self) -> LifecycleResult<MilestoneId> {
        Ok(self.state.milestones_mut()?.add()?)
    }

    pub fn update_milestone(
        &mut self,
        id: MilestoneId,
        patch: &MilestonePatch,
    ) -> LifecycleResult<()> {
        Ok(self.state.milestones_mut()?.update(id, patch)?)
    }

    pub fn remove_milestone(&mut self, id: MilestoneId) -> LifecycleResult<()> {
        Ok(self.state.milestones_mut()?.remove(id)?)
    }

    /// Replace the milestone set with previously saved milestones, shares
    /// included as saved.
    pub fn restore_milestones(&mut self, milestones: Vec<Milestone>) -> LifecycleResult<()> {
        let config = self.state.config().allocation.clone();
        *self.state.milestones_mut()? = MilestoneSet::from_milestones(milestones, config);
        Ok(())
    }

    // ── Gated actions ────────────────────────────────────────────────

    /// Submit the Initialize phase (wallet-gated).
    pub async fn submit_initialization(&mut self) -> LifecycleResult<ActionOutcome> {
        self.request(LifecycleAction::SubmitInitialization).await
    }

    /// Cast a vote for the submitted project (wallet-gated).
    pub async fn cast_vote(&mut self) -> LifecycleResult<ActionOutcome> {
        self.request(LifecycleAction::CastVote).await
    }

    /// Launch the campaign (wallet-gated). Success ends the workflow.
    pub async fn launch_campaign(&mut self) -> LifecycleResult<ActionOutcome> {
        self.request(LifecycleAction::LaunchCampaign).await
    }

    /// Connection-success notification from the wallet collaborator.
    ///
    /// Runs the pending action, if any, exactly once.
    pub async fn on_wallet_connected(&mut self) -> LifecycleResult<Option<ActionOutcome>> {
        match self.gate.on_connected() {
            Some(action) => self.execute(action).await.map(Some),
            None => Ok(None),
        }
    }

    /// Ask the wallet to connect, then release the pending action.
    ///
    /// On failure the pending action is kept so the user can retry or
    /// dismiss the prompt.
    pub async fn connect_wallet(&mut self) -> LifecycleResult<Option<ActionOutcome>> {
        let address = match self.wallet.connect().await {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, pending = ?self.gate.pending(), "wallet connection failed");
                return Err(e.into());
            }
        };
        info!(wallet = %address, "wallet connected");
        self.on_wallet_connected().await
    }

    /// The user closed the connection prompt.
    pub fn dismiss_wallet_prompt(&mut self) -> bool {
        self.gate.dismiss()
    }

    // ── Ungated transitions ──────────────────────────────────────────

    /// Validate → Launch once approval and voting are done.
    pub fn advance_to_launch(&mut self) -> LifecycleResult<()> {
        self.state.approve().inspect_err(|e| {
            warn!(error = %e, "advance to launch rejected");
        })
    }

    /// Launch → Validate.
    pub fn back(&mut self) -> LifecycleResult<()> {
        self.state.back().inspect_err(|e| {
            warn!(error = %e, "back rejected");
        })
    }

    /// Close the workflow, discarding all transient data and any pending
    /// action.
    pub fn close(&mut self) {
        self.gate.dismiss();
        self.state.reset();
    }

    /// Campaign details for the submitted project.
    pub async fn campaign_details(&self) -> LifecycleResult<CampaignDetails> {
        let project_id = self.state.require_project_id()?;
        let _busy = self.busy.enter();
        Ok(self.backend.campaign_details(project_id).await?)
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn request(&mut self, action: LifecycleAction) -> LifecycleResult<ActionOutcome> {
        // Fail fast on invalid data before bothering the user with a wallet
        // prompt; `execute` checks again since data can change while deferred.
        self.preflight(action).inspect_err(|e| {
            warn!(action = action.name(), error = %e, "action rejected");
        })?;

        match self.gate.require_wallet(self.wallet.is_connected(), action) {
            GateDecision::Proceed(action) => self.execute(action).await,
            GateDecision::Deferred { replaced } => {
                debug!(action = action.name(), replaced, "action awaiting wallet");
                Ok(ActionOutcome::AwaitingWallet { replaced })
            }
        }
    }

    fn preflight(&self, action: LifecycleAction) -> LifecycleResult<()> {
        match action {
            LifecycleAction::SubmitInitialization => self.submission_payload().map(|_| ()),
            LifecycleAction::CastVote | LifecycleAction::LaunchCampaign => {
                self.state.require_phase(action.phase(), action.name())?;
                self.state.require_project_id().map(|_| ())
            }
        }
    }

    /// Validate the Initialize data and build the payload.
    fn submission_payload(&self) -> LifecycleResult<SubmissionPayload> {
        self.state
            .require_phase(Phase::Initialize, LifecycleAction::SubmitInitialization.name())?;
        if let Some(existing) = self.state.project_id() {
            return Err(LifecycleError::AlreadySubmitted(existing.clone()));
        }
        self.state.draft().validate()?;
        let milestones = self.state.milestones();
        milestones.validate()?;
        milestones.verify_total()?;
        Ok(SubmissionPayload::build(
            self.state.draft(),
            milestones.milestones(),
        )?)
    }

    async fn execute(&mut self, action: LifecycleAction) -> LifecycleResult<ActionOutcome> {
        let outcome = match action {
            LifecycleAction::SubmitInitialization => self.execute_submission().await,
            LifecycleAction::CastVote => self.execute_vote().await,
            LifecycleAction::LaunchCampaign => self.execute_launch().await,
        };
        if let Err(e) = &outcome {
            warn!(action = action.name(), error = %e, phase = %self.phase(), "action failed");
        }
        outcome
    }

    async fn execute_submission(&mut self) -> LifecycleResult<ActionOutcome> {
        let payload = self.submission_payload()?;
        let result = {
            let _busy = self.busy.enter();
            self.backend.init_project(&payload).await
        };
        let project_id = result?;

        self.state.submitted(project_id.clone())?;
        info!(project_id = %project_id, milestones = payload.milestones.len(), "project submitted");
        Ok(ActionOutcome::Submitted(project_id))
    }

    async fn execute_vote(&mut self) -> LifecycleResult<ActionOutcome> {
        self.preflight(LifecycleAction::CastVote)?;
        let project_id = self.state.require_project_id()?.clone();
        let result = {
            let _busy = self.busy.enter();
            self.backend.cast_vote(&project_id).await
        };
        let receipt = result?;

        self.state.record_vote(receipt.clone())?;
        info!(project_id = %project_id, votes = self.state.votes().len(), "vote recorded");
        Ok(ActionOutcome::Voted(receipt))
    }

    async fn execute_launch(&mut self) -> LifecycleResult<ActionOutcome> {
        self.preflight(LifecycleAction::LaunchCampaign)?;
        let project_id = self.state.require_project_id()?.clone();
        let result = {
            let _busy = self.busy.enter();
            self.backend.launch_campaign(&project_id).await
        };
        let campaign_id = result?;

        info!(project_id = %project_id, campaign_id = %campaign_id, "campaign launched");
        let receipt = LaunchReceipt {
            project_id,
            campaign_id,
            launched_at: Utc::now(),
        };
        self.close();
        Ok(ActionOutcome::Launched(receipt))
    }
}
