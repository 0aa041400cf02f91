//! Lifecycle state and its transition functions.
//!
//! [`LifecycleState`] is a plain value owned by the caller. Phase changes go
//! through [`LifecycleState::transition`], which is also the only writer of
//! step states.

use chrono::{DateTime, Utc};
use launchpad_allocation::MilestoneSet;
use launchpad_types::{Phase, ProjectDraft, ProjectId, Step, StepState, VoteReceipt};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{LifecycleConfig, StepCopy};
use crate::error::{LifecycleError, LifecycleResult};

// ── Step Derivation ──────────────────────────────────────────────────

/// Steps for `phase`: earlier phases completed, `phase` active, later
/// phases pending.
pub fn derive_steps(phase: Phase, copy: &StepCopy) -> Vec<Step> {
    Phase::ALL
        .iter()
        .map(|&p| {
            let text = copy.for_phase(p);
            let state = match p.cmp(&phase) {
                std::cmp::Ordering::Less => StepState::Completed,
                std::cmp::Ordering::Equal => StepState::Active,
                std::cmp::Ordering::Greater => StepState::Pending,
            };
            Step {
                phase: p,
                title: text.title.clone(),
                description: text.description.clone(),
                state,
            }
        })
        .collect()
}

// ── Transition History ───────────────────────────────────────────────

/// Why a phase changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// Initialization accepted by the backend
    Submitted,
    /// Validation approved, moving to launch
    Approved,
    /// Explicit step back
    Back,
}

/// One recorded phase change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: Phase,
    pub to: Phase,
    pub reason: TransitionReason,
    pub at: DateTime<Utc>,
}

// ── Lifecycle State ──────────────────────────────────────────────────

/// The in-memory state of one project workflow session.
#[derive(Clone, Debug)]
pub struct LifecycleState {
    phase: Phase,
    steps: Vec<Step>,
    project_id: Option<ProjectId>,
    draft: ProjectDraft,
    milestones: MilestoneSet,
    votes: Vec<VoteReceipt>,
    history: Vec<TransitionRecord>,
    config: LifecycleConfig,
}

impl LifecycleState {
    /// Fresh state at the Initialize phase.
    pub fn new(config: LifecycleConfig) -> Self {
        Self {
            phase: Phase::Initialize,
            steps: derive_steps(Phase::Initialize, &config.steps),
            project_id: None,
            draft: ProjectDraft::default(),
            milestones: MilestoneSet::new(config.allocation.clone()),
            votes: Vec::new(),
            history: Vec::new(),
            config,
        }
    }

    // ── Read model ───────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn active_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.is_active())
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn milestones(&self) -> &MilestoneSet {
        &self.milestones
    }

    pub fn votes(&self) -> &[VoteReceipt] {
        &self.votes
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    // ── Editing (Initialize only) ────────────────────────────────────

    pub fn draft_mut(&mut self) -> LifecycleResult<&mut ProjectDraft> {
        self.require_phase(Phase::Initialize, "edit the project")?;
        Ok(&mut self.draft)
    }

    pub fn milestones_mut(&mut self) -> LifecycleResult<&mut MilestoneSet> {
        self.require_phase(Phase::Initialize, "edit milestones")?;
        Ok(&mut self.milestones)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Fail unless the workflow is in `expected`.
    pub fn require_phase(&self, expected: Phase, action: &'static str) -> LifecycleResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidPhase {
                action,
                expected,
                actual: self.phase,
            })
        }
    }

    /// The project id, or an error if nothing was submitted.
    pub fn require_project_id(&self) -> LifecycleResult<&ProjectId> {
        self.project_id.as_ref().ok_or(LifecycleError::MissingProjectId)
    }

    /// Initialize → Validate once the backend has assigned `project_id`.
    ///
    /// The milestone set has been serialized into the submission and is
    /// not kept past this point.
    pub fn submitted(&mut self, project_id: ProjectId) -> LifecycleResult<()> {
        self.require_phase(Phase::Initialize, "submit the project")?;
        if let Some(existing) = &self.project_id {
            return Err(LifecycleError::AlreadySubmitted(existing.clone()));
        }
        self.project_id = Some(project_id);
        self.milestones = MilestoneSet::empty(self.config.allocation.clone());
        self.transition(Phase::Validate, TransitionReason::Submitted);
        Ok(())
    }

    /// Record a vote acknowledged by the backend.
    pub fn record_vote(&mut self, receipt: VoteReceipt) -> LifecycleResult<()> {
        self.require_phase(Phase::Validate, "vote")?;
        self.require_project_id()?;
        self.votes.push(receipt);
        Ok(())
    }

    /// Validate → Launch.
    pub fn approve(&mut self) -> LifecycleResult<()> {
        self.require_phase(Phase::Validate, "advance to launch")?;
        self.require_project_id()?;
        self.transition(Phase::Launch, TransitionReason::Approved);
        Ok(())
    }

    /// Launch → Validate, keeping everything already entered.
    pub fn back(&mut self) -> LifecycleResult<()> {
        match self.phase {
            Phase::Launch => {
                self.transition(Phase::Validate, TransitionReason::Back);
                Ok(())
            }
            from => Err(LifecycleError::InvalidTransition {
                from,
                to: from.previous().unwrap_or(from),
            }),
        }
    }

    /// Discard every piece of transient data and return to Initialize.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        *self = Self::new(config);
        info!("project workflow reset");
    }

    fn transition(&mut self, to: Phase, reason: TransitionReason) {
        let from = self.phase;
        self.history.push(TransitionRecord {
            from,
            to,
            reason,
            at: Utc::now(),
        });
        self.phase = to;
        self.steps = derive_steps(to, &self.config.steps);
        info!(%from, %to, ?reason, "project phase changed");
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}
