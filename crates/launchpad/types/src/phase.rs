//! Lifecycle phases and the step read model rendered for each of them.

use serde::{Deserialize, Serialize};

/// A named stage of the project lifecycle, in progression order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Draft the project and its milestones, then submit
    Initialize,
    /// Admin approval and public voting
    Validate,
    /// Launch the funding campaign
    Launch,
}

impl Phase {
    /// All phases in progression order.
    pub const ALL: [Phase; 3] = [Phase::Initialize, Phase::Validate, Phase::Launch];

    /// Position of the phase in [`Phase::ALL`].
    pub fn index(self) -> usize {
        match self {
            Phase::Initialize => 0,
            Phase::Validate => 1,
            Phase::Launch => 2,
        }
    }

    pub fn next(self) -> Option<Phase> {
        Phase::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Phase> {
        self.index().checked_sub(1).map(|i| Phase::ALL[i])
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::Validate => "validate",
            Phase::Launch => "launch",
        };
        f.write_str(name)
    }
}

/// Progress state of a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Active,
    Completed,
}

/// One entry of the step indicator shown alongside the workflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub phase: Phase,
    pub title: String,
    pub description: String,
    pub state: StepState,
}

impl Step {
    pub fn is_active(&self) -> bool {
        self.state == StepState::Active
    }
}
