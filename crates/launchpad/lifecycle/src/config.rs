//! Lifecycle configuration.

use launchpad_allocation::AllocationConfig;
use launchpad_types::Phase;
use serde::{Deserialize, Serialize};

use crate::error::LifecycleResult;

/// Title and description shown for one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepText {
    pub title: String,
    pub description: String,
}

impl StepText {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Step indicator copy, one entry per phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepCopy {
    pub initialize: StepText,
    pub validate: StepText,
    pub launch: StepText,
}

impl Default for StepCopy {
    fn default() -> Self {
        Self {
            initialize: StepText::new(
                "Initialize Project",
                "Describe the project, set a funding goal and plan its milestones",
            ),
            validate: StepText::new(
                "Validate Project",
                "Admin review and community voting on the submitted project",
            ),
            launch: StepText::new(
                "Launch Campaign",
                "Open the funding campaign to backers",
            ),
        }
    }
}

impl StepCopy {
    pub fn for_phase(&self, phase: Phase) -> &StepText {
        match phase {
            Phase::Initialize => &self.initialize,
            Phase::Validate => &self.validate,
            Phase::Launch => &self.launch,
        }
    }
}

/// Configuration of a project lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub allocation: AllocationConfig,
    pub steps: StepCopy,
}

impl LifecycleConfig {
    pub fn validate(&self) -> LifecycleResult<()> {
        self.allocation.validate()?;
        Ok(())
    }
}
