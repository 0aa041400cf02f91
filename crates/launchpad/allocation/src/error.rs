use launchpad_types::MilestoneId;
use thiserror::Error;

/// Errors raised by the allocation engine and milestone set editor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("a project can have at most {max} milestones")]
    TooManyMilestones { max: usize },

    #[error("a project needs at least {min} milestones")]
    TooFewMilestones { min: usize },

    #[error("milestone {0} not found")]
    MilestoneNotFound(MilestoneId),

    #[error("milestone {0} is missing its {1}")]
    IncompleteMilestone(MilestoneId, &'static str),

    #[error("milestone shares must total 100%, got {total}%")]
    PercentageMismatch { total: u32 },

    #[error("invalid allocation config: {0}")]
    InvalidConfig(String),
}

pub type AllocationResult<T> = Result<T, AllocationError>;
