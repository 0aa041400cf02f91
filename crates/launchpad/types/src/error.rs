use thiserror::Error;

use crate::milestone::MilestoneId;

/// Validation errors raised while preparing a project submission.
///
/// These are recovered locally: the submission is rejected before any
/// network call and the message is shown inline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("project {0} is required")]
    MissingField(&'static str),

    #[error("funding goal must be greater than zero")]
    ZeroFundingGoal,

    #[error("at most {max} tags are allowed, got {actual}")]
    TooManyTags { max: usize, actual: usize },

    #[error("milestone {0} is missing its {1}")]
    IncompleteMilestone(MilestoneId, &'static str),
}
