use launchpad_allocation::AllocationError;
use launchpad_gate::WalletError;
use launchpad_types::{DraftError, Phase, ProjectId};
use thiserror::Error;

use crate::backend::BackendError;

/// Errors from the project lifecycle.
///
/// Every variant leaves the workflow in its pre-transition phase; the
/// `Display` text is suitable for an inline message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("cannot {action} during the {actual} phase (requires {expected})")]
    InvalidPhase {
        action: &'static str,
        expected: Phase,
        actual: Phase,
    },

    #[error("cannot go from the {from} phase to the {to} phase")]
    InvalidTransition { from: Phase, to: Phase },

    #[error("no project has been submitted yet")]
    MissingProjectId,

    #[error("project {0} has already been submitted")]
    AlreadySubmitted(ProjectId),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("wallet connection failed: {0}")]
    Wallet(#[from] WalletError),

    #[error("backend request failed: {0}")]
    Backend(#[from] BackendError),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
