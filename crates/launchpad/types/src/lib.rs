//! Launchpad domain types.
//!
//! Shared vocabulary for the milestone crowdfunding client core:
//!
//! - [`Milestone`]: a funding sub-unit carrying a percentage share of the goal
//! - [`Phase`] / [`Step`]: the project lifecycle stages and their read model
//! - [`ProjectDraft`] / [`SubmissionPayload`]: what the Initialize phase submits
//! - backend receipts ([`VoteReceipt`], [`CampaignDetails`]) and identifiers

pub mod error;
pub mod milestone;
pub mod phase;
pub mod project;

pub use error::DraftError;
pub use milestone::{total_percentage, Milestone, MilestoneId, MilestonePatch};
pub use phase::{Phase, Step, StepState};
pub use project::{
    CampaignDetails, CampaignId, CampaignStatus, LaunchReceipt, MilestonePayload, ProjectDraft,
    ProjectId, SubmissionPayload, VoteReceipt, WalletAddress, MAX_TAGS,
};
