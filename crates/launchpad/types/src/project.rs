//! Project drafts, submission payloads and backend receipts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::milestone::Milestone;

/// Maximum number of distinct tags a project may carry.
pub const MAX_TAGS: usize = 5;

// ── Identifiers ──────────────────────────────────────────────────────

/// Identifier assigned by the backend when a project is initialized
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a launched funding campaign
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

impl CampaignId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of a connected wallet
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Project Draft ────────────────────────────────────────────────────

/// Project-level fields entered during the Initialize phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub tagline: String,
    pub category: String,
    /// Funding goal in whole currency units
    pub fund_amount: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitepaper_url: Option<String>,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, fund_amount: u64) -> Self {
        Self {
            title: title.into(),
            fund_amount,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = tagline.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_whitepaper_url(mut self, url: impl Into<String>) -> Self {
        self.whitepaper_url = Some(url.into());
        self
    }

    /// Tags trimmed, with blanks and duplicates removed, in entry order.
    pub fn normalized_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    /// Check the project-level fields.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingField("description"));
        }
        if self.category.trim().is_empty() {
            return Err(DraftError::MissingField("category"));
        }
        if self.fund_amount == 0 {
            return Err(DraftError::ZeroFundingGoal);
        }
        let tags = self.normalized_tags().len();
        if tags > MAX_TAGS {
            return Err(DraftError::TooManyTags {
                max: MAX_TAGS,
                actual: tags,
            });
        }
        Ok(())
    }
}

// ── Submission Payload ───────────────────────────────────────────────

/// A milestone as sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePayload {
    pub title: String,
    pub description: String,
    pub delivery_date: NaiveDate,
    pub fund_percentage: u8,
    /// `total * fund_percentage / 100`, truncated
    pub fund_amount: u64,
}

impl MilestonePayload {
    pub fn from_milestone(milestone: &Milestone, total: u64) -> Result<Self, DraftError> {
        if let Some(field) = milestone.missing_field() {
            return Err(DraftError::IncompleteMilestone(milestone.id, field));
        }
        let delivery_date = milestone
            .delivery_date
            .ok_or(DraftError::IncompleteMilestone(milestone.id, "delivery date"))?;

        Ok(Self {
            title: milestone.title.trim().to_string(),
            description: milestone.description.trim().to_string(),
            delivery_date,
            fund_percentage: milestone.fund_percentage,
            fund_amount: share_of(total, milestone.fund_percentage),
        })
    }
}

fn share_of(total: u64, percentage: u8) -> u64 {
    // percentage <= 100, so the quotient never exceeds `total`
    (u128::from(total) * u128::from(percentage.min(100)) / 100) as u64
}

/// The Initialize phase submission sent to `init_project`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub title: String,
    pub description: String,
    pub tagline: String,
    pub category: String,
    pub fund_amount: u64,
    pub tags: Vec<String>,
    pub milestones: Vec<MilestonePayload>,
    pub thumbnail: Option<String>,
    pub whitepaper_url: Option<String>,
}

impl SubmissionPayload {
    /// Assemble the payload from a validated draft and its milestones.
    ///
    /// Percentage totals are not checked here; the lifecycle does that
    /// before calling in.
    pub fn build(draft: &ProjectDraft, milestones: &[Milestone]) -> Result<Self, DraftError> {
        draft.validate()?;
        let milestones = milestones
            .iter()
            .map(|m| MilestonePayload::from_milestone(m, draft.fund_amount))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            tagline: draft.tagline.trim().to_string(),
            category: draft.category.trim().to_string(),
            fund_amount: draft.fund_amount,
            tags: draft.normalized_tags(),
            milestones,
            thumbnail: draft.thumbnail.clone(),
            whitepaper_url: draft.whitepaper_url.clone(),
        })
    }
}

// ── Backend Receipts ─────────────────────────────────────────────────

/// Acknowledgement of a cast vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub vote_id: String,
    pub project_id: ProjectId,
    pub cast_at: DateTime<Utc>,
}

impl VoteReceipt {
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            vote_id: uuid::Uuid::new_v4().to_string(),
            project_id,
            cast_at: Utc::now(),
        }
    }
}

/// Returned when a campaign launch succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchReceipt {
    pub project_id: ProjectId,
    pub campaign_id: CampaignId,
    pub launched_at: DateTime<Utc>,
}

/// Status of a project's campaign as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Submitted, awaiting admin approval
    PendingApproval,
    /// Open for public voting
    Voting,
    /// Campaign launched and accepting funds
    Live,
    /// Goal reached
    Funded,
    Closed,
}

/// Campaign details for a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetails {
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<CampaignId>,
    pub goal: u64,
    pub raised: u64,
    pub backers: u32,
    pub votes: u32,
    pub status: CampaignStatus,
}

impl CampaignDetails {
    /// Percentage of the goal raised so far, capped at 100.
    pub fn progress_percent(&self) -> u8 {
        if self.goal == 0 {
            return 0;
        }
        let pct = u128::from(self.raised) * 100 / u128::from(self.goal);
        pct.min(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milestone::MilestoneId;

    fn draft() -> ProjectDraft {
        ProjectDraft::new("Solar Co-op", 50_000)
            .with_description("Community solar array")
            .with_tagline("Power to the block")
            .with_category("energy")
            .with_tag("solar")
            .with_tag(" solar ")
            .with_tag("")
            .with_tag("community")
    }

    fn milestone(id: u32, pct: u8) -> Milestone {
        let mut m = Milestone::blank(MilestoneId::new(id))
            .with_title(format!("Phase {id}"))
            .with_description("Deliverable")
            .with_delivery_date(NaiveDate::from_ymd_opt(2027, id, 1).unwrap());
        m.fund_percentage = pct;
        m
    }

    #[test]
    fn draft_requires_core_fields() {
        assert_eq!(
            ProjectDraft::new("", 10).validate(),
            Err(DraftError::MissingField("title"))
        );
        assert_eq!(
            ProjectDraft::new("x", 10).validate(),
            Err(DraftError::MissingField("description"))
        );
        let no_goal = ProjectDraft {
            fund_amount: 0,
            ..draft()
        };
        assert_eq!(no_goal.validate(), Err(DraftError::ZeroFundingGoal));
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn tags_are_normalized_before_counting() {
        assert_eq!(draft().normalized_tags(), vec!["solar", "community"]);

        let crowded = (0..6).fold(draft(), |d, i| d.with_tag(format!("t{i}")));
        assert_eq!(
            crowded.validate(),
            Err(DraftError::TooManyTags { max: MAX_TAGS, actual: 8 })
        );
    }

    #[test]
    fn payload_derives_milestone_amounts() {
        let payload =
            SubmissionPayload::build(&draft(), &[milestone(1, 24), milestone(2, 32), milestone(3, 44)])
                .unwrap();

        let amounts: Vec<u64> = payload.milestones.iter().map(|m| m.fund_amount).collect();
        assert_eq!(amounts, vec![12_000, 16_000, 22_000]);
        assert_eq!(payload.tags, vec!["solar", "community"]);
    }

    #[test]
    fn payload_amounts_truncate() {
        let d = ProjectDraft {
            fund_amount: 999,
            ..draft()
        };
        let payload = SubmissionPayload::build(&d, &[milestone(1, 33)]).unwrap();
        assert_eq!(payload.milestones[0].fund_amount, 329);
    }

    #[test]
    fn payload_rejects_incomplete_milestone() {
        let mut m = milestone(2, 50);
        m.delivery_date = None;
        let err = SubmissionPayload::build(&draft(), &[milestone(1, 50), m]).unwrap_err();
        assert_eq!(
            err,
            DraftError::IncompleteMilestone(MilestoneId::new(2), "delivery date")
        );
    }

    #[test]
    fn payload_serializes_camel_case() {
        let payload = SubmissionPayload::build(
            &draft().with_whitepaper_url("https://example.org/wp.pdf"),
            &[milestone(1, 100)],
        )
        .unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["fundAmount"], 50_000);
        assert_eq!(json["whitepaperUrl"], "https://example.org/wp.pdf");
        assert_eq!(json["milestones"][0]["deliveryDate"], "2027-01-01");
        assert_eq!(json["milestones"][0]["fundPercentage"], 100);
    }

    #[test]
    fn campaign_progress_is_capped() {
        let mut details = CampaignDetails {
            project_id: ProjectId::new("p-1"),
            campaign_id: None,
            goal: 200,
            raised: 50,
            backers: 3,
            votes: 0,
            status: CampaignStatus::Live,
        };
        assert_eq!(details.progress_percent(), 25);
        details.raised = 900;
        assert_eq!(details.progress_percent(), 100);
        details.goal = 0;
        assert_eq!(details.progress_percent(), 0);
    }
}
