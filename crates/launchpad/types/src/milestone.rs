//! Milestones: funding sub-units of a project.
//!
//! A milestone's `fund_percentage` is derived by the allocation engine and is
//! never edited by hand, which is why [`MilestonePatch`] has no field for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Identifier ───────────────────────────────────────────────────────

/// Identifier of a milestone, unique within its set and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MilestoneId(pub u32);

impl MilestoneId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// The identifier that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Milestone ────────────────────────────────────────────────────────

/// A single milestone of a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Stable identifier
    pub id: MilestoneId,
    /// Short title shown on the milestone card
    pub title: String,
    /// What will be delivered
    pub description: String,
    /// Promised delivery date; `None` until the user picks one
    pub delivery_date: Option<NaiveDate>,
    /// Share of the funding goal in whole percent, written by allocation
    pub fund_percentage: u8,
    /// Presentation only
    #[serde(skip)]
    pub is_expanded: bool,
}

impl Milestone {
    /// A milestone with every user-editable field blank.
    pub fn blank(id: MilestoneId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            delivery_date: None,
            fund_percentage: 0,
            is_expanded: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    /// First required field that is still missing, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.description.trim().is_empty() {
            Some("description")
        } else if self.delivery_date.is_none() {
            Some("delivery date")
        } else {
            None
        }
    }

    /// Whether every required field is filled in.
    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

/// Sum of the percentages of a milestone list.
pub fn total_percentage(milestones: &[Milestone]) -> u32 {
    milestones.iter().map(|m| u32::from(m.fund_percentage)).sum()
}

// ── Patch ────────────────────────────────────────────────────────────

/// A partial update of a milestone's editable fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MilestonePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the date
    pub delivery_date: Option<Option<NaiveDate>>,
    pub is_expanded: Option<bool>,
}

impl MilestonePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(Some(date));
        self
    }

    pub fn clear_delivery_date(mut self) -> Self {
        self.delivery_date = Some(None);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    /// Write the patched fields onto `milestone`.
    pub fn apply(&self, milestone: &mut Milestone) {
        if let Some(title) = &self.title {
            milestone.title = title.clone();
        }
        if let Some(description) = &self.description {
            milestone.description = description.clone();
        }
        if let Some(date) = self.delivery_date {
            milestone.delivery_date = date;
        }
        if let Some(expanded) = self.is_expanded {
            milestone.is_expanded = expanded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 3, 1).unwrap()
    }

    #[test]
    fn blank_milestone_is_incomplete() {
        let m = Milestone::blank(MilestoneId::new(1));
        assert_eq!(m.missing_field(), Some("title"));
        assert!(!m.is_complete());
    }

    #[test]
    fn whitespace_only_fields_do_not_count() {
        let m = Milestone::blank(MilestoneId::new(1))
            .with_title("   ")
            .with_description("Ship beta")
            .with_delivery_date(date());
        assert_eq!(m.missing_field(), Some("title"));

        let m = m.with_title("Beta").with_description("\t\n");
        assert_eq!(m.missing_field(), Some("description"));
    }

    #[test]
    fn complete_milestone_requires_date() {
        let m = Milestone::blank(MilestoneId::new(1))
            .with_title("Beta")
            .with_description("Ship beta");
        assert_eq!(m.missing_field(), Some("delivery date"));
        assert!(m.with_delivery_date(date()).is_complete());
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut m = Milestone::blank(MilestoneId::new(4))
            .with_title("Old")
            .with_delivery_date(date());
        m.fund_percentage = 40;

        MilestonePatch::new().description("New scope").apply(&mut m);
        assert_eq!(m.title, "Old");
        assert_eq!(m.description, "New scope");
        assert_eq!(m.delivery_date, Some(date()));
        assert_eq!(m.fund_percentage, 40);

        MilestonePatch::new().clear_delivery_date().apply(&mut m);
        assert_eq!(m.delivery_date, None);
    }

    #[test]
    fn expansion_flag_is_not_serialized() {
        let mut m = Milestone::blank(MilestoneId::new(2)).with_title("Alpha");
        m.is_expanded = true;

        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("isExpanded").is_none());
        assert_eq!(json["fundPercentage"], 0);

        let back: Milestone = serde_json::from_value(json).unwrap();
        assert!(!back.is_expanded);
        assert_eq!(back.title, "Alpha");
    }

    #[test]
    fn total_percentage_sums_shares() {
        let mut a = Milestone::blank(MilestoneId::new(1));
        let mut b = Milestone::blank(MilestoneId::new(2));
        a.fund_percentage = 40;
        b.fund_percentage = 59;
        assert_eq!(total_percentage(&[a, b]), 99);
        assert_eq!(total_percentage(&[]), 0);
    }
}
