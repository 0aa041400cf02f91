//! The milestone set editor.
//!
//! Holds the milestones of a project draft and keeps their shares allocated.
//! Structural edits (add/remove) re-run the engine; field edits do not.
//! Rejected edits leave the set untouched.

use launchpad_types::{total_percentage, Milestone, MilestoneId, MilestonePatch};
use tracing::debug;

use crate::config::AllocationConfig;
use crate::engine::{verify_total, AllocationEngine};
use crate::error::{AllocationError, AllocationResult};

/// An ordered, editable set of milestones.
#[derive(Clone, Debug)]
pub struct MilestoneSet {
    milestones: Vec<Milestone>,
    next_id: MilestoneId,
    engine: AllocationEngine,
}

impl MilestoneSet {
    /// A set seeded with the minimum number of blank milestones, the first
    /// one expanded.
    pub fn new(config: AllocationConfig) -> Self {
        let mut set = Self::empty(config);
        let seed = set.engine.config().min_milestones;
        for _ in 0..seed {
            let id = set.issue_id();
            set.milestones.push(Milestone::blank(id));
        }
        if let Some(first) = set.milestones.first_mut() {
            first.is_expanded = true;
        }
        set.reallocate();
        set
    }

    /// A set with no milestones.
    pub fn empty(config: AllocationConfig) -> Self {
        Self {
            milestones: Vec::new(),
            next_id: MilestoneId::new(1),
            engine: AllocationEngine::new(config),
        }
    }

    /// Restore a previously edited set exactly as given, percentages
    /// included. Call [`MilestoneSet::reallocate`] to recompute shares.
    pub fn from_milestones(milestones: Vec<Milestone>, config: AllocationConfig) -> Self {
        let next_id = milestones
            .iter()
            .map(|m| m.id)
            .max()
            .map(MilestoneId::next)
            .unwrap_or(MilestoneId::new(1));
        Self {
            milestones,
            next_id,
            engine: AllocationEngine::new(config),
        }
    }

    pub fn config(&self) -> &AllocationConfig {
        self.engine.config()
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn into_milestones(self) -> Vec<Milestone> {
        self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    pub fn get(&self, id: MilestoneId) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// The milestone currently shown expanded, if any.
    pub fn expanded(&self) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.is_expanded)
    }

    pub fn total_percentage(&self) -> u32 {
        total_percentage(&self.milestones)
    }

    /// Append a blank milestone, expand it and reallocate.
    pub fn add(&mut self) -> AllocationResult<MilestoneId> {
        let max = self.config().max_milestones;
        if self.milestones.len() >= max {
            debug!(count = self.milestones.len(), max, "milestone add rejected");
            return Err(AllocationError::TooManyMilestones { max });
        }

        for milestone in &mut self.milestones {
            milestone.is_expanded = false;
        }
        let id = self.issue_id();
        let mut milestone = Milestone::blank(id);
        milestone.is_expanded = true;
        self.milestones.push(milestone);
        self.reallocate();

        debug!(milestone = %id, count = self.milestones.len(), "milestone added");
        Ok(id)
    }

    /// Apply a field patch to one milestone.
    ///
    /// Expanding a milestone collapses every other one. Shares are not
    /// recomputed since the count is unchanged.
    pub fn update(&mut self, id: MilestoneId, patch: &MilestonePatch) -> AllocationResult<()> {
        let target = self
            .milestones
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AllocationError::MilestoneNotFound(id))?;
        patch.apply(target);

        if patch.is_expanded == Some(true) {
            for milestone in &mut self.milestones {
                milestone.is_expanded = milestone.id == id;
            }
        }
        Ok(())
    }

    /// Remove a milestone and reallocate.
    pub fn remove(&mut self, id: MilestoneId) -> AllocationResult<()> {
        let min = self.config().min_milestones;
        if self.milestones.len() <= min {
            debug!(count = self.milestones.len(), min, "milestone remove rejected");
            return Err(AllocationError::TooFewMilestones { min });
        }
        let index = self
            .milestones
            .iter()
            .position(|m| m.id == id)
            .ok_or(AllocationError::MilestoneNotFound(id))?;

        self.milestones.remove(index);
        if !self.milestones.iter().any(|m| m.is_expanded) {
            if let Some(first) = self.milestones.first_mut() {
                first.is_expanded = true;
            }
        }
        self.reallocate();

        debug!(milestone = %id, count = self.milestones.len(), "milestone removed");
        Ok(())
    }

    /// Recompute every share from the current count.
    pub fn reallocate(&mut self) {
        self.engine.apply(&mut self.milestones);
    }

    /// Whether the set can be submitted.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The first reason the set cannot be submitted.
    pub fn validate(&self) -> AllocationResult<()> {
        let config = self.config();
        if self.milestones.len() < config.min_milestones {
            return Err(AllocationError::TooFewMilestones {
                min: config.min_milestones,
            });
        }
        if self.milestones.len() > config.max_milestones {
            return Err(AllocationError::TooManyMilestones {
                max: config.max_milestones,
            });
        }
        for milestone in &self.milestones {
            if let Some(field) = milestone.missing_field() {
                return Err(AllocationError::IncompleteMilestone(milestone.id, field));
            }
        }
        Ok(())
    }

    /// Check the shares still total 100%.
    pub fn verify_total(&self) -> AllocationResult<()> {
        verify_total(&self.milestones)
    }

    fn issue_id(&mut self) -> MilestoneId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }
}

impl Default for MilestoneSet {
    fn default() -> Self {
        Self::new(AllocationConfig::default())
    }
}
