//! Allocation tuning.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, AllocationResult};

/// Parameters of the allocation curve and the milestone count bound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Weight ratio between consecutive milestones (default: 1.35)
    pub growth_factor: f64,
    /// Minimum share of the first milestone in percent (default: 8)
    pub first_share_floor: f64,
    /// Fewest milestones a submittable set may have (default: 3)
    pub min_milestones: usize,
    /// Most milestones a set may have (default: 6)
    pub max_milestones: usize,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            growth_factor: 1.35,
            first_share_floor: 8.0,
            min_milestones: 3,
            max_milestones: 6,
        }
    }
}

impl AllocationConfig {
    pub fn validate(&self) -> AllocationResult<()> {
        if !self.growth_factor.is_finite() || self.growth_factor <= 0.0 {
            return Err(AllocationError::InvalidConfig(format!(
                "growth_factor must be a positive number, got {}",
                self.growth_factor
            )));
        }
        if !(0.0..100.0).contains(&self.first_share_floor) {
            return Err(AllocationError::InvalidConfig(format!(
                "first_share_floor must be in [0, 100), got {}",
                self.first_share_floor
            )));
        }
        if self.min_milestones == 0 || self.min_milestones > self.max_milestones {
            return Err(AllocationError::InvalidConfig(format!(
                "milestone bounds must satisfy 1 <= min <= max, got {}..={}",
                self.min_milestones, self.max_milestones
            )));
        }
        Ok(())
    }
}
