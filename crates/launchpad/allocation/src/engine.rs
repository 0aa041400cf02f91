//! The allocation engine.
//!
//! Given `n` ordered milestones the engine computes:
//!
//! 1. geometric weights `w[i] = growth_factor ^ i`
//! 2. raw shares `w[i] / sum(w) * 100`
//! 3. a floor on the first share, paid for by the last milestone
//! 4. integer shares by the largest-remainder method
//!
//! The result always totals exactly 100 for `n >= 1`.

use std::cmp::Ordering;

use launchpad_types::{total_percentage, Milestone};
use tracing::trace;

use crate::config::AllocationConfig;
use crate::error::{AllocationError, AllocationResult};

const TOTAL: u32 = 100;

/// Computes percentage shares for ordered milestone lists.
#[derive(Clone, Debug, Default)]
pub struct AllocationEngine {
    config: AllocationConfig,
}

impl AllocationEngine {
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Integer shares for `n` milestones, in milestone order.
    pub fn percentages(&self, n: usize) -> Vec<u8> {
        match n {
            0 => Vec::new(),
            1 => vec![TOTAL as u8],
            _ => {
                let raw = self.raw_shares(n);
                let shares = largest_remainder(&raw, TOTAL);
                trace!(count = n, ?shares, "milestone shares allocated");
                shares
            }
        }
    }

    /// Overwrite `fund_percentage` on every milestone in place.
    pub fn apply(&self, milestones: &mut [Milestone]) {
        let shares = self.percentages(milestones.len());
        for (milestone, share) in milestones.iter_mut().zip(shares) {
            milestone.fund_percentage = share;
        }
    }

    /// Return `milestones` with `fund_percentage` populated; other fields are
    /// left untouched.
    pub fn allocate(&self, mut milestones: Vec<Milestone>) -> Vec<Milestone> {
        self.apply(&mut milestones);
        milestones
    }

    fn raw_shares(&self, n: usize) -> Vec<f64> {
        let last = n - 1;
        // Exponents are shifted so the largest weight is 1.0 and long
        // lists cannot overflow.
        let weights: Vec<f64> = (0..n)
            .map(|i| self.config.growth_factor.powf(i as f64 - last as f64))
            .collect();
        let sum: f64 = weights.iter().sum();
        let mut raw: Vec<f64> = weights.iter().map(|w| w / sum * f64::from(TOTAL)).collect();

        let floor = self.config.first_share_floor;
        if raw[0] < floor {
            let mut delta = floor - raw[0];
            raw[0] = floor;
            // The last milestone pays for the floor; whatever it cannot
            // cover comes from its predecessors, latest first.
            for share in raw[1..].iter_mut().rev() {
                let paid = delta.min(*share);
                *share -= paid;
                delta -= paid;
                if delta <= 0.0 {
                    break;
                }
            }
        }
        raw
    }
}

/// Allocate with the default configuration.
pub fn allocate(milestones: Vec<Milestone>) -> Vec<Milestone> {
    AllocationEngine::default().allocate(milestones)
}

/// Check that a non-empty milestone list totals exactly 100%.
pub fn verify_total(milestones: &[Milestone]) -> AllocationResult<()> {
    let total = total_percentage(milestones);
    if milestones.is_empty() || total == TOTAL {
        Ok(())
    } else {
        Err(AllocationError::PercentageMismatch { total })
    }
}

/// Round `raw` to integers summing to `target`.
///
/// Floors every entry, then hands out the remaining units one at a time to
/// the largest fractional remainders, lower index first on ties.
fn largest_remainder(raw: &[f64], target: u32) -> Vec<u8> {
    let mut shares: Vec<u32> = raw.iter().map(|r| r.max(0.0).floor() as u32).collect();
    let assigned: u32 = shares.iter().sum();

    let mut order: Vec<usize> = (0..raw.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = raw[a] - raw[a].floor();
        let rb = raw[b] - raw[b].floor();
        rb.partial_cmp(&ra).unwrap_or(Ordering::Equal).then(a.cmp(&b))
    });

    let deficit = target.saturating_sub(assigned) as usize;
    for k in 0..deficit {
        shares[order[k % order.len()]] += 1;
    }

    debug_assert_eq!(shares.iter().sum::<u32>(), target);
    shares.into_iter().map(|s| s.min(target) as u8).collect()
}
