//! Fund allocation for milestone sets.
//!
//! Two pieces:
//!
//! - [`AllocationEngine`]: a pure function from an ordered milestone list to
//!   integer percentage shares that always total exactly 100. Later milestones
//!   are weighted geometrically heavier, the first share is floored, and
//!   rounding uses the largest-remainder method.
//! - [`MilestoneSet`]: the editable collection (add / update / remove) that
//!   re-runs allocation after every structural change and enforces the
//!   3..=6 submission bound.

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;

pub use config::AllocationConfig;
pub use editor::MilestoneSet;
pub use engine::{allocate, AllocationEngine};
pub use error::{AllocationError, AllocationResult};
