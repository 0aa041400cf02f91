//! Project lifecycle workflow.
//!
//! A project moves through three phases:
//!
//! 1. **Initialize**: draft the project and its milestones, then submit
//! 2. **Validate**: admin approval and public voting
//! 3. **Launch**: launch the funding campaign
//!
//! Phase data lives in an explicit [`LifecycleState`] value whose transition
//! functions are the only place phases and step states change.
//! [`ProjectLifecycle`] wraps that state with the backend and wallet
//! collaborators and routes every mutating action through a
//! [`launchpad_gate::WalletGate`].
//!
//! ## Transition rules
//!
//! - Initialize → Validate only after the backend returns a project id, and
//!   only if milestone shares total exactly 100%.
//! - Validate → Launch is an explicit advance, never implied by a vote.
//! - Launch → Validate through `back`; no other backward move exists.
//! - Closing the workflow (or a successful launch) resets to Initialize and
//!   discards all transient data.

pub mod backend;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod mocks;
pub mod state;

pub use backend::{BackendError, ProjectBackend};
pub use config::{LifecycleConfig, StepCopy, StepText};
pub use error::{LifecycleError, LifecycleResult};
pub use lifecycle::{ActionOutcome, BusyIndicator, LifecycleAction, ProjectLifecycle};
pub use mocks::MockProjectBackend;
pub use state::{derive_steps, LifecycleState, TransitionReason, TransitionRecord};
