//! Wallet gate: deferred execution of state-changing actions.
//!
//! Every mutating action of the project workflow must run with a connected
//! wallet. Rather than failing when no wallet is connected, the gate holds the
//! action and asks the host UI to show its connection prompt; the action runs
//! once the wallet reports a successful connection.
//!
//! ## Guarantees
//!
//! - **Immediate when connected**: an action requested while connected runs
//!   at once, exactly once.
//! - **Never before connection**: a deferred action does not run until a
//!   connection-success notification arrives, and then runs exactly once.
//! - **Single slot**: at most one action is pending; a newer request
//!   replaces the older one, whether it is deferred or runs at once.
//! - **Silent dismissal**: dismissing the prompt drops the pending action
//!   without running it.
//!
//! The gate does not recover from connection failures; those are reported by
//! the [`WalletConnection`] collaborator.

pub mod error;
pub mod gate;
pub mod mocks;
pub mod traits;

pub use error::WalletError;
pub use gate::{DeferredAction, GateDecision, WalletGate};
pub use mocks::MockWallet;
pub use traits::WalletConnection;
