use thiserror::Error;

/// Errors reported by the wallet connection collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet connection rejected by user")]
    Rejected,

    #[error("no wallet provider available: {0}")]
    Unavailable(String),

    #[error("wallet connection timed out")]
    Timeout,

    #[error("wallet error: {0}")]
    Provider(String),
}
