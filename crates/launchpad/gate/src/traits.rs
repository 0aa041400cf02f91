use async_trait::async_trait;
use launchpad_types::WalletAddress;

use crate::error::WalletError;

/// The wallet connection service.
///
/// Implemented by the host around its wallet SDK. The gate only reads
/// [`WalletConnection::is_connected`]; `connect` is driven by the workflow
/// when the user accepts the connection prompt.
#[async_trait]
pub trait WalletConnection: Send + Sync {
    /// Whether a wallet is connected right now.
    fn is_connected(&self) -> bool;

    /// Address of the connected wallet, if any.
    fn address(&self) -> Option<WalletAddress>;

    /// Start a connection and wait for it to resolve.
    async fn connect(&self) -> Result<WalletAddress, WalletError>;
}
