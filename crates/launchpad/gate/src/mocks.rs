use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use launchpad_types::WalletAddress;

use crate::error::WalletError;
use crate::traits::WalletConnection;

/// Mock wallet for testing and local simulation.
///
/// Starts connected or disconnected; `connect` either succeeds with a fixed
/// address or fails with a configured error.
pub struct MockWallet {
    connected: AtomicBool,
    address: WalletAddress,
    failure: Mutex<Option<WalletError>>,
    connect_calls: AtomicUsize,
}

impl MockWallet {
    /// A wallet that is already connected.
    pub fn connected() -> Self {
        let wallet = Self::disconnected();
        wallet.connected.store(true, Ordering::SeqCst);
        wallet
    }

    /// A wallet that connects successfully on request.
    pub fn disconnected() -> Self {
        Self {
            connected: AtomicBool::new(false),
            address: WalletAddress::new("0xmock0000000000000000000000000000000000"),
            failure: Mutex::new(None),
            connect_calls: AtomicUsize::new(0),
        }
    }

    /// A disconnected wallet whose connection attempts fail with `error`.
    pub fn failing(error: WalletError) -> Self {
        let wallet = Self::disconnected();
        wallet.fail_with(Some(error));
        wallet
    }

    /// Set (or clear) the error returned by subsequent `connect` calls.
    pub fn fail_with(&self, error: Option<WalletError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    /// Drop the connection, as if the user disconnected in their wallet.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::disconnected()
    }
}

#[async_trait]
impl WalletConnection for MockWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn address(&self) -> Option<WalletAddress> {
        self.is_connected().then(|| self.address.clone())
    }

    async fn connect(&self) -> Result<WalletAddress, WalletError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(self.address.clone())
    }
}
