//! JSON-RPC wallet provider
//!
//! Talks EIP-1193 method names over HTTP to a wallet bridge or a node with
//! unlocked accounts. Chain changes are detected by polling `eth_chainId`.

mod error;
mod http;
mod types;
mod wallet;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::types::ChainId;

/// Default connect timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default retry budget for idempotent calls
const DEFAULT_MAX_RETRIES: u32 = 3;
/// Buffered `chainChanged` notifications per subscriber
const CHAIN_EVENT_CAPACITY: usize = 16;

/// JSON-RPC wallet provider
pub struct JsonRpcWallet {
    pub(crate) client: Client,
    pub(crate) url: String,
    pub(crate) max_retries: u32,
    pub(crate) next_id: AtomicU64,
    pub(crate) chain_events: broadcast::Sender<ChainId>,
}

impl JsonRpcWallet {
    pub fn new(url: impl Into<String>) -> Self {
        let (chain_events, _) = broadcast::channel(CHAIN_EVENT_CAPACITY);
        Self {
            client: create_http_client(),
            url: url.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            next_id: AtomicU64::new(1),
            chain_events,
        }
    }

    /// Retry budget for idempotent calls. `eth_sendTransaction` is never retried.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Poll `eth_chainId` and emit `chainChanged` whenever it differs from
    /// the last observed value.
    ///
    /// Errors are logged and polling continues. The task ends when the
    /// returned handle is aborted.
    pub fn watch_chain(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut last: Option<ChainId> = None;
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match self.fetch_chain_id().await {
                    Ok(current) => {
                        if last.is_some_and(|prev| prev != current) {
                            log::info!("[json-rpc] chainChanged -> {current}");
                            // no subscribers is fine
                            let _ = self.chain_events.send(current);
                        }
                        last = Some(current);
                    }
                    Err(e) => log::warn!("[json-rpc] Chain poll failed: {e}"),
                }
            }
        })
    }
}

/// HTTP client with connect and request timeouts.
fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("[json-rpc] Falling back to default HTTP client: {e}");
            Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::traits::WalletProvider;

    #[tokio::test]
    async fn empty_endpoint_is_not_installed() {
        let wallet = JsonRpcWallet::new("  ");
        let err = wallet.chain_id().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotInstalled { .. }), "{err:?}");
        assert!(err.is_expected());
    }

    #[tokio::test]
    async fn malformed_endpoint_is_not_installed() {
        let wallet = JsonRpcWallet::new("not a url").with_max_retries(0);
        let err = wallet.accounts().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotInstalled { .. }), "{err:?}");
    }
}
