//! Context reload hook

use async_trait::async_trait;

use pekked_provider::ChainId;

/// Rebuilds the application context after the wallet reports a network change.
///
/// Implemented by the platform layer. The session is never patched in place:
/// the implementation re-runs discovery and drops anything derived from the
/// previous network.
#[async_trait]
pub trait ContextReloader: Send + Sync {
    /// Called once per chain-changed notification.
    ///
    /// # Arguments
    /// * `chain_id` - Chain id the wallet reported
    async fn reload(&self, chain_id: ChainId);
}
