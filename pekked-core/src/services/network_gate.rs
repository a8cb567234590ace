//! Required-network gate

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, ServiceContext};
use crate::types::Session;

/// What a switch request achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The wallet accepted the switch
    Switched,
    /// The wallet did not know the network and accepted the descriptor
    Added,
    /// The request failed; the wallet stays where it is
    Unchanged,
}

/// Network gate
pub struct NetworkGate {
    ctx: Arc<ServiceContext>,
}

impl NetworkGate {
    /// Create a network gate instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// True iff the session is on the required network.
    pub fn is_on_required_network(&self, session: &Session) -> bool {
        session.network == Some(self.ctx.required_chain())
    }

    /// Ask the wallet to move to the required network, adding it first if the
    /// wallet does not know it.
    ///
    /// Only a missing wallet is reported as an error. Every other failure is
    /// logged and yields [`SwitchOutcome::Unchanged`].
    pub async fn request_switch(&self) -> CoreResult<SwitchOutcome> {
        let wallet = self.ctx.wallet().inspect_err(|_| {
            log::warn!(
                "[network] MetaMask is not installed. Please install it to use this app: https://metamask.io/download.html"
            );
        })?;
        let descriptor = &self.ctx.settings.required_network;

        let err = match wallet.switch_chain(descriptor.chain_id).await {
            Ok(()) => {
                log::info!("[network] Switched to {}", descriptor.chain_name);
                return Ok(SwitchOutcome::Switched);
            }
            Err(e) => CoreError::from(e),
        };

        if !matches!(err, CoreError::UnrecognizedNetwork(_)) {
            log_failure("network", "Switch request failed", &err);
            return Ok(SwitchOutcome::Unchanged);
        }

        log::info!(
            "[network] Wallet does not know {}, adding it",
            descriptor.chain_id
        );
        match wallet.add_chain(descriptor).await {
            Ok(()) => Ok(SwitchOutcome::Added),
            Err(e) => {
                log_failure("network", "Add network request failed", &CoreError::from(e));
                Ok(SwitchOutcome::Unchanged)
            }
        }
    }
}
