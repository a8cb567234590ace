//! Session discovery service

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, ServiceContext};
use crate::traits::ContextReloader;
use crate::types::Session;

/// Session service
pub struct SessionService {
    ctx: Arc<ServiceContext>,
}

impl SessionService {
    /// Create a session service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Prompt the wallet for account access and adopt the first account.
    pub async fn connect(&self) -> CoreResult<Session> {
        let wallet = self.ctx.wallet().inspect_err(|_| {
            log::warn!("[session] Get MetaMask -> https://metamask.io/");
        })?;

        let result = async {
            let address = wallet
                .request_accounts()
                .await?
                .into_iter()
                .next()
                .ok_or(CoreError::NotConnected)?;
            let network = wallet.chain_id().await?;
            Ok::<_, CoreError>(Session {
                address: Some(address),
                network: Some(network),
            })
        }
        .await;

        match result {
            Ok(session) => {
                log::info!(
                    "[session] Connected {} on {}",
                    session.wallet_label(),
                    session.network_name().unwrap_or_default()
                );
                self.ctx.set_session(session.clone()).await;
                Ok(session)
            }
            Err(e) => {
                log_failure("session", "Connect failed", &e);
                Err(e)
            }
        }
    }

    /// Adopt already authorized accounts without prompting.
    ///
    /// An empty account list is not an error: the session simply stays
    /// disconnected while the network is still recorded.
    pub async fn check_existing_session(&self) -> CoreResult<Session> {
        let wallet = self.ctx.wallet().inspect_err(|_| {
            log::warn!("[session] Make sure you have MetaMask!");
        })?;

        let address = wallet.accounts().await?.into_iter().next();
        let network = wallet.chain_id().await?;

        match &address {
            Some(address) => log::info!("[session] Found an authorized account: {address}"),
            None => log::info!("[session] No authorized account found"),
        }

        let session = Session {
            address,
            network: Some(network),
        };
        self.ctx.set_session(session.clone()).await;
        Ok(session)
    }

    /// Forward every chain-changed notification to `reloader`.
    ///
    /// The task ends when the wallet drops its notification channel.
    pub fn watch_network_changes(
        &self,
        reloader: Arc<dyn ContextReloader>,
    ) -> CoreResult<JoinHandle<()>> {
        let mut events = self.ctx.wallet()?.subscribe_chain_changed();

        Ok(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(chain_id) => {
                        log::info!("[session] Network changed to {chain_id}, reloading");
                        reloader.reload(chain_id).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("[session] Missed {skipped} network notifications");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }

    /// Cached session as of the last discovery.
    pub async fn current(&self) -> Session {
        self.ctx.session().await
    }
}
