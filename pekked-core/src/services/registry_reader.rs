//! Registered names reader

use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};
use pekked_provider::ProviderError;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, ServiceContext};
use crate::types::MintRecord;

/// Registry reader
///
/// Holds the last successfully fetched list. A failed refresh never touches it.
pub struct RegistryReader {
    ctx: Arc<ServiceContext>,
    mints: RwLock<Arc<Vec<MintRecord>>>,
}

impl RegistryReader {
    /// Create a registry reader instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            mints: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Read every registered name with its record and owner.
    ///
    /// Lookups run with bounded concurrency; output order and ids follow the
    /// registry's name list. The first failing lookup fails the whole fetch.
    pub async fn fetch_all(&self) -> CoreResult<Vec<MintRecord>> {
        let registry = self.ctx.registry()?;
        let names = registry
            .all_names()
            .await
            .map_err(|e| CoreError::RefreshFailed(e.to_string()))?;

        log::debug!("[registry] Fetching {} names", names.len());

        stream::iter(names.into_iter().enumerate())
            .map(|(id, name)| {
                let registry = Arc::clone(&registry);
                async move {
                    let (record, owner) =
                        futures::try_join!(registry.record(&name), registry.owner(&name))?;
                    Ok::<_, ProviderError>(MintRecord {
                        id,
                        name,
                        record,
                        owner,
                    })
                }
            })
            .buffered(self.ctx.settings.fanout.max(1))
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| CoreError::RefreshFailed(e.to_string()))
    }

    /// Replace the cached list with a fresh fetch.
    pub async fn refresh(&self) -> CoreResult<Arc<Vec<MintRecord>>> {
        match self.fetch_all().await {
            Ok(mints) => {
                let mints = Arc::new(mints);
                *self.mints.write().await = Arc::clone(&mints);
                log::info!("[registry] Loaded {} names", mints.len());
                Ok(mints)
            }
            Err(e) => {
                log_failure("registry", "Refresh failed, keeping previous list", &e);
                Err(e)
            }
        }
    }

    /// Last successfully fetched list.
    pub async fn snapshot(&self) -> Arc<Vec<MintRecord>> {
        Arc::clone(&*self.mints.read().await)
    }

    /// Forget the cached list (network or account changed).
    pub async fn clear(&self) {
        *self.mints.write().await = Arc::new(Vec::new());
    }
}
