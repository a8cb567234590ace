//! Record edit workflow

use std::sync::Arc;

use pekked_provider::{Address, TxHash};

use crate::error::{CoreError, CoreResult, EMPTY_FIELD};
use crate::services::{log_failure, RegistryReader, ServiceContext};
use crate::types::MintRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdateOutcome {
    /// Another submission was in flight; nothing was sent
    AlreadyInFlight,
    Updated {
        tx: TxHash,
        explorer_url: Option<String>,
    },
}

/// Record edit service
pub struct RecordEditService {
    ctx: Arc<ServiceContext>,
    reader: Arc<RegistryReader>,
}

impl RecordEditService {
    /// Create a record edit service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, reader: Arc<RegistryReader>) -> Self {
        Self { ctx, reader }
    }

    /// Check that the wallet's current account may edit `mint`.
    ///
    /// Owner comparison is case-insensitive.
    pub async fn enter_edit(&self, mint: &MintRecord) -> CoreResult<()> {
        let address = self.current_account().await?;
        if !mint.is_owned_by(&address) {
            return Err(not_owner(&mint.name, &mint.owner, &address));
        }
        Ok(())
    }

    /// Replace the record of `name` with `record`.
    ///
    /// Ownership is checked on chain against the account about to sign, so a
    /// name the session does not own is never submitted. A reverted and an
    /// unconfirmed update share one user message. The list is refreshed right
    /// after a confirmed update; a failed refresh is only logged.
    pub async fn update_record(&self, name: &str, record: &str) -> CoreResult<RecordUpdateOutcome> {
        if name.is_empty() || record.is_empty() {
            return Err(CoreError::ValidationFailed(EMPTY_FIELD.to_string()));
        }

        let Some(_permit) = self.ctx.try_begin_submission() else {
            log::debug!("[record-edit] Submission already in flight, ignoring");
            return Ok(RecordUpdateOutcome::AlreadyInFlight);
        };

        log::info!("[record-edit] Updating domain {name} with record {record}");

        let result = self.submit(name, record).await;
        if let Err(e) = &result {
            log_failure("record-edit", "Record update failed", e);
        }
        result
    }

    async fn current_account(&self) -> CoreResult<Address> {
        self.ctx
            .wallet()?
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(CoreError::NotConnected)
    }

    async fn submit(&self, name: &str, record: &str) -> CoreResult<RecordUpdateOutcome> {
        let signer = self.ctx.ensure_ready_to_submit().await?;
        let registry = self.ctx.registry()?;

        let owner = registry.owner(name).await?;
        if !owner.matches(&signer) {
            return Err(not_owner(name, &owner, &signer));
        }

        let tx = registry.set_record(name, record).await?;
        let receipt = registry
            .wait(&tx)
            .await
            .map_err(|e| CoreError::TransactionNeverConfirmed(e.to_string()))?;
        if !receipt.is_success() {
            return Err(CoreError::TransactionReverted(tx.to_string()));
        }

        let explorer_url = self.ctx.settings.required_network.tx_url(&tx);
        log::info!(
            "[record-edit] Record set {}",
            explorer_url.as_deref().unwrap_or(tx.0.as_str())
        );

        // The reader logs its own failures and keeps the previous list
        let _ = self.reader.refresh().await;

        Ok(RecordUpdateOutcome::Updated { tx, explorer_url })
    }
}

fn not_owner(name: &str, owner: &Address, account: &Address) -> CoreError {
    log::warn!("[record-edit] {name} is owned by {owner}, not {account}");
    CoreError::NotOwner(name.to_string())
}
