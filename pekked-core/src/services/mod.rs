//! Business logic service layer

mod network_gate;
mod pricing;
mod record_edit_service;
mod registration_service;
mod registry_reader;
mod session_service;

pub use network_gate::{NetworkGate, SwitchOutcome};
pub use pricing::{price, validate_name, MIN_NAME_LENGTH};
pub use record_edit_service::{RecordEditService, RecordUpdateOutcome};
pub use registration_service::{
    RecordWrite, Registration, RegistrationOutcome, RegistrationService,
};
pub use registry_reader::RegistryReader;
pub use session_service::SessionService;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pekked_provider::networks::polygon_mumbai;
use pekked_provider::{Address, ChainDescriptor, ChainId, RegistryContract, WalletProvider};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::Session;

/// Tunables shared by all services.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Network every mutation must be submitted on
    pub required_network: ChainDescriptor,
    /// Top-level namespace appended to names for display
    pub tld: String,
    /// Pause between a confirmed registration and the list refresh
    pub refresh_delay: Duration,
    /// Concurrent record/owner lookups during a refresh
    pub fanout: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            required_network: polygon_mumbai(),
            tld: "pekked".to_string(),
            refresh_delay: Duration::from_secs(2),
            fanout: 8,
        }
    }
}

/// Service context - holds all dependencies
///
/// The platform layer builds this once and shares it between services. A
/// missing wallet is represented by `None`, not by a failing provider.
pub struct ServiceContext {
    wallet: Option<Arc<dyn WalletProvider>>,
    registry: Option<Arc<dyn RegistryContract>>,
    /// Service settings
    pub settings: ServiceSettings,
    session: RwLock<Session>,
    submission: Arc<AtomicBool>,
}

impl ServiceContext {
    /// Create a service context
    #[must_use]
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        registry: Option<Arc<dyn RegistryContract>>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            wallet,
            registry,
            settings,
            session: RwLock::new(Session::default()),
            submission: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn wallet(&self) -> CoreResult<Arc<dyn WalletProvider>> {
        self.wallet.clone().ok_or(CoreError::ProviderUnavailable)
    }

    pub fn registry(&self) -> CoreResult<Arc<dyn RegistryContract>> {
        self.registry.clone().ok_or(CoreError::ProviderUnavailable)
    }

    pub fn required_chain(&self) -> ChainId {
        self.settings.required_network.chain_id
    }

    /// Last discovered session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = session;
    }

    /// Query the wallet for the account and network about to be used for a
    /// submission.
    ///
    /// Both are read fresh; the cached session may already be stale.
    pub async fn ensure_ready_to_submit(&self) -> CoreResult<Address> {
        let wallet = self.wallet()?;

        let address = wallet
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(CoreError::NotConnected)?;

        let actual = wallet.chain_id().await?;
        let expected = self.required_chain();
        if actual != expected {
            return Err(CoreError::WrongNetwork {
                expected: expected.to_hex(),
                actual: actual.to_hex(),
            });
        }

        Ok(address)
    }

    /// Claim the single submission slot shared by both workflows.
    ///
    /// Returns `None` while another submission holds it.
    pub fn try_begin_submission(&self) -> Option<SubmissionPermit> {
        self.submission
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionPermit {
                flag: Arc::clone(&self.submission),
            })
    }

    pub fn is_submitting(&self) -> bool {
        self.submission.load(Ordering::Acquire)
    }
}

/// Releases the submission slot on drop.
#[derive(Debug)]
pub struct SubmissionPermit {
    flag: Arc<AtomicBool>,
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Log a core error at the level its classification asks for.
pub(crate) fn log_failure(component: &str, action: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("[{component}] {action}: {err}");
    } else {
        log::error!("[{component}] {action}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{session_address, MockWallet};

    #[test]
    fn submission_slot_is_exclusive() {
        let ctx = ServiceContext::new(None, None, ServiceSettings::default());

        let permit = ctx.try_begin_submission().unwrap();
        assert!(ctx.is_submitting());
        assert!(ctx.try_begin_submission().is_none());

        drop(permit);
        assert!(!ctx.is_submitting());
        assert!(ctx.try_begin_submission().is_some());
    }

    #[tokio::test]
    async fn missing_wallet_is_provider_unavailable() {
        let ctx = ServiceContext::new(None, None, ServiceSettings::default());
        assert!(matches!(ctx.wallet(), Err(CoreError::ProviderUnavailable)));
        assert!(matches!(
            ctx.ensure_ready_to_submit().await,
            Err(CoreError::ProviderUnavailable)
        ));
    }

    #[tokio::test]
    async fn readiness_reads_wallet_fresh() {
        let wallet = Arc::new(MockWallet::on_required_network());
        let ctx = ServiceContext::new(
            Some(wallet.clone() as Arc<dyn WalletProvider>),
            None,
            ServiceSettings::default(),
        );

        assert_eq!(ctx.ensure_ready_to_submit().await.unwrap(), session_address());

        wallet.set_chain(ChainId(1)).await;
        assert!(matches!(
            ctx.ensure_ready_to_submit().await,
            Err(CoreError::WrongNetwork { ref expected, ref actual })
                if expected == "0x13881" && actual == "0x1"
        ));

        wallet.set_accounts(Vec::new()).await;
        assert!(matches!(
            ctx.ensure_ready_to_submit().await,
            Err(CoreError::NotConnected)
        ));
    }
}
