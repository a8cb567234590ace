//! Platform-agnostic application state for the pekked client.
//!
//! Provides `AppState` (service container plus the reconciled [`ViewState`]),
//! `AppStateBuilder` (wallet and registry injection), and `StartupHooks`
//! (platform-specific startup callbacks).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use pekked_core::error::{CoreError, CoreResult, NOT_EDITING};
use pekked_core::services::{
    NetworkGate, RecordEditService, RecordUpdateOutcome, RegistrationOutcome,
    RegistrationService, RegistryReader, ServiceContext, ServiceSettings, SessionService,
    SwitchOutcome,
};
use pekked_core::traits::ContextReloader;
use pekked_core::types::{Candidate, ChainId, MintRecord, Session, ViewState};
use pekked_provider::{RegistryContract, WalletProvider};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Prompt shown when no wallet is available on connect.
pub const GET_WALLET_PROMPT: &str = "Get MetaMask -> https://metamask.io/";
/// Prompt shown when no wallet is available on network switch.
pub const INSTALL_WALLET_PROMPT: &str =
    "MetaMask is not installed. Please install it to use this app: https://metamask.io/download.html";

/// Platform-specific hooks for the startup sequence.
#[async_trait::async_trait]
pub trait StartupHooks: Send + Sync {
    /// Called when no wallet provider is configured.
    async fn wallet_missing(&self) {}

    /// Called once discovery has settled the initial session.
    async fn session_restored(&self, _session: &Session) {}
}

/// No-op startup hooks.
pub struct NoopStartupHooks;

#[async_trait::async_trait]
impl StartupHooks for NoopStartupHooks {}

/// Platform-agnostic application state.
///
/// Every frontend constructs this once at startup via `AppStateBuilder` and
/// keeps it behind an `Arc`.
pub struct AppState {
    /// Service context (holds the wallet and registry)
    pub ctx: Arc<ServiceContext>,
    /// Session discovery
    pub session_service: SessionService,
    /// Required-network gate
    pub network_gate: NetworkGate,
    /// Registered names
    pub registry_reader: Arc<RegistryReader>,
    /// Registration workflow
    pub registration_service: RegistrationService,
    /// Record edit workflow
    pub record_edit_service: RecordEditService,
    /// Whether the startup sequence has completed
    pub startup_completed: AtomicBool,
    view: RwLock<ViewState>,
    network_watch: Mutex<Option<JoinHandle<()>>>,
    reloads: watch::Sender<u64>,
}

impl AppState {
    /// Run the full startup sequence: discovery, network watch, first refresh.
    pub async fn run_startup(self: &Arc<Self>, hooks: &dyn StartupHooks) -> CoreResult<()> {
        match self.discover().await {
            Ok(session) => hooks.session_restored(&session).await,
            Err(CoreError::ProviderUnavailable) => {
                hooks.wallet_missing().await;
                self.startup_completed.store(true, Ordering::SeqCst);
                return Ok(());
            }
            Err(e) => log::error!("[app] Session discovery failed: {e}"),
        }

        self.start_network_watch().await?;
        self.startup_completed.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Subscribe to chain changes; every notification re-runs discovery.
    pub async fn start_network_watch(self: &Arc<Self>) -> CoreResult<()> {
        let reloader: Arc<dyn ContextReloader> = Arc::new(AppReloader {
            app: Arc::downgrade(self),
        });
        let handle = self.session_service.watch_network_changes(reloader)?;
        if let Some(previous) = self.network_watch.lock().await.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Count of completed network-change reloads, bumped after each one
    /// settles.
    pub fn subscribe_reloads(&self) -> watch::Receiver<u64> {
        self.reloads.subscribe()
    }

    /// Stop background tasks.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.network_watch.lock().await.take() {
            handle.abort();
        }
    }

    /// Re-read the session from the wallet without prompting.
    ///
    /// A changed session drops the cached list and edit mode. The list is
    /// reloaded whenever the session is connected on the required network.
    pub async fn discover(&self) -> CoreResult<Session> {
        let session = self.session_service.check_existing_session().await?;
        self.adopt_session(session.clone()).await;
        Ok(session)
    }

    /// Prompt the wallet for account access.
    pub async fn connect(&self) -> CoreResult<Session> {
        match self.session_service.connect().await {
            Ok(session) => {
                self.adopt_session(session.clone()).await;
                Ok(session)
            }
            Err(e) => {
                let message = if matches!(e, CoreError::ProviderUnavailable) {
                    GET_WALLET_PROMPT.to_string()
                } else {
                    e.to_string()
                };
                self.view.write().await.show_error(message);
                Err(e)
            }
        }
    }

    /// Ask the wallet to move to the required network.
    ///
    /// The session itself is updated by the chain-changed notification.
    pub async fn switch_network(&self) -> CoreResult<SwitchOutcome> {
        let result = self.network_gate.request_switch().await;
        if let Err(CoreError::ProviderUnavailable) = result {
            self.view.write().await.show_error(INSTALL_WALLET_PROMPT);
        }
        result
    }

    /// Replace the form input.
    pub async fn set_candidate(&self, name: impl Into<String>, record: impl Into<String>) {
        self.view.write().await.candidate = Candidate::new(name, record);
    }

    /// Register the name currently in the form.
    pub async fn mint(&self) -> CoreResult<RegistrationOutcome> {
        let candidate = {
            let mut view = self.view.write().await;
            if view.is_busy() {
                return Ok(RegistrationOutcome::AlreadyInFlight);
            }
            view.begin_mint();
            view.candidate.clone()
        };

        let result = self.registration_service.register(&candidate).await;

        let mut view = self.view.write().await;
        match &result {
            Ok(RegistrationOutcome::Registered(registration)) => {
                let full_name = format!(
                    "{}.{}",
                    registration.name,
                    self.ctx.settings.tld.trim_start_matches('.')
                );
                let notice = match &registration.explorer_url {
                    Some(url) => format!("Registered {full_name} ({url})"),
                    None => format!("Registered {full_name}"),
                };
                view.finish_mint(Ok(Some(notice)));
            }
            Ok(RegistrationOutcome::AlreadyInFlight) => view.minting = false,
            Err(e) => view.finish_mint(Err(e.user_message())),
        }
        result
    }

    /// Enter edit mode for a listed name owned by the session.
    pub async fn enter_edit(&self, name: &str) -> CoreResult<MintRecord> {
        let result = self.find_editable(name).await;
        let mut view = self.view.write().await;
        match &result {
            Ok(mint) => view.enter_edit(mint),
            Err(e) => view.show_error(e.user_message()),
        }
        result
    }

    async fn find_editable(&self, name: &str) -> CoreResult<MintRecord> {
        let mint = self
            .registry_reader
            .snapshot()
            .await
            .iter()
            .find(|m| m.name == name)
            .cloned()
            .ok_or_else(|| {
                CoreError::ValidationFailed(format!(
                    "{name}.{} is not registered",
                    self.ctx.settings.tld
                ))
            })?;
        self.record_edit_service.enter_edit(&mint).await?;
        Ok(mint)
    }

    pub async fn cancel_edit(&self) {
        self.view.write().await.cancel_edit();
    }

    /// Submit the form's record for the name being edited.
    ///
    /// Only the edit-mode target is ever written; the form's name is ignored.
    /// The loading flag is cleared on every outcome. A failure keeps edit mode
    /// and shows an error banner.
    pub async fn update_record(&self) -> CoreResult<RecordUpdateOutcome> {
        let (target, record) = {
            let mut view = self.view.write().await;
            if view.is_busy() {
                return Ok(RecordUpdateOutcome::AlreadyInFlight);
            }
            let Some(target) = view.edit_mode.target().map(str::to_string) else {
                view.show_error(NOT_EDITING);
                return Err(CoreError::ValidationFailed(NOT_EDITING.to_string()));
            };
            view.begin_update();
            (target, view.candidate.record.clone())
        };

        let result = self
            .record_edit_service
            .update_record(&target, &record)
            .await;

        let mut view = self.view.write().await;
        match &result {
            Ok(RecordUpdateOutcome::Updated { .. }) => view.finish_update(Ok(())),
            Ok(RecordUpdateOutcome::AlreadyInFlight) => view.loading = false,
            Err(e) => view.finish_update(Err(e.user_message())),
        }
        result
    }

    /// Reload the list now.
    pub async fn refresh_mints(&self) -> CoreResult<Arc<Vec<MintRecord>>> {
        self.registry_reader.refresh().await
    }

    /// Snapshot for rendering, with the latest list and workflow step merged in.
    pub async fn view(&self) -> ViewState {
        let mut view = self.view.read().await.clone();
        view.set_mints(self.registry_reader.snapshot().await);
        view.step = self.registration_service.step();
        view
    }

    async fn adopt_session(&self, session: Session) {
        let changed = {
            let mut view = self.view.write().await;
            let changed = view.session != session;
            view.reset_session(session.clone());
            changed
        };
        if changed {
            self.registry_reader.clear().await;
        }

        let on_required = session.network == Some(self.ctx.required_chain());
        if session.is_connected() && on_required {
            // Failures are logged by the reader
            let _ = self.registry_reader.refresh().await;
        }
    }
}

/// Re-runs discovery on chain changes without keeping the app alive.
struct AppReloader {
    app: Weak<AppState>,
}

#[async_trait::async_trait]
impl ContextReloader for AppReloader {
    async fn reload(&self, chain_id: ChainId) {
        let Some(app) = self.app.upgrade() else {
            return;
        };
        log::info!("[app] Reloading context for network {chain_id}");
        if let Err(e) = app.discover().await {
            log::error!("[app] Reload failed: {e}");
        }
        app.reloads.send_modify(|n| *n += 1);
    }
}

/// Builder for constructing `AppState`.
///
/// # Optional
/// - `wallet`: without one every wallet operation fails with
///   `CoreError::ProviderUnavailable`
/// - `registry`: required for minting, editing and listing
/// - `settings`: defaults to Polygon Mumbai, `pekked`, 2 s refresh delay
pub struct AppStateBuilder {
    wallet: Option<Arc<dyn WalletProvider>>,
    registry: Option<Arc<dyn RegistryContract>>,
    settings: ServiceSettings,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wallet: None,
            registry: None,
            settings: ServiceSettings::default(),
        }
    }

    #[must_use]
    pub fn wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    #[must_use]
    pub fn registry(mut self, registry: Arc<dyn RegistryContract>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationFailed` for unusable settings.
    pub fn build(self) -> CoreResult<Arc<AppState>> {
        if self.settings.fanout == 0 {
            return Err(CoreError::ValidationFailed(
                "fanout must be at least 1".to_string(),
            ));
        }
        if self.settings.tld.trim_start_matches('.').is_empty() {
            return Err(CoreError::ValidationFailed(
                "tld must not be empty".to_string(),
            ));
        }

        let required = self.settings.required_network.chain_id;
        let ctx = Arc::new(ServiceContext::new(
            self.wallet,
            self.registry,
            self.settings,
        ));

        let registry_reader = Arc::new(RegistryReader::new(Arc::clone(&ctx)));
        let session_service = SessionService::new(Arc::clone(&ctx));
        let network_gate = NetworkGate::new(Arc::clone(&ctx));
        let registration_service =
            RegistrationService::new(Arc::clone(&ctx), Arc::clone(&registry_reader));
        let record_edit_service =
            RecordEditService::new(Arc::clone(&ctx), Arc::clone(&registry_reader));

        Ok(Arc::new(AppState {
            ctx,
            session_service,
            network_gate,
            registry_reader,
            registration_service,
            record_edit_service,
            startup_completed: AtomicBool::new(false),
            view: RwLock::new(ViewState::new(required)),
            network_watch: Mutex::new(None),
            reloads: watch::channel(0).0,
        }))
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
