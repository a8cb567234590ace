//! Test helper module
//!
//! Provides mock implementations and factory methods for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pekked_provider::{
    Address, CallRequest, ChainDescriptor, ChainId, ProviderError, RegistryContract,
    TransactionRequest, TxHash, TxReceipt, TxStatus, WalletProvider, Wei,
};
use tokio::sync::{broadcast, Notify, RwLock};

use crate::services::{
    RecordEditService, RegistrationService, RegistryReader, ServiceContext, ServiceSettings,
};
use crate::traits::ContextReloader;

pub fn session_address() -> Address {
    Address::parse("0x483c2979efbaa88f0d14b18ce50f3bfd4cf3bbeb").unwrap()
}

pub fn stranger() -> Address {
    Address::parse("0x1111111111111111111111111111111111111111").unwrap()
}

fn rejected() -> ProviderError {
    ProviderError::UserRejected {
        provider: "mock".into(),
        raw_message: Some("User denied transaction signature.".into()),
    }
}

// ===== MockWallet =====

pub struct MockWallet {
    accounts: RwLock<Vec<Address>>,
    chain: RwLock<ChainId>,
    request_accounts_error: RwLock<Option<ProviderError>>,
    switch_error: RwLock<Option<ProviderError>>,
    add_chain_error: RwLock<Option<ProviderError>>,
    switch_calls: RwLock<Vec<ChainId>>,
    added_chains: RwLock<Vec<ChainDescriptor>>,
    request_accounts_calls: AtomicUsize,
    total_calls: AtomicUsize,
    chain_events: broadcast::Sender<ChainId>,
}

impl MockWallet {
    pub fn on_chain(chain: ChainId) -> Self {
        let (chain_events, _) = broadcast::channel(16);
        Self {
            accounts: RwLock::new(vec![session_address()]),
            chain: RwLock::new(chain),
            request_accounts_error: RwLock::new(None),
            switch_error: RwLock::new(None),
            add_chain_error: RwLock::new(None),
            switch_calls: RwLock::new(Vec::new()),
            added_chains: RwLock::new(Vec::new()),
            request_accounts_calls: AtomicUsize::new(0),
            total_calls: AtomicUsize::new(0),
            chain_events,
        }
    }

    pub fn on_required_network() -> Self {
        Self::on_chain(ChainId(80_001))
    }

    pub async fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.write().await = accounts;
    }

    pub async fn set_chain(&self, chain: ChainId) {
        *self.chain.write().await = chain;
    }

    pub async fn set_request_accounts_error(&self, err: Option<ProviderError>) {
        *self.request_accounts_error.write().await = err;
    }

    pub async fn set_switch_error(&self, err: Option<ProviderError>) {
        *self.switch_error.write().await = err;
    }

    pub async fn set_add_chain_error(&self, err: Option<ProviderError>) {
        *self.add_chain_error.write().await = err;
    }

    pub async fn switch_calls(&self) -> Vec<ChainId> {
        self.switch_calls.read().await.clone()
    }

    pub async fn added_chains(&self) -> Vec<ChainDescriptor> {
        self.added_chains.read().await.clone()
    }

    pub fn request_accounts_calls(&self) -> usize {
        self.request_accounts_calls.load(Ordering::SeqCst)
    }

    /// Every trait method call, prompts and reads alike.
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    pub fn emit_chain_changed(&self, chain: ChainId) {
        let _ = self.chain_events.send(chain);
    }

    fn count(&self) {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn move_to(&self, chain: ChainId) {
        *self.chain.write().await = chain;
        self.emit_chain_changed(chain);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn request_accounts(&self) -> pekked_provider::Result<Vec<Address>> {
        self.count();
        self.request_accounts_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.request_accounts_error.read().await.clone() {
            return Err(err);
        }
        Ok(self.accounts.read().await.clone())
    }

    async fn accounts(&self) -> pekked_provider::Result<Vec<Address>> {
        self.count();
        Ok(self.accounts.read().await.clone())
    }

    async fn chain_id(&self) -> pekked_provider::Result<ChainId> {
        self.count();
        Ok(*self.chain.read().await)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> pekked_provider::Result<()> {
        self.count();
        self.switch_calls.write().await.push(chain_id);
        if let Some(err) = self.switch_error.read().await.clone() {
            return Err(err);
        }
        self.move_to(chain_id).await;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> pekked_provider::Result<()> {
        self.count();
        self.added_chains.write().await.push(descriptor.clone());
        if let Some(err) = self.add_chain_error.read().await.clone() {
            return Err(err);
        }
        self.move_to(descriptor.chain_id).await;
        Ok(())
    }

    fn subscribe_chain_changed(&self) -> broadcast::Receiver<ChainId> {
        self.chain_events.subscribe()
    }

    async fn send_transaction(&self, _tx: &TransactionRequest) -> pekked_provider::Result<TxHash> {
        self.count();
        Err(rejected())
    }

    async fn call(&self, _req: &CallRequest) -> pekked_provider::Result<Vec<u8>> {
        self.count();
        Ok(Vec::new())
    }

    async fn transaction_receipt(
        &self,
        _hash: &TxHash,
    ) -> pekked_provider::Result<Option<TxReceipt>> {
        self.count();
        Ok(None)
    }

    async fn balance(&self, _address: &Address) -> pekked_provider::Result<Wei> {
        self.count();
        Ok(Wei::ZERO)
    }
}

// ===== MockRegistry =====

/// How the mock registry treats the next transactions of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Mined with success status, state applied
    Confirm,
    /// Mined with failure status, state untouched
    Revert,
    /// The signature prompt is declined
    RejectSubmit,
    /// Submitted but waiting for the receipt fails
    NeverConfirm,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    record: String,
    owner: Address,
    paid: Wei,
}

/// In-memory registry; every write is signed by [`session_address`].
pub struct MockRegistry {
    address: Address,
    entries: RwLock<Vec<Entry>>,
    receipts: RwLock<HashMap<String, Option<TxStatus>>>,
    register_mode: RwLock<TxMode>,
    record_mode: RwLock<TxMode>,
    failing_owner_lookups: RwLock<Vec<String>>,
    register_gate: RwLock<Option<Arc<Notify>>>,
    register_calls: AtomicUsize,
    set_record_calls: AtomicUsize,
    next_tx: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            address: Address::parse("0x483c2979EFbaA88F0d14b18cE50f3bfd4cF3BbEB").unwrap(),
            entries: RwLock::new(Vec::new()),
            receipts: RwLock::new(HashMap::new()),
            register_mode: RwLock::new(TxMode::Confirm),
            record_mode: RwLock::new(TxMode::Confirm),
            failing_owner_lookups: RwLock::new(Vec::new()),
            register_gate: RwLock::new(None),
            register_calls: AtomicUsize::new(0),
            set_record_calls: AtomicUsize::new(0),
            next_tx: AtomicUsize::new(1),
        }
    }

    pub async fn seed(&self, name: &str, record: &str, owner: Address) {
        self.entries.write().await.push(Entry {
            name: name.to_string(),
            record: record.to_string(),
            owner,
            paid: Wei::ZERO,
        });
    }

    pub async fn set_register_mode(&self, mode: TxMode) {
        *self.register_mode.write().await = mode;
    }

    pub async fn set_record_mode(&self, mode: TxMode) {
        *self.record_mode.write().await = mode;
    }

    pub async fn fail_owner_lookup(&self, name: &str) {
        self.failing_owner_lookups.write().await.push(name.to_string());
    }

    /// Make the next `register` calls block until the returned handle is notified.
    pub async fn hold_register(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.register_gate.write().await = Some(Arc::clone(&gate));
        gate
    }

    pub async fn wait_for_register_calls(&self, n: usize) {
        while self.register_calls() < n {
            tokio::task::yield_now().await;
        }
    }

    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub fn set_record_calls(&self) -> usize {
        self.set_record_calls.load(Ordering::SeqCst)
    }

    pub async fn paid_for(&self, name: &str) -> Option<Wei> {
        self.find(name).await.map(|e| e.paid)
    }

    pub async fn owner_of(&self, name: &str) -> Option<Address> {
        self.find(name).await.map(|e| e.owner)
    }

    pub async fn record_of(&self, name: &str) -> Option<String> {
        self.find(name).await.map(|e| e.record)
    }

    async fn find(&self, name: &str) -> Option<Entry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.name == name)
            .cloned()
    }

    async fn submit(&self, mode: TxMode) -> pekked_provider::Result<TxHash> {
        let status = match mode {
            TxMode::RejectSubmit => return Err(rejected()),
            TxMode::Confirm => Some(TxStatus::Success),
            TxMode::Revert => Some(TxStatus::Failed),
            TxMode::NeverConfirm => None,
        };
        let n = self.next_tx.fetch_add(1, Ordering::SeqCst);
        let hash = format!("0x{n:064x}");
        self.receipts.write().await.insert(hash.clone(), status);
        Ok(TxHash(hash))
    }
}

#[async_trait]
impl RegistryContract for MockRegistry {
    fn address(&self) -> &Address {
        &self.address
    }

    async fn register(&self, name: &str, value: Wei) -> pekked_provider::Result<TxHash> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.register_gate.read().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mode = *self.register_mode.read().await;
        let hash = self.submit(mode).await?;
        if mode == TxMode::Confirm {
            self.entries.write().await.push(Entry {
                name: name.to_string(),
                record: String::new(),
                owner: session_address(),
                paid: value,
            });
        }
        Ok(hash)
    }

    async fn set_record(&self, name: &str, record: &str) -> pekked_provider::Result<TxHash> {
        self.set_record_calls.fetch_add(1, Ordering::SeqCst);
        let mode = *self.record_mode.read().await;
        let hash = self.submit(mode).await?;
        if mode == TxMode::Confirm {
            if let Some(entry) = self
                .entries
                .write()
                .await
                .iter_mut()
                .find(|e| e.name == name)
            {
                entry.record = record.to_string();
            }
        }
        Ok(hash)
    }

    async fn wait(&self, hash: &TxHash) -> pekked_provider::Result<TxReceipt> {
        let status = self.receipts.read().await.get(&hash.0).copied().flatten();
        match status {
            Some(status) => Ok(TxReceipt {
                transaction_hash: hash.clone(),
                status,
                block_number: Some(1),
                contract_address: None,
            }),
            None => Err(ProviderError::Timeout {
                provider: "mock".into(),
                detail: format!("{hash} was never mined"),
            }),
        }
    }

    async fn all_names(&self) -> pekked_provider::Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|e| e.name.clone())
            .collect())
    }

    async fn record(&self, name: &str) -> pekked_provider::Result<String> {
        Ok(self.find(name).await.map(|e| e.record).unwrap_or_default())
    }

    async fn owner(&self, name: &str) -> pekked_provider::Result<Address> {
        if self
            .failing_owner_lookups
            .read()
            .await
            .iter()
            .any(|n| n == name)
        {
            return Err(ProviderError::NetworkError {
                provider: "mock".into(),
                detail: "connection reset".into(),
            });
        }
        Ok(self
            .find(name)
            .await
            .map_or_else(|| Address::from_bytes([0; 20]), |e| e.owner))
    }
}

// ===== RecordingReloader =====

#[derive(Default)]
pub struct RecordingReloader {
    seen: RwLock<Vec<ChainId>>,
    notify: Notify,
}

impl RecordingReloader {
    pub async fn seen(&self) -> Vec<ChainId> {
        self.seen.read().await.clone()
    }

    pub async fn wait_for(&self, n: usize) {
        while self.seen.read().await.len() < n {
            self.notify.notified().await;
        }
    }
}

#[async_trait]
impl ContextReloader for RecordingReloader {
    async fn reload(&self, chain_id: ChainId) {
        self.seen.write().await.push(chain_id);
        self.notify.notify_one();
    }
}

// ===== Factories =====

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        refresh_delay: Duration::ZERO,
        ..ServiceSettings::default()
    }
}

pub fn create_test_context(
    wallet: Option<Arc<MockWallet>>,
) -> (Arc<ServiceContext>, Arc<MockRegistry>) {
    let registry = Arc::new(MockRegistry::new());
    let ctx = Arc::new(ServiceContext::new(
        wallet.map(|w| w as Arc<dyn WalletProvider>),
        Some(registry.clone() as Arc<dyn RegistryContract>),
        test_settings(),
    ));
    (ctx, registry)
}

pub fn create_registration_service(
    wallet: Arc<MockWallet>,
) -> (RegistrationService, Arc<MockRegistry>, Arc<RegistryReader>) {
    let (ctx, registry) = create_test_context(Some(wallet));
    let reader = Arc::new(RegistryReader::new(Arc::clone(&ctx)));
    let svc = RegistrationService::new(ctx, Arc::clone(&reader));
    (svc, registry, reader)
}

pub fn create_record_edit_service(
    wallet: Arc<MockWallet>,
) -> (RecordEditService, Arc<MockRegistry>) {
    let (ctx, registry) = create_test_context(Some(wallet));
    let reader = Arc::new(RegistryReader::new(Arc::clone(&ctx)));
    (RecordEditService::new(ctx, reader), registry)
}
