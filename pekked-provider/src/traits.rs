use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::{ProviderError, Result};
use crate::types::{
    Address, CallRequest, ChainDescriptor, ChainId, TransactionRequest, TxHash, TxReceipt, Wei,
};

/// Raw wallet/RPC error (internal).
#[derive(Debug, Clone)]
pub(crate) struct RawRpcError {
    /// JSON-RPC or EIP-1193 error code.
    pub code: i64,
    /// Original error message.
    pub message: String,
}

impl RawRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Extra information used while mapping errors (internal).
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Chain id involved in the request (for `UnrecognizedChain`).
    pub chain_id: Option<ChainId>,
}

/// Error mapping trait (internal).
/// Backends implement this to translate raw RPC errors into [`ProviderError`].
pub(crate) trait ProviderErrorMapper {
    /// Backend identifier.
    fn provider_name(&self) -> &'static str;

    /// Map a raw RPC error into the unified error type.
    fn map_error(&self, raw: RawRpcError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error.
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: fallback RPC error.
    fn rpc_error(&self, raw: RawRpcError) -> ProviderError {
        ProviderError::Rpc {
            provider: self.provider_name().to_string(),
            rpc_code: raw.code,
            message: raw.message,
        }
    }
}

/// Wallet provider trait
///
/// Mirrors the EIP-1193 surface a browser wallet exposes: account access,
/// chain inspection and switching, plus the transaction plumbing the registry
/// binding needs. Signing happens inside the wallet; callers only see hashes.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Backend identifier.
    fn id(&self) -> &'static str;

    /// Ask the user to authorize accounts (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Already authorized accounts, without prompting (`eth_accounts`).
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Currently selected chain (`eth_chainId`).
    async fn chain_id(&self) -> Result<ChainId>;

    /// Ask the wallet to switch chains (`wallet_switchEthereumChain`).
    ///
    /// Fails with [`ProviderError::UnrecognizedChain`] when the wallet does not
    /// know `chain_id`.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<()>;

    /// Ask the wallet to add a chain (`wallet_addEthereumChain`).
    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<()>;

    /// Subscribe to `chainChanged` notifications.
    fn subscribe_chain_changed(&self) -> broadcast::Receiver<ChainId>;

    /// Submit a transaction for signing (`eth_sendTransaction`).
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash>;

    /// Execute a read-only call (`eth_call`) and return the raw return data.
    async fn call(&self, req: &CallRequest) -> Result<Vec<u8>>;

    /// Receipt of a mined transaction, `None` while pending.
    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>>;

    /// Native balance of an address (`eth_getBalance`).
    async fn balance(&self, address: &Address) -> Result<Wei>;

    /// Poll until the transaction is mined.
    ///
    /// No deadline of its own; transport errors end the wait.
    async fn wait_for_receipt(&self, hash: &TxHash, poll_interval: Duration) -> Result<TxReceipt> {
        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            log::debug!("[{}] Transaction {hash} pending", self.id());
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Name registry contract trait
///
/// The on-ledger program that stores names, their owners and text records.
#[async_trait]
pub trait RegistryContract: Send + Sync {
    /// Deployed contract address.
    fn address(&self) -> &Address;

    /// Reserve `name`, paying `value` (`register(string) payable`).
    async fn register(&self, name: &str, value: Wei) -> Result<TxHash>;

    /// Write the text record of `name` (`setRecord(string,string)`).
    async fn set_record(&self, name: &str, record: &str) -> Result<TxHash>;

    /// Wait for a submitted transaction to be mined.
    async fn wait(&self, hash: &TxHash) -> Result<TxReceipt>;

    /// All registered names in registration order (`getAllNames()`).
    async fn all_names(&self) -> Result<Vec<String>>;

    /// Text record of `name` (`records(string)`).
    async fn record(&self, name: &str) -> Result<String>;

    /// Owner of `name` (`domains(string)`).
    async fn owner(&self, name: &str) -> Result<Address>;
}
