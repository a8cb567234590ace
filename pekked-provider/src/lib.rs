//! # pekked-provider
//!
//! Boundary library between the pekked client and the outside world: the
//! user's wallet (account access, chain switching, signing) and the `Domains`
//! name-registry contract.
//!
//! ## Feature Flags
//!
//! - **`json-rpc`** *(default)*: [`JsonRpcWallet`], an HTTP JSON-RPC wallet
//!   speaking EIP-1193 method names.
//! - **`native-tls`** *(default)* / **`rustls`**: TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pekked_provider::{
//!     Address, DomainsContract, JsonRpcWallet, RegistryContract, WalletProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallet: Arc<dyn WalletProvider> = Arc::new(JsonRpcWallet::new("http://127.0.0.1:8545"));
//!     let accounts = wallet.request_accounts().await?;
//!     println!("connected as {}", accounts[0]);
//!
//!     let registry = DomainsContract::new(
//!         Address::parse("0x483c2979EFbaA88F0d14b18cE50f3bfd4cF3BbEB")?,
//!         wallet,
//!     );
//!     for name in registry.all_names().await? {
//!         println!("{name}: {}", registry.record(&name).await?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). The
//! wallet-facing variants callers usually branch on:
//!
//! - [`ProviderError::NotInstalled`]: no wallet configured
//! - [`ProviderError::UserRejected`]: EIP-1193 code 4001
//! - [`ProviderError::UnrecognizedChain`]: EIP-1193 code 4902
//!
//! Transient transport errors (`NetworkError`, `Timeout`, `RateLimited`) are
//! retried with exponential backoff, except for `eth_sendTransaction`.

pub mod abi;
mod error;
mod http_client;
pub mod networks;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use traits::{RegistryContract, WalletProvider};

pub use types::{
    Address, CallRequest, ChainDescriptor, ChainId, NativeCurrency, TransactionRequest, TxHash,
    TxReceipt, TxStatus, Wei,
};

pub use providers::DomainsContract;
#[cfg(feature = "json-rpc")]
pub use providers::JsonRpcWallet;

pub use utils::log_sanitizer;
