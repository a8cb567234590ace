//! Wallet and registry backends

mod domains;
#[cfg(feature = "json-rpc")]
mod json_rpc;

pub use domains::DomainsContract;
#[cfg(feature = "json-rpc")]
pub use json_rpc::JsonRpcWallet;
