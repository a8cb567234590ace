//! `WalletProvider` implementation over JSON-RPC

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::traits::{ErrorContext, ProviderErrorMapper, WalletProvider};
use crate::types::{
    Address, CallRequest, ChainDescriptor, ChainId, TransactionRequest, TxHash, TxReceipt, Wei,
};
use crate::utils::log_sanitizer::summarize_calldata;

use super::JsonRpcWallet;
use super::types::{RpcReceipt, transaction_params};

impl JsonRpcWallet {
    fn parse_accounts(&self, raw: Vec<String>) -> Result<Vec<Address>> {
        raw.iter()
            .map(|a| Address::parse(a).map_err(|e| self.parse_error(e)))
            .collect()
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    fn id(&self) -> &'static str {
        "json-rpc"
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let raw: Vec<String> = self
            .rpc_with_retries(
                "eth_requestAccounts",
                json!([]),
                ErrorContext::default(),
                0,
            )
            .await?;
        self.parse_accounts(raw)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        let raw: Vec<String> = self
            .rpc("eth_accounts", json!([]), ErrorContext::default())
            .await?;
        self.parse_accounts(raw)
    }

    async fn chain_id(&self) -> Result<ChainId> {
        self.fetch_chain_id().await
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<()> {
        let _: Value = self
            .rpc_with_retries(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain_id.to_hex() }]),
                ErrorContext {
                    chain_id: Some(chain_id),
                },
                0,
            )
            .await?;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<()> {
        let _: Value = self
            .rpc_with_retries(
                "wallet_addEthereumChain",
                json!([descriptor]),
                ErrorContext {
                    chain_id: Some(descriptor.chain_id),
                },
                0,
            )
            .await?;
        Ok(())
    }

    fn subscribe_chain_changed(&self) -> broadcast::Receiver<ChainId> {
        self.chain_events.subscribe()
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
        log::debug!(
            "[json-rpc] eth_sendTransaction to={} value={} data={}",
            tx.to.as_ref().map_or("<create>", Address::as_str),
            tx.value.unwrap_or_default(),
            summarize_calldata(&tx.data)
        );
        // a resent transaction could be mined twice
        let hash: String = self
            .rpc_with_retries(
                "eth_sendTransaction",
                json!([transaction_params(tx)]),
                ErrorContext::default(),
                0,
            )
            .await?;
        Ok(TxHash(hash))
    }

    async fn call(&self, req: &CallRequest) -> Result<Vec<u8>> {
        let raw: String = self
            .rpc(
                "eth_call",
                json!([
                    { "to": req.to.as_str(), "data": format!("0x{}", hex::encode(&req.data)) },
                    "latest"
                ]),
                ErrorContext::default(),
            )
            .await?;
        hex::decode(raw.trim_start_matches("0x")).map_err(|e| self.parse_error(e))
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>> {
        let raw: Option<RpcReceipt> = self
            .rpc(
                "eth_getTransactionReceipt",
                json!([hash.0]),
                ErrorContext::default(),
            )
            .await?;
        raw.map(RpcReceipt::into_receipt).transpose()
    }

    async fn balance(&self, address: &Address) -> Result<Wei> {
        let raw: String = self
            .rpc(
                "eth_getBalance",
                json!([address.as_str(), "latest"]),
                ErrorContext::default(),
            )
            .await?;
        Wei::from_hex(&raw)
    }
}
