//! JSON-RPC request execution

use std::sync::atomic::Ordering;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawRpcError};
use crate::types::ChainId;

use super::JsonRpcWallet;
use super::types::{RpcRequest, RpcResponse};

impl JsonRpcWallet {
    /// Execute an idempotent JSON-RPC call (retried on transient failures).
    pub(crate) async fn rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        context: ErrorContext,
    ) -> Result<T> {
        self.rpc_with_retries(method, params, context, self.max_retries)
            .await
    }

    /// Execute a JSON-RPC call with an explicit retry budget.
    pub(crate) async fn rpc_with_retries<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        context: ErrorContext,
        max_retries: u32,
    ) -> Result<T> {
        if self.url.trim().is_empty() {
            return Err(ProviderError::NotInstalled {
                provider: self.provider_name().to_string(),
            });
        }

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let builder = self.client.post(&self.url).json(&request);
        let (status_code, body) = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            method,
            max_retries,
        )
        .await?;

        let response: RpcResponse = match HttpUtils::parse_json(&body, self.provider_name()) {
            Ok(response) => response,
            Err(_) if status_code >= 400 => {
                return Err(ProviderError::Unknown {
                    provider: self.provider_name().to_string(),
                    raw_code: Some(status_code.to_string()),
                    raw_message: format!("{method} failed with HTTP {status_code}"),
                });
            }
            Err(e) => return Err(e),
        };

        if let Some(error) = response.error {
            log::debug!(
                "[{}] {method} returned error {}: {}",
                self.provider_name(),
                error.code,
                error.message
            );
            return Err(self.map_error(RawRpcError::new(error.code, error.message), context));
        }

        serde_json::from_value(response.result.unwrap_or(Value::Null))
            .map_err(|e| self.parse_error(format!("{method}: {e}")))
    }

    /// `eth_chainId`, used by both the trait and the chain watcher.
    pub(crate) async fn fetch_chain_id(&self) -> Result<ChainId> {
        let raw: String = self
            .rpc("eth_chainId", Value::Array(vec![]), ErrorContext::default())
            .await?;
        ChainId::parse(&raw).map_err(|e| self.parse_error(e))
    }
}
