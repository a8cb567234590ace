//! JSON-RPC wire types

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::types::{Address, TransactionRequest, TxHash, TxReceipt, TxStatus};

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// JSON-RPC 2.0 response envelope
///
/// `result` is kept as raw JSON; a missing or `null` result is decoded by
/// the caller's type (a pending receipt decodes to `None`).
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `eth_getTransactionReceipt` result
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    /// `0x1` success, `0x0` failure; absent on pre-Byzantium chains.
    pub status: Option<String>,
    pub block_number: Option<String>,
    pub contract_address: Option<String>,
}

impl RpcReceipt {
    pub fn into_receipt(self) -> Result<TxReceipt> {
        let status = match self.status.as_deref() {
            Some("0x0") => TxStatus::Failed,
            _ => TxStatus::Success,
        };
        let block_number = self
            .block_number
            .as_deref()
            .and_then(|n| u64::from_str_radix(n.trim_start_matches("0x"), 16).ok());
        let contract_address = self
            .contract_address
            .as_deref()
            .map(Address::parse)
            .transpose()?;

        Ok(TxReceipt {
            transaction_hash: TxHash(self.transaction_hash),
            status,
            block_number,
            contract_address,
        })
    }
}

/// `eth_sendTransaction` parameter object.
pub fn transaction_params(tx: &TransactionRequest) -> Value {
    let mut object = serde_json::Map::new();
    if let Some(from) = &tx.from {
        object.insert("from".to_string(), json!(from.as_str()));
    }
    if let Some(to) = &tx.to {
        object.insert("to".to_string(), json!(to.as_str()));
    }
    if let Some(value) = tx.value {
        object.insert("value".to_string(), json!(value.to_hex()));
    }
    object.insert(
        "data".to_string(),
        json!(format!("0x{}", hex::encode(&tx.data))),
    );
    Value::Object(object)
}
