//! JSON-RPC / EIP-1193 error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawRpcError};

use super::JsonRpcWallet;

/// User rejected the request.
const USER_REJECTED: i64 = 4001;
/// Requested method or account not authorized.
const UNAUTHORIZED: i64 = 4100;
/// Chain has not been added to the wallet.
const UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC internal error; some wallets wrap 4902 in it.
const INTERNAL_ERROR: i64 = -32603;
/// JSON-RPC invalid params.
const INVALID_PARAMS: i64 = -32602;

/// EIP-1193 provider error codes
/// Reference: <https://eips.ethereum.org/EIPS/eip-1193#provider-errors>
impl ProviderErrorMapper for JsonRpcWallet {
    fn provider_name(&self) -> &'static str {
        "json-rpc"
    }

    fn map_error(&self, raw: RawRpcError, context: ErrorContext) -> ProviderError {
        match raw.code {
            USER_REJECTED => ProviderError::UserRejected {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            UNAUTHORIZED => ProviderError::NoAccount {
                provider: self.provider_name().to_string(),
            },

            UNRECOGNIZED_CHAIN => self.unrecognized_chain(&context),

            INTERNAL_ERROR if raw.message.to_lowercase().contains("unrecognized chain") => {
                self.unrecognized_chain(&context)
            }

            INVALID_PARAMS => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "params".to_string(),
                detail: raw.message,
            },

            _ => self.rpc_error(raw),
        }
    }
}

impl JsonRpcWallet {
    fn unrecognized_chain(&self, context: &ErrorContext) -> ProviderError {
        ProviderError::UnrecognizedChain {
            provider: self.provider_name().to_string(),
            chain_id: context
                .chain_id
                .map_or_else(|| "<unknown>".to_string(), |id| id.to_hex()),
        }
    }
}
