use serde::{Deserialize, Serialize};

/// Unified error type for wallet provider and registry contract operations.
///
/// Each variant carries a `provider` field naming the backend that produced it
/// (for example `json-rpc` or `domains`), plus variant-specific context. All
/// variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError)
/// - [`Timeout`](Self::Timeout)
/// - [`RateLimited`](Self::RateLimited)
///
/// The built-in RPC client retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// No wallet provider is installed or configured.
    NotInstalled {
        /// Provider that produced the error.
        provider: String,
    },

    /// The wallet has no authorized account to act on behalf of.
    NoAccount {
        /// Provider that produced the error.
        provider: String,
    },

    /// The user declined the request in the wallet (EIP-1193 code 4001).
    UserRejected {
        /// Provider that produced the error.
        provider: String,
        /// Original message from the wallet, if available.
        raw_message: Option<String>,
    },

    /// The wallet does not know the requested chain (EIP-1193 code 4902).
    UnrecognizedChain {
        /// Provider that produced the error.
        provider: String,
        /// Hex chain id that was requested.
        chain_id: String,
    },

    /// A network-level error occurred (connection refused, DNS failure, etc.).
    ///
    /// This is a transient error and is automatically retried.
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    ///
    /// This is a transient error and is automatically retried.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The endpoint rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The node rejected the call (execution reverted, insufficient funds, ...).
    Rpc {
        /// Provider that produced the error.
        provider: String,
        /// JSON-RPC error code.
        rpc_code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// A request parameter is invalid (malformed address, bad amount, ...).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse a response (JSON envelope or ABI payload).
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code, if available.
        raw_code: Option<String>,
        /// Raw error message.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether this is expected behavior (user choice, missing wallet, bad input),
    /// used for log classification.
    ///
    /// Use `warn` when this returns `true` and `error` otherwise.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotInstalled { .. }
                | Self::NoAccount { .. }
                | Self::UserRejected { .. }
                | Self::UnrecognizedChain { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether a retry of the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled { provider } => {
                write!(f, "[{provider}] No wallet provider available")
            }
            Self::NoAccount { provider } => {
                write!(f, "[{provider}] No authorized account")
            }
            Self::UserRejected {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Request rejected by user: {msg}")
                } else {
                    write!(f, "[{provider}] Request rejected by user")
                }
            }
            Self::UnrecognizedChain { provider, chain_id } => {
                write!(f, "[{provider}] Unrecognized chain {chain_id}")
            }
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Rpc {
                provider,
                rpc_code,
                message,
            } => {
                write!(f, "[{provider}] RPC error {rpc_code}: {message}")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_user_rejected_with_message() {
        let e = ProviderError::UserRejected {
            provider: "json-rpc".to_string(),
            raw_message: Some("User denied account authorization".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "[json-rpc] Request rejected by user: User denied account authorization"
        );
    }

    #[test]
    fn display_unrecognized_chain() {
        let e = ProviderError::UnrecognizedChain {
            provider: "json-rpc".to_string(),
            chain_id: "0x13881".to_string(),
        };
        assert_eq!(e.to_string(), "[json-rpc] Unrecognized chain 0x13881");
    }

    #[test]
    fn display_rpc() {
        let e = ProviderError::Rpc {
            provider: "json-rpc".to_string(),
            rpc_code: -32000,
            message: "insufficient funds for gas".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[json-rpc] RPC error -32000: insufficient funds for gas"
        );
    }

    #[test]
    fn expected_variants() {
        assert!(
            ProviderError::NotInstalled {
                provider: "t".into()
            }
            .is_expected()
        );
        assert!(
            ProviderError::UserRejected {
                provider: "t".into(),
                raw_message: None
            }
            .is_expected()
        );
        assert!(
            !ProviderError::Rpc {
                provider: "t".into(),
                rpc_code: 3,
                message: "execution reverted".into()
            }
            .is_expected()
        );
    }

    #[test]
    fn transient_variants() {
        assert!(
            ProviderError::Timeout {
                provider: "t".into(),
                detail: "d".into()
            }
            .is_transient()
        );
        assert!(
            !ProviderError::UnrecognizedChain {
                provider: "t".into(),
                chain_id: "0x1".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn serialize_carries_code_tag() {
        let e = ProviderError::UnrecognizedChain {
            provider: "json-rpc".to_string(),
            chain_id: "0x13881".to_string(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"UnrecognizedChain\""));
        assert!(json.contains("\"chain_id\":\"0x13881\""));
    }
}
