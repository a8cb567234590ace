//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use pekked_provider::ProviderError;

/// Message shown when a candidate name is too short.
pub const NAME_TOO_SHORT: &str = "Domain must be at least 3 characters long";
/// Message shown when a record update is missing its name or text.
pub const EMPTY_FIELD: &str = "Domain and record must not be empty";
/// Generic retry prompt for transaction-stage failures.
pub const TRANSACTION_FAILED: &str = "Transaction failed! Please try again";
/// Message shown when a record update is requested outside edit mode.
pub const NOT_EDITING: &str = "Select one of your domains to edit first";

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// No wallet provider is present
    #[error("No wallet provider available")]
    ProviderUnavailable,

    /// The user declined the wallet prompt
    #[error("Request rejected in wallet")]
    UserRejected,

    /// The wallet does not know the requested network
    #[error("Network {0} is not known to the wallet")]
    UnrecognizedNetwork(String),

    /// No account is connected
    #[error("Wallet not connected")]
    NotConnected,

    /// The wallet is on another network than the required one
    #[error("Wrong network: expected {expected}, wallet is on {actual}")]
    WrongNetwork { expected: String, actual: String },

    /// Input rejected before any transaction was submitted
    #[error("{0}")]
    ValidationFailed(String),

    /// Edit attempted on a name the session does not own
    #[error("{0} is not owned by the connected account")]
    NotOwner(String),

    /// The transaction was mined with a failure status
    #[error("Transaction {0} reverted")]
    TransactionReverted(String),

    /// Waiting for the receipt failed
    #[error("Transaction not confirmed: {0}")]
    TransactionNeverConfirmed(String),

    /// Loading the registered names failed
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    /// Any other provider error
    #[error("{0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotInstalled { .. } => Self::ProviderUnavailable,
            ProviderError::UserRejected { .. } => Self::UserRejected,
            ProviderError::UnrecognizedChain { chain_id, .. } => Self::UnrecognizedNetwork(chain_id),
            ProviderError::NoAccount { .. } => Self::NotConnected,
            other => Self::Provider(other),
        }
    }
}

impl CoreError {
    /// Whether it is expected behavior (user input, user choice, gating), used
    /// for log classification.
    ///
    /// Use `warn` when this returns `true` and `error` when it returns `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ProviderUnavailable
            | Self::UserRejected
            | Self::UnrecognizedNetwork(_)
            | Self::NotConnected
            | Self::WrongNetwork { .. }
            | Self::ValidationFailed(_)
            | Self::NotOwner(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Whether the failure happened while submitting or confirming a transaction.
    #[must_use]
    pub fn is_transaction_failure(&self) -> bool {
        matches!(
            self,
            Self::UserRejected
                | Self::TransactionReverted(_)
                | Self::TransactionNeverConfirmed(_)
                | Self::Provider(_)
        )
    }

    /// Text for the error banner.
    ///
    /// Transaction-stage failures collapse into one retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_transaction_failure() {
            TRANSACTION_FAILED.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
