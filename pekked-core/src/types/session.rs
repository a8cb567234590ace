//! Session type definitions

use serde::{Deserialize, Serialize};

use pekked_provider::networks::network_name;
use pekked_provider::{Address, ChainId};

/// Local view of what the wallet currently exposes.
///
/// Rebuilt from the wallet on every start or reload, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Connected account
    pub address: Option<Address>,
    /// Network the wallet is on
    pub network: Option<ChainId>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// Display name of the current network, falling back to the hex id.
    pub fn network_name(&self) -> Option<String> {
        self.network
            .map(|id| network_name(id).map_or_else(|| id.to_hex(), str::to_string))
    }

    /// `0x1234...abcd` or `Not connected`.
    pub fn wallet_label(&self) -> String {
        self.address
            .as_ref()
            .map_or_else(|| "Not connected".to_string(), |a| format!("Wallet: {}", a.short()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session() {
        let session = Session::default();
        assert!(!session.is_connected());
        assert_eq!(session.network_name(), None);
        assert_eq!(session.wallet_label(), "Not connected");
    }

    #[test]
    fn labels_for_connected_session() {
        let session = Session {
            address: Some(Address::parse("0x483c2979EFbaA88F0d14b18cE50f3bfd4cF3BbEB").unwrap()),
            network: Some(ChainId(80_001)),
        };
        assert_eq!(session.wallet_label(), "Wallet: 0x483c...BbEB");
        assert_eq!(session.network_name().as_deref(), Some("Polygon Mumbai Testnet"));
    }

    #[test]
    fn unknown_network_falls_back_to_hex() {
        let session = Session {
            address: None,
            network: Some(ChainId(31_337)),
        };
        assert_eq!(session.network_name().as_deref(), Some("0x7a69"));
    }
}
