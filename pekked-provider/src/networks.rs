//! Known networks
//!
//! Display names for the chain ids wallets commonly report, and the full
//! descriptor of the Polygon Mumbai testnet the registry is deployed on.

use crate::types::{ChainDescriptor, ChainId, NativeCurrency};

/// Polygon Mumbai testnet chain id (`0x13881`).
pub const POLYGON_MUMBAI: ChainId = ChainId(80_001);

const KNOWN_NETWORKS: &[(u64, &str)] = &[
    (0x1, "Mainnet"),
    (0x3, "Ropsten"),
    (0x4, "Rinkeby"),
    (0x5, "Goerli"),
    (0x2a, "Kovan"),
    (0xaa36a7, "Sepolia"),
    (0x38, "BSC Mainnet"),
    (0x61, "BSC Testnet"),
    (0x89, "Polygon Mainnet"),
    (0x13881, "Polygon Mumbai Testnet"),
    (0xa86a, "AVAX Mainnet"),
];

/// Display name of a known chain.
pub fn network_name(chain_id: ChainId) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|(id, _)| *id == chain_id.0)
        .map(|(_, name)| *name)
}

/// Descriptor handed to `wallet_addEthereumChain` for Polygon Mumbai.
pub fn polygon_mumbai() -> ChainDescriptor {
    ChainDescriptor {
        chain_id: POLYGON_MUMBAI,
        chain_name: "Polygon Mumbai Testnet".to_string(),
        rpc_urls: vec!["https://rpc-mumbai.maticvigil.com/".to_string()],
        native_currency: NativeCurrency {
            name: "Mumbai Matic".to_string(),
            symbol: "MATIC".to_string(),
            decimals: 18,
        },
        block_explorer_urls: vec!["https://mumbai.polygonscan.com/".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names() {
        assert_eq!(network_name(ChainId(1)), Some("Mainnet"));
        assert_eq!(network_name(POLYGON_MUMBAI), Some("Polygon Mumbai Testnet"));
        assert_eq!(network_name(ChainId(31_337)), None);
    }

    #[test]
    fn mumbai_descriptor_matches_table() {
        let descriptor = polygon_mumbai();
        assert_eq!(descriptor.chain_id.to_hex(), "0x13881");
        assert_eq!(
            network_name(descriptor.chain_id),
            Some(descriptor.chain_name.as_str())
        );
    }
}
