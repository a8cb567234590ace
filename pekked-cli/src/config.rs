//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use pekked_core::ServiceSettings;
use pekked_provider::networks::polygon_mumbai;
use pekked_provider::{Address, ChainDescriptor, ChainId, NativeCurrency};
use serde::Deserialize;

/// Registry deployed on Polygon Mumbai.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x483c2979EFbaA88F0d14b18cE50f3bfd4cF3BbEB";

/// `config.toml` contents. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON-RPC endpoint of the signing wallet; empty means no wallet
    pub rpc_url: String,
    pub contract_address: String,
    pub tld: String,
    pub refresh_delay_ms: u64,
    pub receipt_poll_ms: u64,
    /// `eth_chainId` poll period of `watch`
    pub chain_poll_ms: u64,
    pub max_retries: u32,
    pub fanout: usize,
    pub network: NetworkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            tld: "pekked".to_string(),
            refresh_delay_ms: 2000,
            receipt_poll_ms: 1000,
            chain_poll_ms: 2000,
            max_retries: 3,
            fanout: 8,
            network: NetworkConfig::default(),
        }
    }
}

/// Required network, as handed to `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Hex (`0x13881`) or decimal
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub currency_name: String,
    pub currency_symbol: String,
    pub decimals: u8,
    pub explorer_urls: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mumbai = polygon_mumbai();
        Self {
            chain_id: mumbai.chain_id.to_hex(),
            chain_name: mumbai.chain_name,
            rpc_urls: mumbai.rpc_urls,
            currency_name: mumbai.native_currency.name,
            currency_symbol: mumbai.native_currency.symbol,
            decimals: mumbai.native_currency.decimals,
            explorer_urls: mumbai.block_explorer_urls,
        }
    }
}

impl NetworkConfig {
    pub fn descriptor(&self) -> Result<ChainDescriptor> {
        let chain_id = ChainId::parse(&self.chain_id)
            .with_context(|| format!("invalid network.chain_id {:?}", self.chain_id))?;
        Ok(ChainDescriptor {
            chain_id,
            chain_name: self.chain_name.clone(),
            rpc_urls: self.rpc_urls.clone(),
            native_currency: NativeCurrency {
                name: self.currency_name.clone(),
                symbol: self.currency_symbol.clone(),
                decimals: self.decimals,
            },
            block_explorer_urls: self.explorer_urls.clone(),
        })
    }
}

impl Config {
    /// Load a single file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn settings(&self) -> Result<ServiceSettings> {
        Ok(ServiceSettings {
            required_network: self.network.descriptor()?,
            tld: self.tld.clone(),
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
            fanout: self.fanout,
        })
    }

    pub fn contract_address(&self) -> Result<Address> {
        Address::parse(&self.contract_address)
            .with_context(|| format!("invalid contract_address {:?}", self.contract_address))
    }

    pub fn receipt_poll(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }

    pub fn chain_poll(&self) -> Duration {
        Duration::from_millis(self.chain_poll_ms)
    }
}

/// `<config dir>/pekked/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pekked").join("config.toml"))
}

/// Load from the explicit path, the user config file, or defaults.
///
/// An explicit path must exist; the user config file is optional.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }
    match default_path() {
        Some(path) if path.exists() => Config::load(&path),
        _ => Ok(Config::default()),
    }
}

/// Apply command-line / environment overrides (`--rpc-url`, `PEKKED_RPC_URL`).
pub fn with_overrides(mut config: Config, rpc_url: Option<String>) -> Config {
    if let Some(url) = rpc_url {
        config.rpc_url = url.trim().to_string();
    }
    config
}
