//! Shared helpers for tests against a live JSON-RPC node

#![allow(dead_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use pekked_provider::{Address, DomainsContract, JsonRpcWallet, WalletProvider};

/// Skip the test when a required environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_node {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: {} is not set", $var);
                return;
            }
        )+
    };
}

/// Assert `Ok` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const RPC_URL_VAR: &str = "PEKKED_TEST_RPC_URL";
pub const CONTRACT_VAR: &str = "PEKKED_TEST_CONTRACT";

/// Wallet endpoint plus an optional deployed registry.
pub struct TestContext {
    pub wallet: Arc<JsonRpcWallet>,
    pub contract: Option<DomainsContract>,
}

impl TestContext {
    pub fn from_env() -> Option<Self> {
        let url = env::var(RPC_URL_VAR).ok()?;
        let wallet = Arc::new(JsonRpcWallet::new(url).with_max_retries(1));

        let contract = env::var(CONTRACT_VAR)
            .ok()
            .and_then(|raw| Address::parse(&raw).ok())
            .map(|address| {
                DomainsContract::new(address, Arc::clone(&wallet) as Arc<dyn WalletProvider>)
                    .with_poll_interval(Duration::from_millis(500))
            });

        Some(Self { wallet, contract })
    }
}
