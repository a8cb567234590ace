//! JSON-RPC wallet and registry tests against a live node
//!
//! Run with:
//! ```bash
//! PEKKED_TEST_RPC_URL=http://127.0.0.1:8545 PEKKED_TEST_CONTRACT=0x... \
//!     cargo test -p pekked-provider --test json_rpc_test -- --ignored --nocapture --test-threads=1
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use common::{CONTRACT_VAR, RPC_URL_VAR, TestContext};
use pekked_provider::{RegistryContract, WalletProvider};

#[tokio::test]
#[ignore]
async fn test_json_rpc_chain_id() {
    skip_if_no_node!(RPC_URL_VAR);

    let ctx = TestContext::from_env().expect("failed to build test context");
    let chain_id = require_ok!(ctx.wallet.chain_id().await, "eth_chainId failed");
    assert!(chain_id.0 > 0);

    println!("chain id {chain_id}");
}

#[tokio::test]
#[ignore]
async fn test_json_rpc_accounts_have_balance() {
    skip_if_no_node!(RPC_URL_VAR);

    let ctx = TestContext::from_env().expect("failed to build test context");
    let accounts = require_ok!(ctx.wallet.accounts().await, "eth_accounts failed");
    let Some(first) = accounts.first() else {
        eprintln!("skipping: node exposes no accounts");
        return;
    };

    let balance = require_ok!(ctx.wallet.balance(first).await, "eth_getBalance failed");
    println!("{} holds {}", first.short(), balance.format_ether());
}

#[tokio::test]
#[ignore]
async fn test_json_rpc_registry_listing() {
    skip_if_no_node!(RPC_URL_VAR, CONTRACT_VAR);

    let ctx = TestContext::from_env().expect("failed to build test context");
    let contract = ctx.contract.expect("invalid contract address");

    let names = require_ok!(contract.all_names().await, "getAllNames failed");
    for name in names.iter().take(5) {
        let owner = require_ok!(contract.owner(name).await, "owner lookup failed");
        let record = require_ok!(contract.record(name).await, "record lookup failed");
        println!("{name}: {record:?} ({})", owner.short());
    }

    println!("{} names registered", names.len());
}
