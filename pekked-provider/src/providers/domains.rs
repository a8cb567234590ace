//! `Domains` registry contract binding
//!
//! Encodes calls with the minimal ABI codec and routes them through a
//! [`WalletProvider`], so signing stays with the wallet.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::abi::{self, AbiError, Token};
use crate::error::{ProviderError, Result};
use crate::traits::{RegistryContract, WalletProvider};
use crate::types::{Address, CallRequest, TransactionRequest, TxHash, TxReceipt, Wei};

const REGISTER: &str = "register(string)";
const SET_RECORD: &str = "setRecord(string,string)";
const GET_ALL_NAMES: &str = "getAllNames()";
const RECORDS: &str = "records(string)";
const DOMAINS: &str = "domains(string)";

/// Default receipt poll interval
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// `Domains` contract bound to a wallet
pub struct DomainsContract {
    address: Address,
    wallet: Arc<dyn WalletProvider>,
    poll_interval: Duration,
}

impl DomainsContract {
    pub fn new(address: Address, wallet: Arc<dyn WalletProvider>) -> Self {
        Self {
            address,
            wallet,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Deploy the contract with its top-level namespace and wait for the
    /// creation receipt.
    ///
    /// `bytecode` is the compiled creation code; the constructor takes the
    /// namespace as its only `string` argument.
    pub async fn deploy(
        wallet: Arc<dyn WalletProvider>,
        bytecode: &[u8],
        tld: &str,
        poll_interval: Duration,
    ) -> Result<(Self, TxReceipt)> {
        let from = first_account(wallet.as_ref()).await?;
        let mut data = bytecode.to_vec();
        data.extend(abi::encode(&[Token::String(tld.to_string())]));

        let hash = wallet
            .send_transaction(&TransactionRequest {
                from: Some(from),
                to: None,
                value: None,
                data,
            })
            .await?;
        log::info!("[domains] Deploy submitted: {hash}");

        let receipt = wallet.wait_for_receipt(&hash, poll_interval).await?;
        let address = match (&receipt.contract_address, receipt.is_success()) {
            (Some(address), true) => address.clone(),
            _ => {
                return Err(ProviderError::Rpc {
                    provider: "domains".to_string(),
                    rpc_code: 0,
                    message: format!("deployment {hash} did not create a contract"),
                });
            }
        };

        let contract = Self::new(address, wallet).with_poll_interval(poll_interval);
        Ok((contract, receipt))
    }

    async fn transact(&self, data: Vec<u8>, value: Option<Wei>) -> Result<TxHash> {
        // the signer is whatever account the wallet exposes right now
        let from = first_account(self.wallet.as_ref()).await?;
        self.wallet
            .send_transaction(&TransactionRequest {
                from: Some(from),
                to: Some(self.address.clone()),
                value,
                data,
            })
            .await
    }

    async fn view(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        self.wallet
            .call(&CallRequest {
                to: self.address.clone(),
                data,
            })
            .await
    }
}

async fn first_account(wallet: &dyn WalletProvider) -> Result<Address> {
    wallet
        .accounts()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NoAccount {
            provider: wallet.id().to_string(),
        })
}

fn abi_error(e: AbiError) -> ProviderError {
    ProviderError::ParseError {
        provider: "domains".to_string(),
        detail: e.to_string(),
    }
}

#[async_trait]
impl RegistryContract for DomainsContract {
    fn address(&self) -> &Address {
        &self.address
    }

    async fn register(&self, name: &str, value: Wei) -> Result<TxHash> {
        let data = abi::encode_call(REGISTER, &[Token::String(name.to_string())]);
        self.transact(data, Some(value)).await
    }

    async fn set_record(&self, name: &str, record: &str) -> Result<TxHash> {
        let data = abi::encode_call(
            SET_RECORD,
            &[
                Token::String(name.to_string()),
                Token::String(record.to_string()),
            ],
        );
        self.transact(data, None).await
    }

    async fn wait(&self, hash: &TxHash) -> Result<TxReceipt> {
        self.wallet.wait_for_receipt(hash, self.poll_interval).await
    }

    async fn all_names(&self) -> Result<Vec<String>> {
        let raw = self.view(abi::encode_call(GET_ALL_NAMES, &[])).await?;
        abi::decode_string_array(&raw).map_err(abi_error)
    }

    async fn record(&self, name: &str) -> Result<String> {
        let raw = self
            .view(abi::encode_call(RECORDS, &[Token::String(name.to_string())]))
            .await?;
        abi::decode_string(&raw).map_err(abi_error)
    }

    async fn owner(&self, name: &str) -> Result<Address> {
        let raw = self
            .view(abi::encode_call(DOMAINS, &[Token::String(name.to_string())]))
            .await?;
        abi::decode_address(&raw).map_err(abi_error)
    }
}
