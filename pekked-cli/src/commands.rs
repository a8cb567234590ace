//! Command handlers

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use pekked_app::{AppState, AppStateBuilder, NoopStartupHooks, StartupHooks};
use pekked_core::services::{price, RecordUpdateOutcome, RecordWrite, RegistrationOutcome};
use pekked_core::types::{MintRecord, Screen, Session, ViewState, Wei};
use pekked_provider::{Address, DomainsContract, JsonRpcWallet, RegistryContract, WalletProvider};

use crate::cli::Commands;
use crate::config::Config;

const SAMPLE_NAME: &str = "builder";
const SAMPLE_RECORD: &str = "I build things!";

/// Logs startup events for the terminal.
struct CliHooks;

#[async_trait::async_trait]
impl StartupHooks for CliHooks {
    async fn wallet_missing(&self) {
        tracing::warn!("No wallet available at the configured rpc_url");
    }

    async fn session_restored(&self, session: &Session) {
        tracing::debug!("Session restored: {session:?}");
    }
}

struct Runtime {
    app: Arc<AppState>,
    wallet: Option<Arc<JsonRpcWallet>>,
    contract: Address,
}

fn build_runtime(config: &Config) -> Result<Runtime> {
    let contract = config.contract_address()?;
    let mut builder = AppStateBuilder::new().settings(config.settings()?);

    let wallet = if config.rpc_url.is_empty() {
        None
    } else {
        let wallet =
            Arc::new(JsonRpcWallet::new(config.rpc_url.clone()).with_max_retries(config.max_retries));
        let registry = DomainsContract::new(
            contract.clone(),
            Arc::clone(&wallet) as Arc<dyn WalletProvider>,
        )
        .with_poll_interval(config.receipt_poll());
        builder = builder
            .wallet(Arc::clone(&wallet) as Arc<dyn WalletProvider>)
            .registry(Arc::new(registry));
        Some(wallet)
    };

    let app = builder.build()?;
    Ok(Runtime {
        app,
        wallet,
        contract,
    })
}

pub async fn run(command: Commands, config: &Config) -> Result<()> {
    if let Commands::Price { name } = &command {
        let fee = price(name)?;
        println!("{name}.{}: {} MATIC", config.tld, fee.format_ether());
        return Ok(());
    }
    if let Commands::Deploy { bytecode, fee } = &command {
        let fee = Wei::from_ether(fee).with_context(|| format!("invalid fee {fee:?}"))?;
        return deploy(config, bytecode, fee).await;
    }

    let rt = build_runtime(config)?;
    let app = &rt.app;

    match command {
        Commands::Status => {
            app.run_startup(&CliHooks).await?;
            print_view(&app.view().await, config, &rt.contract);
        }
        Commands::Connect => {
            let session = app.connect().await?;
            println!("{}", session.wallet_label());
        }
        Commands::SwitchNetwork => {
            let outcome = app.switch_network().await?;
            println!("{outcome:?}");
        }
        Commands::Mint { name, record } => {
            require_form(app).await?;
            app.set_candidate(name, record).await;
            match app.mint().await? {
                RegistrationOutcome::Registered(registration) => {
                    println!(
                        "Registered {}.{} for {} MATIC",
                        registration.name,
                        config.tld,
                        registration.price.format_ether()
                    );
                    if let Some(url) = &registration.explorer_url {
                        println!("  {url}");
                    }
                    if let RecordWrite::Reverted(_) | RecordWrite::Failed(_) = registration.record {
                        println!("  record was not saved");
                    }
                    registration.refresh.await?;
                    print_mints(app.view().await.visible_mints(), config, &rt.contract);
                }
                RegistrationOutcome::AlreadyInFlight => println!("A transaction is already pending"),
            }
        }
        Commands::Edit { name, record } => {
            require_form(app).await?;
            app.enter_edit(&name).await?;
            app.set_candidate(name, record).await;
            match app.update_record().await? {
                RecordUpdateOutcome::Updated { explorer_url, tx } => {
                    println!("Record set {}", explorer_url.unwrap_or(tx.0));
                }
                RecordUpdateOutcome::AlreadyInFlight => println!("A transaction is already pending"),
            }
        }
        Commands::List => {
            let mints = app.refresh_mints().await?;
            print_mints(&mints, config, &rt.contract);
        }
        Commands::Watch => watch(&rt, config).await?,
        Commands::Price { .. } | Commands::Deploy { .. } => {}
    }

    app.shutdown().await;
    Ok(())
}

/// Run discovery and fail unless the form screen is reachable.
async fn require_form(app: &Arc<AppState>) -> Result<()> {
    app.run_startup(&NoopStartupHooks).await?;
    let view = app.view().await;
    match view.screen() {
        Screen::Form => Ok(()),
        Screen::Connect => bail!("Not connected, run `pekked connect` first"),
        Screen::SwitchNetwork => bail!(
            "Wallet is on {}, run `pekked switch-network` first",
            view.session.network_name().unwrap_or_default()
        ),
    }
}

async fn watch(rt: &Runtime, config: &Config) -> Result<()> {
    rt.app.run_startup(&CliHooks).await?;
    let poller = rt
        .wallet
        .as_ref()
        .map(|wallet| Arc::clone(wallet).watch_chain(config.chain_poll()));

    print_view(&rt.app.view().await, config, &rt.contract);
    if rt.wallet.is_none() {
        return Ok(());
    }
    // The app's network watch does the reload; print once it has settled
    let mut reloads = rt.app.subscribe_reloads();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = reloads.changed() => {
                if changed.is_err() {
                    break;
                }
                print_view(&rt.app.view().await, config, &rt.contract);
            }
        }
    }

    if let Some(poller) = poller {
        poller.abort();
    }
    Ok(())
}

async fn deploy(config: &Config, bytecode_path: &Path, fee: Wei) -> Result<()> {
    let hex_code = std::fs::read_to_string(bytecode_path)
        .with_context(|| format!("failed to read {}", bytecode_path.display()))?;
    let hex_code = hex_code.trim();
    let bytecode = hex::decode(hex_code.strip_prefix("0x").unwrap_or(hex_code))
        .context("bytecode is not valid hex")?;
    if config.rpc_url.is_empty() {
        bail!("rpc_url is required to deploy");
    }

    let wallet: Arc<dyn WalletProvider> =
        Arc::new(JsonRpcWallet::new(config.rpc_url.clone()).with_max_retries(config.max_retries));
    let (contract, _) =
        DomainsContract::deploy(Arc::clone(&wallet), &bytecode, &config.tld, config.receipt_poll())
            .await?;
    println!("Contract deployed to: {}", contract.address());

    let tx = contract.register(SAMPLE_NAME, fee).await?;
    if !contract.wait(&tx).await?.is_success() {
        bail!("registering {SAMPLE_NAME} reverted");
    }
    println!("Minted domain {SAMPLE_NAME}.{}", config.tld);

    let tx = contract.set_record(SAMPLE_NAME, SAMPLE_RECORD).await?;
    if !contract.wait(&tx).await?.is_success() {
        bail!("setting the record of {SAMPLE_NAME} reverted");
    }
    println!("Set record for {SAMPLE_NAME}.{}", config.tld);

    let owner = contract.owner(SAMPLE_NAME).await?;
    println!("Owner of domain {SAMPLE_NAME}: {owner}");

    let balance = wallet.balance(contract.address()).await?;
    println!("Contract balance: {}", balance.format_ether());
    Ok(())
}

fn print_view(view: &ViewState, config: &Config, contract: &Address) {
    println!("{}", view.session.wallet_label());
    if let Some(network) = view.session.network_name() {
        println!("Network: {network}");
    }
    match view.screen() {
        Screen::Connect => println!("Connect a wallet to mint names"),
        Screen::SwitchNetwork => println!("Please switch to {}", config.network.chain_name),
        Screen::Form => print_mints(view.visible_mints(), config, contract),
    }
}

fn print_mints(mints: &[MintRecord], config: &Config, contract: &Address) {
    if mints.is_empty() {
        println!("No names registered yet");
        return;
    }
    println!("Recently minted domains!");
    for mint in mints {
        println!(
            "  {:<24} {:<32} {}  {}",
            mint.full_name(&config.tld),
            mint.record,
            mint.owner.short(),
            mint.marketplace_url(contract)
        );
    }
}
