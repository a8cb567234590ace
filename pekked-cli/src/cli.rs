use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pekked - register and browse `.pekked` names
#[derive(Parser, Debug)]
#[command(name = "pekked")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Wallet JSON-RPC endpoint, overrides `rpc_url`
    #[arg(long, env = "PEKKED_RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the wallet, network and registered names
    Status,

    /// Ask the wallet for account access
    Connect,

    /// Ask the wallet to switch to (or add) the required network
    SwitchNetwork,

    /// Show the registration fee of a name
    Price {
        /// Name without the top-level namespace
        name: String,
    },

    /// Register a name and attach a record to it
    Mint {
        /// Name without the top-level namespace
        name: String,

        /// Text record to attach after registration
        #[arg(short, long, default_value = "")]
        record: String,
    },

    /// Replace the record of a name you own
    Edit {
        /// Name without the top-level namespace
        name: String,

        /// New text record
        record: String,
    },

    /// List registered names
    List,

    /// Follow network changes and reload on each one
    Watch,

    /// Deploy the registry and register a sample name
    Deploy {
        /// File with the hex-encoded creation bytecode
        #[arg(short, long)]
        bytecode: PathBuf,

        /// Fee paid for the sample registration, in MATIC
        #[arg(long, default_value = "0.1")]
        fee: String,
    },
}
