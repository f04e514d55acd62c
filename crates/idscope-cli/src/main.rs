//! idscope - query on-chain identities from the command line.
//!
//! Every command prints pretty JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use idscope_chain::{IdentityEngine, resolve_endpoint};
use idscope_core::config::get_config_path;
use idscope_core::{EngineConfig, Network};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Query identities, balances and chain status of a Polkadot-SDK chain.
#[derive(Parser, Debug)]
#[command(name = "idscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network whose People chain is queried
    #[arg(short, long, default_value = "polkadot")]
    network: Network,

    /// Custom RPC endpoint URL, overrides --network
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Engine configuration file (JSON). Defaults to the user config file
    /// when it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List identities page by page
    List {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        limit: i64,
    },
    /// Search identities by pattern or account index
    Search {
        query: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        limit: i64,
    },
    /// Identity of an address with judgements and balance
    Identity { address: String },
    /// Balance of an address
    Balance { address: String },
    /// Every identity with its judgements
    All,
    /// Identity pallet, archive mode, chain name and token
    Status,
    /// Print the effective engine configuration
    Config {
        /// Also write it to the user config file
        #[arg(long)]
        write: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::load_or_default()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;

    // stdout carries the JSON output, so logs go to stderr
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("idscope=info".parse()?)
        .add_directive("idscope_chain=info".parse()?)
        .add_directive("idscope_core=info".parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(args.config.as_ref())?;

    if let Command::Config { write } = args.command {
        if write {
            let path = get_config_path()?;
            config.save(&path)?;
            tracing::info!("Wrote configuration to {}", path.display());
        }
        return print_json(&config);
    }

    let endpoint = resolve_endpoint(args.endpoint.as_deref(), args.network);
    tracing::info!("Using endpoint {}", endpoint);
    let engine = IdentityEngine::from_config(&config);

    match args.command {
        Command::List { page, limit } => {
            print_json(&engine.get_identities(&endpoint, page, limit).await?)
        }
        Command::Search { query, page, limit } => print_json(
            &engine
                .search_identities(&endpoint, &query, page, limit)
                .await?,
        ),
        Command::Identity { address } => print_json(&engine.get_identity(&endpoint, &address).await?),
        Command::Balance { address } => {
            print_json(&engine.get_account_balance(&endpoint, &address).await?)
        }
        Command::All => print_json(&engine.get_complete_identities(&endpoint).await?),
        Command::Status => print_json(&engine.get_chain_status(&endpoint).await?),
        Command::Config { .. } => Ok(()),
    }
}
