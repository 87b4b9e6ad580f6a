//! # bubble CLI entry point
//!
//! Parses command-line arguments, resolves the application directory and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bubble_cli::addresses::{run_addresses, AddressesArgs};
use bubble_cli::config::ToolsConfig;
use bubble_cli::config_cmd::{run_config, ConfigArgs};
use bubble_cli::did::{run_did, DidArgs};
use bubble_cli::hash::{run_hash, HashArgs};
use bubble_cli::nft::{run_nft, NftArgs};
use bubble_cli::providers::{run_providers, ProvidersArgs};
use bubble_cli::wallet::{run_wallet, WalletArgs};

/// Bubble tools
///
/// Encodes and decodes `did:bubble:` content identifiers, manages the
/// address book, provider list and wallet labels, and computes the hashes
/// and packets used by Bubble contracts.
#[derive(Parser, Debug)]
#[command(name = "bubble", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Application directory. Defaults to `$BUBBLE_TOOLS_DIR`, then `~/.bubble-tools`.
    #[arg(long, global = true)]
    app_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode, decode and shorten Bubble DIDs.
    Did(DidArgs),

    /// Address book management (list, add, remove).
    Addresses(AddressesArgs),

    /// Storage provider management (list, add, remove).
    Providers(ProvidersArgs),

    /// Wallet key labels (list, import, remove).
    Wallet(WalletArgs),

    /// Permission hashes, checksums, data hashes and packets.
    Hash(HashArgs),

    /// NFT mint invitations.
    Nft(NftArgs),

    /// Show the resolved configuration.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match ToolsConfig::resolve(cli.app_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(app_dir = %config.app_dir.display(), "resolved application directory");

    let result = match cli.command {
        Commands::Did(args) => run_did(&args, &config),
        Commands::Addresses(args) => run_addresses(&args, &config),
        Commands::Providers(args) => run_providers(&args, &config),
        Commands::Wallet(args) => run_wallet(&args, &config),
        Commands::Hash(args) => run_hash(&args, &config),
        Commands::Nft(args) => run_nft(&args, &config),
        Commands::Config(args) => run_config(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
