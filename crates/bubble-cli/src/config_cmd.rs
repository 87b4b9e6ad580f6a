//! # Config Subcommand
//!
//! `bubble config show` prints the resolved application directory, the
//! store files and the chain provider.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::ToolsConfig;

/// Arguments for the `bubble config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration.
    Show,
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs, config: &ToolsConfig) -> Result<u8> {
    match &args.command {
        ConfigCommand::Show => {
            let provider = config.chain_provider()?;
            println!("app dir:   {}", config.app_dir.display());
            println!("addresses: {}", config.addresses_file().display());
            println!("servers:   {}", config.servers_file().display());
            println!("wallet:    {}", config.wallet_file().display());
            println!(
                "chain:     {} ({})",
                provider.blockchain.name, provider.blockchain.chain_id
            );
            println!("rpc url:   {}", provider.blockchain_url);
            Ok(0)
        }
    }
}
