//! Application directory and chain provider configuration.
//!
//! The application directory holds the user's label stores and the chain
//! provider file:
//!
//! ```text
//! <app_dir>/addresses   address book (JSON)
//! <app_dir>/servers     storage providers (JSON)
//! <app_dir>/wallet      wallet key references (JSON, public data only)
//! <app_dir>/provider    blockchain provider (JSON)
//! ```
//!
//! The directory is taken from `--app-dir`, else `BUBBLE_TOOLS_DIR`, else
//! `$HOME/.bubble-tools`.

use std::path::{Path, PathBuf};

use bubble_core::Chain;
use bubble_registry::{AddressBook, ServerList, StoreError, WalletLabels};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the application directory.
pub const APP_DIR_ENV: &str = "BUBBLE_TOOLS_DIR";

/// Directory name under `$HOME` used when nothing else is configured.
pub const DEFAULT_APP_DIR_NAME: &str = ".bubble-tools";

/// Resolved tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    /// The application directory. May not exist yet.
    pub app_dir: PathBuf,
}

impl ToolsConfig {
    /// Resolve from the command-line flag and the process environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingHome`] if no directory is given and `HOME` is unset.
    pub fn resolve(flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::from_sources(
            flag,
            std::env::var(APP_DIR_ENV).ok(),
            std::env::var("HOME").ok(),
        )
    }

    /// Resolve from explicit sources, in priority order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingHome`] if all three are absent or empty.
    pub fn from_sources(
        flag: Option<PathBuf>,
        env_dir: Option<String>,
        home: Option<String>,
    ) -> Result<Self, ConfigError> {
        let app_dir = flag
            .or_else(|| env_dir.filter(|d| !d.is_empty()).map(PathBuf::from))
            .or_else(|| {
                home.filter(|h| !h.is_empty())
                    .map(|h| Path::new(&h).join(DEFAULT_APP_DIR_NAME))
            })
            .ok_or(ConfigError::MissingHome)?;
        Ok(Self { app_dir })
    }

    /// Path of the address book.
    pub fn addresses_file(&self) -> PathBuf {
        self.app_dir.join("addresses")
    }

    /// Path of the server list.
    pub fn servers_file(&self) -> PathBuf {
        self.app_dir.join("servers")
    }

    /// Path of the wallet key references.
    pub fn wallet_file(&self) -> PathBuf {
        self.app_dir.join("wallet")
    }

    /// Path of the chain provider file.
    pub fn provider_file(&self) -> PathBuf {
        self.app_dir.join("provider")
    }

    /// Load the address book.
    ///
    /// # Errors
    ///
    /// A [`StoreError`] if the file is unreadable or malformed.
    pub fn address_book(&self) -> Result<AddressBook, StoreError> {
        AddressBook::load(&self.addresses_file())
    }

    /// Load the server list.
    ///
    /// # Errors
    ///
    /// A [`StoreError`] if the file is unreadable or malformed.
    pub fn servers(&self) -> Result<ServerList, StoreError> {
        ServerList::load(&self.servers_file())
    }

    /// Load the wallet key references.
    ///
    /// # Errors
    ///
    /// A [`StoreError`] if the file is unreadable or malformed.
    pub fn wallet(&self) -> Result<WalletLabels, StoreError> {
        WalletLabels::load(&self.wallet_file())
    }

    /// Load the chain provider, see [`ChainProvider::load`].
    ///
    /// # Errors
    ///
    /// As [`ChainProvider::load`].
    pub fn chain_provider(&self) -> Result<ChainProvider, ConfigError> {
        ChainProvider::load(&self.app_dir)
    }
}

/// Network description inside the provider file.
///
/// Fields beyond name and chain id are kept as-is so that a user-edited
/// file round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockchain {
    /// Network name, e.g. `bubblenet`.
    pub name: String,
    /// EIP-155 chain id.
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    /// Any other network fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The blockchain endpoint the tool talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainProvider {
    /// The network.
    pub blockchain: Blockchain,
    /// JSON-RPC endpoint.
    #[serde(rename = "blockchainUrl")]
    pub blockchain_url: String,
}

impl ChainProvider {
    /// The built-in Bubble main chain.
    pub fn bubblenet() -> Self {
        let mut extra = serde_json::Map::new();
        extra.insert("networkId".to_string(), serde_json::Value::from(45021));
        extra.insert(
            "comment".to_string(),
            serde_json::Value::from("The Bubble main chain"),
        );
        Self {
            blockchain: Blockchain {
                name: "bubblenet".to_string(),
                chain_id: 45021,
                extra,
            },
            blockchain_url: "https://datonavault.com:8130".to_string(),
        }
    }

    /// The chain identifier to attach to decoded content identifiers.
    pub fn chain(&self) -> Chain {
        Chain::Id(self.blockchain.chain_id)
    }

    /// Read `<app_dir>/provider`.
    ///
    /// When the file is absent the bubblenet default is returned, and if
    /// `app_dir` exists the default is written there as a template. The
    /// directory itself is never created.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::InvalidProvider`] if it is not a provider description.
    pub fn load(app_dir: &Path) -> Result<Self, ConfigError> {
        let path = app_dir.join("provider");
        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let provider: Self =
                serde_json::from_str(&content).map_err(|e| ConfigError::InvalidProvider {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            if provider.blockchain_url.is_empty() {
                return Err(ConfigError::InvalidProvider {
                    path,
                    reason: "blockchainUrl is empty".to_string(),
                });
            }
            tracing::debug!(path = %path.display(), chain = provider.blockchain.chain_id, "loaded chain provider");
            return Ok(provider);
        }

        let default = Self::bubblenet();
        if app_dir.is_dir() {
            match serde_json::to_string_pretty(&default)
                .map_err(|e| e.to_string())
                .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()))
            {
                Ok(()) => tracing::info!(path = %path.display(), "wrote provider template"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not write provider template"),
            }
        }
        Ok(default)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No application directory could be determined.
    #[error("cannot locate the application directory: pass --app-dir, set BUBBLE_TOOLS_DIR or HOME")]
    MissingHome,

    /// The provider file is not a valid provider description.
    #[error("invalid provider configuration in {}: {reason}", .path.display())]
    InvalidProvider {
        /// The provider file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The provider file could not be read.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The provider file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_env_and_home() {
        let cfg = ToolsConfig::from_sources(
            Some(PathBuf::from("/flag")),
            Some("/env".into()),
            Some("/home/u".into()),
        )
        .unwrap();
        assert_eq!(cfg.app_dir, PathBuf::from("/flag"));
    }

    #[test]
    fn env_wins_over_home() {
        let cfg = ToolsConfig::from_sources(None, Some("/env".into()), Some("/home/u".into())).unwrap();
        assert_eq!(cfg.app_dir, PathBuf::from("/env"));
    }

    #[test]
    fn home_default() {
        let cfg = ToolsConfig::from_sources(None, Some(String::new()), Some("/home/u".into())).unwrap();
        assert_eq!(cfg.app_dir, PathBuf::from("/home/u/.bubble-tools"));
        assert_eq!(cfg.servers_file(), PathBuf::from("/home/u/.bubble-tools/servers"));
    }

    #[test]
    fn missing_everything_fails() {
        assert!(matches!(
            ToolsConfig::from_sources(None, None, None),
            Err(ConfigError::MissingHome)
        ));
    }

    #[test]
    fn provider_default_writes_template_into_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ChainProvider::load(dir.path()).unwrap();
        assert_eq!(provider, ChainProvider::bubblenet());
        assert_eq!(provider.chain(), Chain::Id(45021));
        assert!(dir.path().join("provider").exists());

        let reloaded = ChainProvider::load(dir.path()).unwrap();
        assert_eq!(reloaded, provider);
    }

    #[test]
    fn provider_default_never_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let provider = ChainProvider::load(&missing).unwrap();
        assert_eq!(provider.blockchain.name, "bubblenet");
        assert!(!missing.exists());
    }

    #[test]
    fn provider_custom_file_keeps_extra_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("provider"),
            r#"{"blockchain":{"name":"local","chainId":1337,"networkId":1337},"blockchainUrl":"http://localhost:8545"}"#,
        )
        .unwrap();
        let provider = ChainProvider::load(dir.path()).unwrap();
        assert_eq!(provider.blockchain.chain_id, 1337);
        assert_eq!(provider.blockchain.extra["networkId"], 1337);
        assert_eq!(provider.blockchain_url, "http://localhost:8545");
    }

    #[test]
    fn provider_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("provider"), r#"{"blockchain":{}}"#).unwrap();
        assert!(matches!(
            ChainProvider::load(dir.path()),
            Err(ConfigError::InvalidProvider { .. })
        ));
    }
}
