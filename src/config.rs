use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ethereum::BlockSpec;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FETCH_EVENTS_CONFIG";

/// Path tail of Alchemy's shared demo endpoint.
const ALCHEMY_DEMO_KEY: &str = "/v2/demo";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rpc_url: String,
    pub contract_address: String,
    pub abi_path: PathBuf,
    pub event_name: String,
    pub from_block: u64,
    pub to_block: BlockSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://arb-mainnet.g.alchemy.com/v2/demo".to_string(),
            contract_address: "0x9FA306b1F4a6a83FEC98d8eBbaBEDfF78C407f6B".to_string(),
            abi_path: PathBuf::from("script/utils/contract_abi.json"),
            event_name: "RoleSet".to_string(),
            from_block: 0,
            to_block: BlockSpec::Latest,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;

        Self::from_toml(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit `FETCH_EVENTS_CONFIG` file must load; the per-user file is
    /// optional and falls back to defaults when broken.
    pub async fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let config = Self::load_from_file(&path).await?;
                tracing::info!("Loaded configuration from {}", path);
                config
            }
            Err(_) => Self::load_or_default(Self::default_config_path().ok()).await,
        };

        config.apply_env_vars(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration with fallback to default
    pub async fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        match path {
            Some(path) if path.as_ref().exists() => match Self::load_from_file(&path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file, using defaults: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// `lookup` stands in for `std::env::var` so overrides can be exercised
    /// without touching the process environment.
    pub fn apply_env_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rpc_url) = lookup("FETCH_EVENTS_RPC_URL") {
            self.rpc_url = rpc_url;
        }
        if let Some(address) = lookup("FETCH_EVENTS_CONTRACT") {
            self.contract_address = address;
        }
        if let Some(abi_path) = lookup("FETCH_EVENTS_ABI_PATH") {
            self.abi_path = PathBuf::from(abi_path);
        }
        if let Some(event_name) = lookup("FETCH_EVENTS_EVENT") {
            self.event_name = event_name;
        }
        if let Some(from_block) = lookup("FETCH_EVENTS_FROM_BLOCK") {
            self.from_block = from_block
                .trim()
                .parse()
                .map_err(|_| anyhow!("FETCH_EVENTS_FROM_BLOCK must be a block number, got '{}'", from_block))?;
        }
        if let Some(to_block) = lookup("FETCH_EVENTS_TO_BLOCK") {
            self.to_block = to_block.parse()?;
        }

        // only the key segment at the end of the path is substituted
        let demo_base = self
            .rpc_url
            .strip_suffix(ALCHEMY_DEMO_KEY)
            .filter(|base| base.contains("alchemy.com"))
            .map(str::to_string);

        if let Some(api_key) = lookup("ALCHEMY_API_KEY") {
            tracing::info!("Using ALCHEMY_API_KEY environment variable for RPC URL");
            if let Some(base) = demo_base {
                self.rpc_url = format!("{}/v2/{}", base, api_key);
            } else if self.rpc_url.contains("YOUR_API_KEY_HERE") {
                self.rpc_url = self.rpc_url.replace("YOUR_API_KEY_HERE", &api_key);
            }
        } else if demo_base.is_some() {
            tracing::warn!(
                "Using demo RPC endpoint, set ALCHEMY_API_KEY environment variable for better reliability"
            );
        }

        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("fetch-events").join("config.toml"))
    }
}
