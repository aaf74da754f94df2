use anyhow::Result;
use config::{Config as RawConfig, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use std::path::{Path, PathBuf};

use crate::cli::Args;

use super::errors::ConfigError;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/chat";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub chat: ChatConfig,
    pub connectivity: ConnectivityConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// URL of the chat completion endpoint.
    pub endpoint: Url,

    /// Request timeout in **seconds**.
    ///
    /// Defaults to `None` (requests wait as long as the endpoint does).
    #[serde(default)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectivityConfig {
    /// `host:port` the probe tries to open a TCP connection to.
    pub probe: String,

    /// How often to probe, in **seconds**.
    pub interval: u64,

    /// How long a single probe may take, in **milliseconds**.
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Input poll timeout of the dashboard loop, in **milliseconds**.
    pub tick_rate: u64,
}

impl Config {
    pub fn from_sources(cli: &Args) -> Result<Self> {
        let mut builder = RawConfig::builder()
            .set_default("chat.endpoint", DEFAULT_ENDPOINT)?
            .set_default("connectivity.probe", "1.1.1.1:53")?
            .set_default("connectivity.interval", 5_i64)?
            .set_default("connectivity.timeout", 1500_i64)?
            .set_default("ui.tick_rate", 100_i64)?;

        // 1. CLI-specified config file
        if let Some(ref path) = cli.config {
            builder = builder.add_source(File::from(path.clone()));
        }
        // 2. Local ./vassist.toml
        else if Path::new("vassist.toml").exists() {
            builder = builder.add_source(File::with_name("vassist"));
        }
        // 3. XDG fallback
        else if let Some(path) = Self::try_get_path().ok().filter(|p| p.exists()) {
            builder = builder.add_source(File::from(path));
        }

        // Env overrides (example: `VASSIST_CHAT__ENDPOINT`)
        builder = builder.add_source(
            Environment::with_prefix("VASSIST")
                .prefix_separator("_")
                .separator("__"),
        );

        // CLI overrides
        if let Some(endpoint) = &cli.endpoint {
            builder = builder.set_override("chat.endpoint", endpoint.as_str())?;
        }

        let built = builder.build().map_err(ConfigError::Load)?;
        Ok(built.try_deserialize().map_err(ConfigError::Load)?)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn try_get_path() -> Result<PathBuf> {
        let base_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(base_dir.join("vassist").join("vassist.toml"))
    }
}
