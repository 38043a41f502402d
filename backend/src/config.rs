//! Configuration management.

use anyhow::bail;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Configuration structure that matches the TOML file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    upstream: UpstreamConfig,
    #[serde(default)]
    auth: AuthSection,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerConfig {
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UpstreamConfig {
    /// Base URL of the fleet-tracking API
    host: Option<String>,
    /// Bearer token sent with every upstream request
    token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthSection {
    /// Shared secret required from connecting agents
    token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    level: Option<String>,
}

fn default_port() -> u16 {
    fleetbridge_types::DEFAULT_PORT
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// Base URL of the upstream fleet-tracking API
    pub upstream_host: String,
    /// Bearer token sent with every upstream request
    pub upstream_token: String,
    /// Shared secret required from connecting agents; `None` disables
    /// the connector gate
    pub connector_token: Option<String>,
    /// Log level (if set, used when RUST_LOG is absent)
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with full priority chain: CLI args > env vars
    /// > config files > defaults.
    ///
    /// Config files are searched in this order:
    /// 1. `.fleetbridge.toml` in the current directory
    /// 2. `config.toml` in the user config directory
    ///    (~/.config/fleetbridge/ on Linux)
    ///
    /// Fails when the upstream host or token is missing: that is
    /// unrecoverable misconfiguration, caught before the listener
    /// binds.
    pub fn from_figment(
        port: Option<u16>,
        upstream_host: Option<String>,
        upstream_token: Option<String>,
        connector_token: Option<String>,
    ) -> anyhow::Result<Self> {
        // Find config file paths
        let local_config = std::env::current_dir()
            .ok()
            .map(|d| d.join(".fleetbridge.toml"));
        let user_config = directories::ProjectDirs::from("", "", "fleetbridge")
            .map(|dirs| dirs.config_dir().join("config.toml"));

        // Build figment with priority: defaults < user config < local config < env vars < CLI args
        let mut figment = Figment::new();

        // 1. Start with defaults
        figment = figment.merge(Serialized::defaults(ConfigFile {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            auth: AuthSection::default(),
            logging: LoggingConfig::default(),
        }));

        // 2. Merge user config file if it exists
        if let Some(ref path) = user_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // 3. Merge local config file if it exists
        if let Some(ref path) = local_config {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // 4. Merge environment variables (FLEETBRIDGE_* prefix, e.g.
        //    FLEETBRIDGE_SERVER_PORT, FLEETBRIDGE_UPSTREAM_HOST)
        figment = figment.merge(Env::prefixed("FLEETBRIDGE_").split("_"));

        // 5. Merge CLI arguments (highest priority)
        if let Some(p) = port {
            figment = figment.merge(Serialized::default("server.port", p));
        }
        if let Some(ref host) = upstream_host {
            figment = figment.merge(Serialized::default("upstream.host", host));
        }
        if let Some(ref token) = upstream_token {
            figment = figment.merge(Serialized::default("upstream.token", token));
        }
        if let Some(ref token) = connector_token {
            figment = figment.merge(Serialized::default("auth.token", token));
        }

        // Extract the configuration
        let config_file: ConfigFile = figment.extract()?;

        let Some(upstream_host) = config_file.upstream.host else {
            bail!("upstream host is required: set [upstream] host, FLEETBRIDGE_UPSTREAM_HOST or --upstream-host");
        };
        let Some(upstream_token) = config_file.upstream.token else {
            bail!("upstream token is required: set [upstream] token, FLEETBRIDGE_UPSTREAM_TOKEN or --upstream-token");
        };

        Ok(Self {
            port: config_file.server.port,
            upstream_host,
            upstream_token,
            connector_token: config_file.auth.token,
            log_level: config_file.logging.level,
        })
    }
}
