//! Server configuration.
//!
//! Everything is read from environment variables in [`ServerConfig::from_env_or_default`]. Missing or invalid values
//! fall back to a default and are logged. See `cli-help.txt` for the full list.
use std::{env, path::PathBuf, time::Duration};

use karban_common::Secret;
use log::*;
use unicommerce_tools::UnicommerceConfig;

const DEFAULT_KSS_HOST: &str = "127.0.0.1";
const DEFAULT_KSS_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/karban_sync.db?mode=rwc";
const DEFAULT_SETTINGS_FILE: &str = "karban_sync.toml";
const DEFAULT_SYNC_POLL_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The TOML file holding the integration settings
    pub settings_file: PathBuf,
    /// Callers of the `/api` routes must present this key in the `X-Api-Key` header. When it is empty, every such
    /// request is refused.
    pub admin_api_key: Secret<String>,
    /// How often the worker enqueues a scheduled order sync. The sync frequency in the integration settings still
    /// decides whether a scheduled run actually fetches anything.
    pub sync_poll_interval: Duration,
    pub unicommerce: UnicommerceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_KSS_HOST.to_string(),
            port: DEFAULT_KSS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            admin_api_key: Secret::default(),
            sync_poll_interval: DEFAULT_SYNC_POLL_INTERVAL,
            unicommerce: UnicommerceConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("KSS_HOST").ok().unwrap_or_else(|| DEFAULT_KSS_HOST.into());
        let port = env::var("KSS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for KSS_PORT. {e} Using the default, {DEFAULT_KSS_PORT}, instead."
                    );
                    DEFAULT_KSS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_KSS_PORT);
        let database_url = env::var("KSS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ KSS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let settings_file = env::var("KSS_SETTINGS_FILE").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ KSS_SETTINGS_FILE is not set. Using {DEFAULT_SETTINGS_FILE}.");
            PathBuf::from(DEFAULT_SETTINGS_FILE)
        });
        let admin_api_key = env::var("KSS_ADMIN_API_KEY").ok().unwrap_or_else(|| {
            warn!("🚨️ KSS_ADMIN_API_KEY is not set. All requests to /api will be refused.");
            String::default()
        });
        let sync_poll_interval = configure_poll_interval();
        let unicommerce = UnicommerceConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            settings_file,
            admin_api_key: Secret::new(admin_api_key),
            sync_poll_interval,
            unicommerce,
        }
    }
}

fn configure_poll_interval() -> Duration {
    env::var("KSS_SYNC_POLL_INTERVAL")
        .map_err(|_| {
            info!(
                "🪛️ KSS_SYNC_POLL_INTERVAL is not set. Using the default value of {} s.",
                DEFAULT_SYNC_POLL_INTERVAL.as_secs()
            )
        })
        .and_then(|s| {
            s.parse::<u64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for KSS_SYNC_POLL_INTERVAL. {e}"))
                .and_then(|secs| match secs {
                    0 => {
                        warn!("🪛️ KSS_SYNC_POLL_INTERVAL must be at least one second.");
                        Err(())
                    },
                    secs => Ok(Duration::from_secs(secs)),
                })
        })
        .ok()
        .unwrap_or(DEFAULT_SYNC_POLL_INTERVAL)
}
