use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {reason}")]
    Invalid { key: String, reason: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port the proxy binds to.
    pub port: u16,
    pub upstream_base_url: String,
    /// Sent as `Ocp-Apim-Subscription-Key` when set.
    pub upstream_api_key: Option<String>,
    pub upstream_timeout: Duration,
    /// Base URL the fetch client resolves resource keys against.
    pub portal_base_url: String,
    pub overlay_close_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            upstream_base_url: "http://localhost:7071".to_string(),
            upstream_api_key: None,
            upstream_timeout: Duration::from_secs(10),
            portal_base_url: "http://localhost:3000".to_string(),
            overlay_close_delay: Duration::from_millis(300),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORTAL_PORT", "3000")?,
            upstream_base_url: try_load(&lookup, "UPSTREAM_BASE_URL", "http://localhost:7071")?,
            upstream_api_key: lookup("UPSTREAM_API_KEY").filter(|key| !key.trim().is_empty()),
            upstream_timeout: Duration::from_secs(try_load(&lookup, "UPSTREAM_TIMEOUT_SECS", "10")?),
            portal_base_url: try_load(&lookup, "PORTAL_BASE_URL", "http://localhost:3000")?,
            overlay_close_delay: Duration::from_millis(try_load(
                &lookup,
                "OVERLAY_CLOSE_DELAY_MS",
                "300",
            )?),
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}
