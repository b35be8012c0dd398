//! Runtime configuration from environment variables.

use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Kakao REST API key. `None` disables live place search.
    pub kakao_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    /// Overrides ~/.midmeet/cache.json.
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kakao_api_key: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cache_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// - `KAKAO_REST_API_KEY`: optional; without it searches degrade to built-in data
    /// - `MIDMEET_HOST`: bind host (default 127.0.0.1)
    /// - `MIDMEET_PORT`: bind port (default 8080)
    /// - `MIDMEET_CACHE_PATH`: search cache file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let kakao_api_key = get("KAKAO_REST_API_KEY");

        let host = get("MIDMEET_HOST").unwrap_or_else(|| {
            info!("MIDMEET_HOST not set, using default: {DEFAULT_HOST}");
            DEFAULT_HOST.to_string()
        });

        let port = match get("MIDMEET_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "MIDMEET_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let cache_path = get("MIDMEET_CACHE_PATH").map(PathBuf::from);

        Ok(Self { kakao_api_key, host, port, cache_path })
    }
}
