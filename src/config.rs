//! Service configuration
//!
//! Everything comes from the environment. Only the store location is
//! required; without it the process refuses to start.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `MONGODB_SERVICE` | store host, `host:port` or seed list | required |
//! | `MONGODB_USERNAME` / `MONGODB_PASSWORD` | credentials, used only as a pair | none |
//! | `MONGODB_PORT` | port when the service names none | driver default |
//! | `SONGBOOK_HOST` / `SONGBOOK_PORT` | HTTP bind address | `0.0.0.0:8080` |
//! | `SONGBOOK_SEED_PATH` | seed dataset | `data/songs.json` |
//! | `SONGBOOK_CORS_ORIGINS` | comma separated origins | any origin |

use std::path::PathBuf;

use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::store::StoreConfig;

pub const ENV_STORE_SERVICE: &str = "MONGODB_SERVICE";
pub const ENV_STORE_USERNAME: &str = "MONGODB_USERNAME";
pub const ENV_STORE_PASSWORD: &str = "MONGODB_PASSWORD";
pub const ENV_STORE_PORT: &str = "MONGODB_PORT";
pub const ENV_HTTP_HOST: &str = "SONGBOOK_HOST";
pub const ENV_HTTP_PORT: &str = "SONGBOOK_PORT";
pub const ENV_SEED_PATH: &str = "SONGBOOK_SEED_PATH";
pub const ENV_CORS_ORIGINS: &str = "SONGBOOK_CORS_ORIGINS";

/// Seed dataset used when `SONGBOOK_SEED_PATH` is unset
pub const DEFAULT_SEED_PATH: &str = "data/songs.json";

/// Configuration errors; all of them are fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing document store server in the MONGODB_SERVICE variable")]
    MissingStoreService,

    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },
}

/// Full service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub store: StoreConfig,
    pub http: HttpServerConfig,
    pub seed_path: PathBuf,
}

/// Unset and blank variables read the same
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(var: &'static str, value: Option<String>) -> Result<Option<u16>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u16>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidPort { var, value: raw }),
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let service = get(ENV_STORE_SERVICE).ok_or(ConfigError::MissingStoreService)?;
        let mut store = StoreConfig::new(service);
        store.username = get(ENV_STORE_USERNAME);
        store.password = get(ENV_STORE_PASSWORD);
        store.port = parse_port(ENV_STORE_PORT, get(ENV_STORE_PORT))?;

        let mut http = HttpServerConfig::default();
        if let Some(host) = get(ENV_HTTP_HOST) {
            http.host = host;
        }
        if let Some(port) = parse_port(ENV_HTTP_PORT, get(ENV_HTTP_PORT))? {
            http.port = port;
        }
        if let Some(origins) = get(ENV_CORS_ORIGINS) {
            http.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }

        let seed_path = get(ENV_SEED_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_PATH));

        Ok(Self {
            store,
            http,
            seed_path,
        })
    }
}
