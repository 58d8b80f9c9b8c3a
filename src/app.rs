//! Service startup
//!
//! config → store client → seed → serve. Any failure before the listener
//! is bound aborts startup; nothing is served half-initialized.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, ServiceConfig};
use crate::http_server::HttpServer;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::seed::{self, SeedError};
use crate::store::{MongoStore, SongCollection, StoreError};

/// Startup and serving failures
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot reach document store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("http server failed: {0}")]
    Server(#[from] std::io::Error),
}

impl AppError {
    /// Lifecycle event reported for this failure
    pub fn event(&self) -> Event {
        match self {
            AppError::Config(_) => Event::ConfigInvalid,
            AppError::Store(_) => Event::StoreUnreachable,
            AppError::Seed(_) => Event::SeedFailed,
            AppError::Server(_) => Event::ServerFailed,
        }
    }
}

/// Run the service with configuration from the environment
pub async fn run() -> Result<(), AppError> {
    log_event(Event::BootStart);
    let config = ServiceConfig::from_env()?;
    run_with_config(config).await
}

/// Run the service with an explicit configuration
pub async fn run_with_config(config: ServiceConfig) -> Result<(), AppError> {
    let seed_path = config.seed_path.display().to_string();
    let bind = config.http.socket_addr();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("bind", bind.as_str()), ("seed_path", seed_path.as_str())],
    );

    let store = MongoStore::connect(&config.store).await?;
    let address = config.store.redacted_address();
    log_event_with_fields(
        Event::StoreConnected,
        &[
            ("address", address.as_str()),
            ("collection", config.store.collection.as_str()),
            ("database", config.store.database.as_str()),
        ],
    );

    let songs = Arc::new(SongCollection::new(store));
    seed::seed_from_file(songs.as_ref(), &config.seed_path).await?;

    log_event(Event::BootComplete);
    HttpServer::new(config.http, songs).start().await?;
    Ok(())
}
