//! # HTTP Server
//!
//! Binds the health and song routers into one axum server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::errors::ApiError;
use super::health_routes::health_routes;
use super::middleware::log_requests;
use super::song_routes::song_routes;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::{SongCollection, SongStore};

/// HTTP server for the song service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over `songs`
    pub fn new<S: SongStore>(config: HttpServerConfig, songs: Arc<SongCollection<S>>) -> Self {
        let router = build_router(&config, songs);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::ServerListening, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the full router: health, songs, JSON 404 fallback, CORS, logging
pub fn build_router<S: SongStore>(config: &HttpServerConfig, songs: Arc<SongCollection<S>>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(song_routes(songs))
        .fallback(|| async { ApiError::RouteNotFound })
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_requests))
                .layer(cors_layer(config)),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log_event(Event::ShutdownStart);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn songs() -> Arc<SongCollection<MemoryStore>> {
        Arc::new(SongCollection::new(MemoryStore::new()))
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8081), songs());
        assert_eq!(server.socket_addr(), "0.0.0.0:8081");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, songs()).router();
    }
}
