//! # HTTP Server Module
//!
//! Axum server exposing the song collection.
//!
//! # Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /count` - Number of songs
//! - `GET /song`, `POST /song` - List and create
//! - `GET|PUT|DELETE /song/{id}` - Read, merge-update and delete by business id

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod middleware;
pub mod server;
pub mod song_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{build_router, HttpServer};
