//! songbook - HTTP CRUD service for song records backed by MongoDB
//!
//! The collection is re-seeded from a fixed dataset at every start, then
//! served over JSON: health, count, list, get, create, merge-update and
//! delete by business id.

pub mod app;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod seed;
pub mod serializer;
pub mod store;
