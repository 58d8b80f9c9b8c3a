//! # Document store access
//!
//! The service treats the document store as an opaque engine offering
//! find / insert / update / delete / count over a single collection.
//!
//! - [`SongStore`] is the seam: filters and updates are plain BSON
//!   documents with MongoDB semantics (top-level equality filters, `$set`
//!   updates).
//! - [`MongoStore`] talks to a real MongoDB deployment.
//! - [`MemoryStore`] keeps documents in process with the same matching
//!   rules; tests use it.
//! - [`SongCollection`] is what HTTP handlers see: business-id lookups and
//!   field merges on top of any `SongStore`.

pub mod client;
pub mod collection;
pub mod errors;
pub mod memory;
pub mod mongo;

use std::future::Future;

use mongodb::bson::{Bson, Document};

pub use client::StoreConfig;
pub use collection::SongCollection;
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Outcome of a single-document update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matched by the filter (0 or 1)
    pub matched: u64,
    /// Documents whose contents actually changed (0 or 1)
    pub modified: u64,
}

/// A single collection of documents
///
/// Implementations must be safe to share across concurrent requests.
pub trait SongStore: Send + Sync + 'static {
    /// First document matching `filter`
    fn find_one(&self, filter: Document)
        -> impl Future<Output = StoreResult<Option<Document>>> + Send;

    /// All documents matching `filter`, in insertion order
    fn find(&self, filter: Document) -> impl Future<Output = StoreResult<Vec<Document>>> + Send;

    /// Number of documents matching `filter`
    fn count(&self, filter: Document) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Insert one document, returning the storage identifier (`_id`)
    fn insert_one(&self, document: Document) -> impl Future<Output = StoreResult<Bson>> + Send;

    /// Insert many documents, returning how many were written
    fn insert_many(&self, documents: Vec<Document>)
        -> impl Future<Output = StoreResult<usize>> + Send;

    /// Apply a `$set` update to the first document matching `filter`
    fn update_one(
        &self,
        filter: Document,
        update: Document,
    ) -> impl Future<Output = StoreResult<UpdateOutcome>> + Send;

    /// Delete the first document matching `filter`, returning 0 or 1
    fn delete_one(&self, filter: Document) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Remove the whole collection
    fn drop_collection(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
