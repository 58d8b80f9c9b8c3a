//! MongoDB-backed store

use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document};
use mongodb::{Client, Collection};

use super::client::StoreConfig;
use super::errors::StoreResult;
use super::{SongStore, UpdateOutcome};

/// A collection handle on a MongoDB deployment
///
/// The driver pools connections internally, so one `MongoStore` serves every
/// request. Constructing it does not touch the network; the first operation
/// does.
#[derive(Clone)]
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    /// Build a client for the configured deployment and select the collection
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let url = config.connection_url()?;
        let client = Client::with_uri_str(&url).await?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);
        Ok(Self { collection })
    }
}

impl SongStore for MongoStore {
    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.collection.find_one(filter).await?)
    }

    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        let cursor = self.collection.find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn count(&self, filter: Document) -> StoreResult<u64> {
        Ok(self.collection.count_documents(filter).await?)
    }

    async fn insert_one(&self, document: Document) -> StoreResult<Bson> {
        let result = self.collection.insert_one(document).await?;
        Ok(result.inserted_id)
    }

    async fn insert_many(&self, documents: Vec<Document>) -> StoreResult<usize> {
        // The driver rejects an empty batch
        if documents.is_empty() {
            return Ok(0);
        }
        let result = self.collection.insert_many(documents).await?;
        Ok(result.inserted_ids.len())
    }

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<UpdateOutcome> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count)
    }

    async fn drop_collection(&self) -> StoreResult<()> {
        self.collection.drop().await?;
        Ok(())
    }
}
