//! Song collection
//!
//! Business-level access to the song records. Lookups go through the
//! client-meaningful `id` field; the storage `_id` is only used to re-read
//! a record already in hand.

use mongodb::bson::{doc, Bson, Document};

use super::errors::StoreResult;
use super::{SongStore, UpdateOutcome};

/// Field carrying the business identifier
pub const ID_FIELD: &str = "id";

/// Store-assigned primary key
pub const STORAGE_ID_FIELD: &str = "_id";

/// The song collection, shared by every handler
pub struct SongCollection<S> {
    store: S,
}

impl<S: SongStore> SongCollection<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn by_id(id: Bson) -> Document {
        let mut filter = Document::new();
        filter.insert(ID_FIELD, id);
        filter
    }

    /// Total number of songs
    pub async fn count(&self) -> StoreResult<u64> {
        self.store.count(Document::new()).await
    }

    /// Every song, in store order
    pub async fn all(&self) -> StoreResult<Vec<Document>> {
        self.store.find(Document::new()).await
    }

    /// The song whose business id equals `id`
    pub async fn find_by_id(&self, id: Bson) -> StoreResult<Option<Document>> {
        self.store.find_one(Self::by_id(id)).await
    }

    /// Re-read a song by its store-assigned `_id`
    pub async fn find_by_storage_id(&self, storage_id: Bson) -> StoreResult<Option<Document>> {
        let mut filter = Document::new();
        filter.insert(STORAGE_ID_FIELD, storage_id);
        self.store.find_one(filter).await
    }

    /// Insert a song, returning the store-assigned `_id`
    ///
    /// No uniqueness check happens here; callers look the id up first.
    pub async fn insert(&self, song: Document) -> StoreResult<Bson> {
        self.store.insert_one(song).await
    }

    /// Merge `fields` into the song with business id `id`
    ///
    /// Named fields are replaced or added; other fields are left alone.
    pub async fn merge_fields(&self, id: Bson, fields: Document) -> StoreResult<UpdateOutcome> {
        self.store
            .update_one(Self::by_id(id), doc! { "$set": fields })
            .await
    }

    /// Delete the song with business id `id`, returning 0 or 1
    pub async fn delete_by_id(&self, id: Bson) -> StoreResult<u64> {
        self.store.delete_one(Self::by_id(id)).await
    }

    /// Drop the collection and bulk-insert `songs` in its place
    pub async fn replace_all(&self, songs: Vec<Document>) -> StoreResult<usize> {
        self.store.drop_collection().await?;
        self.store.insert_many(songs).await
    }
}
