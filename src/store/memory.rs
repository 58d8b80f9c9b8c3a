//! In-process document store
//!
//! Mirrors the subset of MongoDB semantics the service relies on:
//! top-level equality filters (numbers compare by value across widths,
//! `null` matches a missing field), `$set` updates that report whether
//! anything changed, and store-assigned ObjectIds.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::{SongStore, UpdateOutcome};

/// Documents held in memory, in insertion order
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn values_equal(actual: &Bson, expected: &Bson) -> bool {
    match (as_number(actual), as_number(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match document.get(key) {
        Some(actual) => values_equal(actual, expected),
        None => matches!(expected, Bson::Null),
    })
}

/// Put `_id` first, assigning a fresh ObjectId when absent
fn with_storage_id(document: Document) -> (Bson, Document) {
    let id = match document.get("_id") {
        Some(id) => id.clone(),
        None => Bson::ObjectId(ObjectId::new()),
    };
    let mut stored = Document::new();
    stored.insert("_id", id.clone());
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    (id, stored)
}

fn set_fields(update: &Document) -> StoreResult<&Document> {
    match update.get("$set") {
        Some(Bson::Document(fields)) if update.len() == 1 => Ok(fields),
        _ => Err(StoreError::backend("only single-operator $set updates are supported")),
    }
}

impl SongStore for MemoryStore {
    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| matches(d, &filter)).cloned())
    }

    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| matches(d, &filter)).cloned().collect())
    }

    async fn count(&self, filter: Document) -> StoreResult<u64> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| matches(d, &filter)).count() as u64)
    }

    async fn insert_one(&self, document: Document) -> StoreResult<Bson> {
        let (id, stored) = with_storage_id(document);
        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(StoreError::DuplicateKey(id.to_string()));
        }
        documents.push(stored);
        Ok(id)
    }

    async fn insert_many(&self, documents: Vec<Document>) -> StoreResult<usize> {
        let mut inserted = 0;
        for document in documents {
            self.insert_one(document).await?;
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<UpdateOutcome> {
        let fields = set_fields(&update)?;
        let mut documents = self.documents.write().await;
        let Some(document) = documents.iter_mut().find(|d| matches(d, &filter)) else {
            return Ok(UpdateOutcome::default());
        };

        if let Some(new_id) = fields.get("_id") {
            if document.get("_id") != Some(new_id) {
                return Err(StoreError::ImmutableField("_id".to_string()));
            }
        }

        let mut modified = false;
        for (key, value) in fields {
            if document.get(key) != Some(value) {
                document.insert(key.clone(), value.clone());
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let mut documents = self.documents.write().await;
        match documents.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn drop_collection(&self) -> StoreResult<()> {
        self.documents.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_object_id_first() {
        let store = MemoryStore::new();
        let id = store.insert_one(doc! { "id": 1, "title": "A" }).await.unwrap();
        assert!(matches!(id, Bson::ObjectId(_)));

        let stored = store.find_one(doc! { "id": 1 }).await.unwrap().unwrap();
        assert_eq!(stored.keys().next().map(String::as_str), Some("_id"));
        assert_eq!(stored.get("_id"), Some(&id));
    }

    #[tokio::test]
    async fn test_numeric_filter_ignores_width() {
        let store = MemoryStore::new();
        store.insert_one(doc! { "id": 7_i32 }).await.unwrap();

        assert!(store.find_one(doc! { "id": 7_i64 }).await.unwrap().is_some());
        assert!(store.find_one(doc! { "id": 7.0 }).await.unwrap().is_some());
        assert!(store.find_one(doc! { "id": "7" }).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_null_filter_matches_missing_field() {
        let store = MemoryStore::new();
        store.insert_one(doc! { "title": "untitled" }).await.unwrap();
        assert_eq!(store.count(doc! { "id": Bson::Null }).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_storage_id_rejected() {
        let store = MemoryStore::new();
        let oid = ObjectId::new();
        store.insert_one(doc! { "_id": oid, "id": 1 }).await.unwrap();
        let err = store.insert_one(doc! { "_id": oid, "id": 2 }).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_set_reports_modification() {
        let store = MemoryStore::new();
        store.insert_one(doc! { "id": 1, "title": "A", "year": 1999 }).await.unwrap();

        let same = store
            .update_one(doc! { "id": 1 }, doc! { "$set": { "title": "A" } })
            .await
            .unwrap();
        assert_eq!(same, UpdateOutcome { matched: 1, modified: 0 });

        let changed = store
            .update_one(doc! { "id": 1 }, doc! { "$set": { "title": "B", "genre": "rock" } })
            .await
            .unwrap();
        assert_eq!(changed, UpdateOutcome { matched: 1, modified: 1 });

        let stored = store.find_one(doc! { "id": 1 }).await.unwrap().unwrap();
        assert_eq!(stored.get_str("title").unwrap(), "B");
        assert_eq!(stored.get_str("genre").unwrap(), "rock");
        assert_eq!(stored.get_i32("year").unwrap(), 1999);
    }

    #[tokio::test]
    async fn test_set_on_missing_document() {
        let store = MemoryStore::new();
        let outcome = store
            .update_one(doc! { "id": 1 }, doc! { "$set": { "title": "B" } })
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn test_set_cannot_change_storage_id() {
        let store = MemoryStore::new();
        store.insert_one(doc! { "id": 1 }).await.unwrap();
        let err = store
            .update_one(doc! { "id": 1 }, doc! { "$set": { "_id": ObjectId::new() } })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ImmutableField(_)));
    }

    #[tokio::test]
    async fn test_replacement_updates_rejected() {
        let store = MemoryStore::new();
        store.insert_one(doc! { "id": 1 }).await.unwrap();
        let err = store
            .update_one(doc! { "id": 1 }, doc! { "title": "B" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_delete_one_then_none() {
        let store = MemoryStore::new();
        store.insert_many(vec![doc! { "id": 1 }, doc! { "id": 2 }]).await.unwrap();

        assert_eq!(store.delete_one(doc! { "id": 1 }).await.unwrap(), 1);
        assert_eq!(store.delete_one(doc! { "id": 1 }).await.unwrap(), 0);
        assert_eq!(store.count(Document::new()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_drop_collection() {
        let store = MemoryStore::new();
        store.insert_many(vec![doc! { "id": 1 }, doc! { "id": 2 }]).await.unwrap();
        store.drop_collection().await.unwrap();
        assert!(store.find(Document::new()).await.unwrap().is_empty());
    }
}
