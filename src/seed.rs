//! Startup seeding
//!
//! Loads the fixed song dataset and replaces the collection's contents with
//! it. Runs once, before the router accepts traffic. Whatever clients wrote
//! during the previous run is discarded.

use std::fs;
use std::path::{Path, PathBuf};

use mongodb::bson::Document;
use serde_json::Value;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::serializer::{self, SerializerError};
use crate::store::{SongCollection, SongStore, StoreError};

/// Seeding result type
pub type SeedResult<T> = Result<T, SeedError>;

/// Seeding failures; all of them abort startup
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed dataset {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed dataset must be a JSON array of objects")]
    NotAnArray,

    #[error("seed record {index} is invalid: {source}")]
    Record {
        index: usize,
        #[source]
        source: SerializerError,
    },

    #[error("store rejected seed dataset: {0}")]
    Store(#[from] StoreError),
}

/// Parse a dataset held in memory
pub fn parse_dataset(raw: &str, path: &Path) -> SeedResult<Vec<Document>> {
    let value: Value = serde_json::from_str(raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(records) = value else {
        return Err(SeedError::NotAnArray);
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serializer::from_transport(record).map_err(|source| SeedError::Record { index, source })
        })
        .collect()
}

/// Read and parse the dataset file
pub fn load_dataset(path: &Path) -> SeedResult<Vec<Document>> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let songs = parse_dataset(&raw, path)?;

    let count = songs.len().to_string();
    let path_str = path.display().to_string();
    log_event_with_fields(
        Event::SeedLoaded,
        &[("path", path_str.as_str()), ("songs", count.as_str())],
    );
    Ok(songs)
}

/// Drop the collection and insert `dataset`, returning the number written
pub async fn seed<S: SongStore>(songs: &SongCollection<S>, dataset: Vec<Document>) -> SeedResult<usize> {
    // On failure the scope logs SEED_INCOMPLETE; the caller reports SEED_FAILED
    let scope = ObservationScope::new("SEED");
    let written = songs.replace_all(dataset).await?;
    let count = written.to_string();
    scope.complete_with_fields(&[("songs", count.as_str())]);
    Ok(written)
}

/// Load the dataset at `path` and seed the collection with it
pub async fn seed_from_file<S: SongStore>(songs: &SongCollection<S>, path: &Path) -> SeedResult<usize> {
    let dataset = load_dataset(path)?;
    seed(songs, dataset).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use mongodb::bson::{doc, Bson};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_dataset() {
        let songs = parse_dataset(
            r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].get_str("title").unwrap(), "B");
    }

    #[test]
    fn test_dataset_must_be_array() {
        let err = parse_dataset(r#"{"id": 1}"#, Path::new("inline")).unwrap_err();
        assert!(matches!(err, SeedError::NotAnArray));
    }

    #[test]
    fn test_dataset_records_must_be_objects() {
        let err = parse_dataset(r#"[{"id": 1}, 2]"#, Path::new("inline")).unwrap_err();
        assert!(matches!(err, SeedError::Record { index: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/songs.json")).unwrap_err();
        assert!(matches!(err, SeedError::Read { .. }));
    }

    #[test]
    fn test_invalid_json_file() {
        let file = write_dataset("[{");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_seed_replaces_contents() {
        let songs = SongCollection::new(MemoryStore::new());
        songs.insert(doc! { "id": 77, "title": "stale" }).await.unwrap();

        let file = write_dataset(r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#);
        let written = seed_from_file(&songs, file.path()).await.unwrap();

        assert_eq!(written, 3);
        assert_eq!(songs.count().await.unwrap(), 3);
        assert!(songs.find_by_id(Bson::Int64(77)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeding_twice_is_idempotent() {
        let songs = SongCollection::new(MemoryStore::new());
        let dataset = vec![doc! { "id": 1 }, doc! { "id": 2 }];

        seed(&songs, dataset.clone()).await.unwrap();
        seed(&songs, dataset).await.unwrap();
        assert_eq!(songs.count().await.unwrap(), 2);
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/songs.json");
        let songs = load_dataset(&path).unwrap();
        assert!(!songs.is_empty());
        assert!(songs.iter().all(|song| song.contains_key("id")));
    }
}
