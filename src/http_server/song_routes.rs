//! Song HTTP Routes
//!
//! CRUD over the song collection, addressed by business id.
//!
//! Create and update each take two store round trips (look up, then write)
//! with nothing holding the record in between. Two concurrent creates of
//! the same id can both pass the lookup and both insert.

use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use mongodb::bson::Bson;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::errors::{ApiError, ApiResult, MessageResponse};
use crate::serializer;
use crate::store::collection::{ID_FIELD, STORAGE_ID_FIELD};
use crate::store::{SongCollection, SongStore};

// ==================
// Shared State
// ==================

/// Handler state: the song collection behind any store
pub type SongState<S> = Arc<SongCollection<S>>;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Value>,
}

/// Business id taken from `/song/{id}`
///
/// Only non-negative integers match; anything else is answered as an
/// unknown route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongId(pub i64);

impl SongId {
    fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(SongId)
    }

    fn key(self) -> Bson {
        Bson::Int64(self.0)
    }
}

#[async_trait]
impl<St> FromRequestParts<St> for SongId
where
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::RouteNotFound)?;
        SongId::parse(&raw).ok_or(ApiError::RouteNotFound)
    }
}

// ==================
// Song Routes
// ==================

/// Create song routes
pub fn song_routes<S: SongStore>(songs: SongState<S>) -> Router {
    Router::new()
        .route("/count", get(count_handler::<S>))
        .route(
            "/song",
            get(list_songs_handler::<S>).post(create_song_handler::<S>),
        )
        .route(
            "/song/:id",
            get(get_song_handler::<S>)
                .put(update_song_handler::<S>)
                .delete(delete_song_handler::<S>),
        )
        .with_state(songs)
}

// ==================
// Helper Functions
// ==================

/// Body as a JSON object; anything else is invalid data
fn parse_object(body: &Bytes) -> ApiResult<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(ApiError::InvalidData),
    }
}

/// How an id reads inside a message: strings bare, everything else as JSON
fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ==================
// Handlers
// ==================

async fn count_handler<S: SongStore>(
    State(songs): State<SongState<S>>,
) -> ApiResult<Json<CountResponse>> {
    let count = songs.count().await?;
    if count == 0 {
        return Err(ApiError::NoData);
    }
    Ok(Json(CountResponse { count }))
}

async fn list_songs_handler<S: SongStore>(
    State(songs): State<SongState<S>>,
) -> ApiResult<Json<SongsResponse>> {
    let all = songs.all().await?;
    if all.is_empty() {
        return Err(ApiError::NoData);
    }
    Ok(Json(SongsResponse {
        songs: serializer::to_transport_all(all),
    }))
}

async fn get_song_handler<S: SongStore>(
    State(songs): State<SongState<S>>,
    id: SongId,
) -> ApiResult<Json<Value>> {
    match songs.find_by_id(id.key()).await? {
        Some(song) => Ok(Json(serializer::to_transport(song))),
        None => Err(ApiError::SongNotFound(id.0)),
    }
}

async fn create_song_handler<S: SongStore>(
    State(songs): State<SongState<S>>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let song = parse_object(&body)?;
    let business_id = match song.get(ID_FIELD) {
        Some(id) if !id.is_null() => display_id(id),
        _ => return Err(ApiError::InvalidData),
    };

    let document = serializer::from_transport_object(song).map_err(|_| ApiError::InvalidData)?;
    let key = document.get(ID_FIELD).cloned().unwrap_or(Bson::Null);

    if songs.find_by_id(key).await?.is_some() {
        return Err(ApiError::AlreadyPresent(business_id));
    }

    let inserted_id = songs.insert(document).await?;
    Ok(Json(json!({
        "inserted id": serializer::to_transport_value(inserted_id)
    })))
}

async fn update_song_handler<S: SongStore>(
    State(songs): State<SongState<S>>,
    id: SongId,
    body: Bytes,
) -> ApiResult<Response> {
    let fields = parse_object(&body)?;
    let changes = serializer::from_transport_object(fields).map_err(|_| ApiError::InvalidData)?;

    let Some(existing) = songs.find_by_id(id.key()).await? else {
        return Err(ApiError::NotFound);
    };

    let unchanged = || {
        (
            StatusCode::OK,
            Json(MessageResponse::new("song found, but nothing updated")),
        )
            .into_response()
    };

    if changes.is_empty() {
        return Ok(unchanged());
    }

    let outcome = songs.merge_fields(id.key(), changes).await?;
    if outcome.modified == 0 {
        return Ok(unchanged());
    }

    // Re-read by `_id`: the body may have moved `id` onto another song's value
    let refreshed = match existing.get(STORAGE_ID_FIELD) {
        Some(storage_id) => songs.find_by_storage_id(storage_id.clone()).await?,
        None => None,
    };
    let refreshed = refreshed.map(serializer::to_transport).unwrap_or(Value::Null);
    Ok((StatusCode::CREATED, Json(refreshed)).into_response())
}

async fn delete_song_handler<S: SongStore>(
    State(songs): State<SongState<S>>,
    id: SongId,
) -> ApiResult<StatusCode> {
    if songs.delete_by_id(id.key()).await? == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_id_accepts_digits_only() {
        assert_eq!(SongId::parse("99"), Some(SongId(99)));
        assert_eq!(SongId::parse("0"), Some(SongId(0)));
        assert_eq!(SongId::parse("-1"), None);
        assert_eq!(SongId::parse("+1"), None);
        assert_eq!(SongId::parse("abc"), None);
        assert_eq!(SongId::parse(""), None);
        assert_eq!(SongId::parse("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_object() {
        assert!(parse_object(&Bytes::from_static(br#"{"id": 1}"#)).is_ok());
        assert!(parse_object(&Bytes::from_static(b"[]")).is_err());
        assert!(parse_object(&Bytes::from_static(b"null")).is_err());
        assert!(parse_object(&Bytes::from_static(b"")).is_err());
        assert!(parse_object(&Bytes::from_static(b"{not json")).is_err());
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id(&json!(7)), "7");
        assert_eq!(display_id(&json!("abc")), "abc");
    }
}
