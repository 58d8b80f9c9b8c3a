//! Document ⇄ transport conversion
//!
//! Store documents carry BSON-only types (ObjectId, datetimes, binary...).
//! On the way out they become relaxed extended JSON, so an ObjectId reads
//! `{"$oid": "<hex>"}` and plain numbers stay plain. On the way in the same
//! notation is accepted, so a client can echo a record back.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to turn client JSON into a store document
#[derive(Debug, Error)]
pub enum SerializerError {
    /// The value used extended-JSON keys with invalid contents
    #[error("invalid extended JSON: {0}")]
    ExtendedJson(String),

    /// The value was not a JSON object
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Render any store value as transport JSON
pub fn to_transport_value(value: Bson) -> Value {
    value.into_relaxed_extjson()
}

/// Render a store document as transport JSON
pub fn to_transport(document: Document) -> Value {
    to_transport_value(Bson::Document(document))
}

/// Render a batch of store documents
pub fn to_transport_all(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(to_transport).collect()
}

/// Parse a single transport value into a store value
pub fn from_transport_value(value: Value) -> Result<Bson, SerializerError> {
    Bson::try_from(value).map_err(|e| SerializerError::ExtendedJson(e.to_string()))
}

/// Parse a transport JSON object into a store document
pub fn from_transport(value: Value) -> Result<Document, SerializerError> {
    match value {
        Value::Object(object) => from_transport_object(object),
        other => Err(SerializerError::NotAnObject(kind(&other))),
    }
}

/// Parse the fields of a transport JSON object into a store document
pub fn from_transport_object(object: Map<String, Value>) -> Result<Document, SerializerError> {
    let mut document = Document::new();
    for (key, value) in object {
        document.insert(key, from_transport_value(value)?);
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn test_object_id_renders_as_oid() {
        let oid = ObjectId::new();
        let value = to_transport(doc! { "_id": oid, "id": 1, "title": "A" });
        assert_eq!(value["_id"], json!({ "$oid": oid.to_hex() }));
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["title"], json!("A"));
    }

    #[test]
    fn test_wide_integers_stay_plain_numbers() {
        let value = to_transport(doc! { "id": 99_i64, "rating": 4.5 });
        assert_eq!(value, json!({ "id": 99, "rating": 4.5 }));
    }

    #[test]
    fn test_oid_notation_parses_back() {
        let oid = ObjectId::new();
        let document = from_transport(json!({ "_id": { "$oid": oid.to_hex() } })).unwrap();
        assert_eq!(document.get_object_id("_id").unwrap(), oid);
    }

    #[test]
    fn test_every_field_converted() {
        let document = from_transport(json!({ "id": 1, "title": "A", "album": "B" })).unwrap();
        assert_eq!(document.len(), 3);
        assert_eq!(document.get_i32("id").unwrap(), 1);
        assert_eq!(document.get_str("album").unwrap(), "B");
    }

    #[test]
    fn test_nested_payload_carried_through() {
        let input = json!({ "id": 5, "meta": { "tags": ["a", "b"], "bpm": 120 } });
        let document = from_transport(input.clone()).unwrap();
        assert_eq!(to_transport(document), input);
    }

    #[test]
    fn test_non_object_rejected() {
        let err = from_transport(json!([1, 2])).unwrap_err();
        assert!(matches!(err, SerializerError::NotAnObject("an array")));
    }

    #[test]
    fn test_malformed_oid_rejected() {
        let err = from_transport(json!({ "_id": { "$oid": "not-hex" } })).unwrap_err();
        assert!(matches!(err, SerializerError::ExtendedJson(_)));
    }
}
