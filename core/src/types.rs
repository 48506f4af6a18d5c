//! Domain types for the PetFriends API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the acceptance suite catches drift between the two crates. Request inputs
//! are deliberately loose (`PetForm` is a list of text fields) because the
//! service, not the client, decides what a valid pet looks like.

use std::fmt::Display;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A pet record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub created_at: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Ordered form fields describing a pet.
///
/// Values are anything displayable so that callers can send numbers where
/// the service expects text (and the other way around). Fields can be
/// dropped or added to probe how the service handles malformed payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    fields: Vec<(String, String)>,
}

impl PetForm {
    pub fn new(name: impl Display, animal_type: impl Display, age: impl Display) -> Self {
        Self::empty()
            .field("name", name)
            .field("animal_type", animal_type)
            .field("age", age)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing an existing field of the same name in
    /// place or appending a new one.
    pub fn field(mut self, key: &str, value: impl Display) -> Self {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fields.retain(|(k, _)| k != key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// An image file ready to be attached to a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name).to_string(),
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ApiError::PhotoUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(&file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Decoded response body.
///
/// The service answers most calls with JSON but some failures (notably 403)
/// come back as plain text or HTML, and deletes come back empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

/// Uniform `(status, body)` result of every API operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Top-level field of a JSON object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => value.as_object()?.get(key),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The `pets` sequence of a list response.
    pub fn pets(&self) -> Result<Vec<Pet>, ApiError> {
        let pets = self.get("pets").ok_or_else(|| {
            ApiError::DeserializationError(format!(
                "response with status {} has no `pets` field",
                self.status
            ))
        })?;
        serde_json::from_value(pets.clone())
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The body as a single pet record, for create/update responses.
    pub fn pet(&self) -> Result<Pet, ApiError> {
        match &self.body {
            ResponseBody::Json(value) => serde_json::from_value(value.clone())
                .map_err(|e| ApiError::DeserializationError(e.to_string())),
            ResponseBody::Text(text) => Err(ApiError::DeserializationError(format!(
                "expected a pet record, got text: {text}"
            ))),
        }
    }
}
