//! Todo records and the request payloads that create or change them.
//!
//! # Design
//! `TodoId` wraps the store's `ObjectId` but renders as a plain hex string in
//! JSON, so API clients never see BSON extended syntax. Create payloads are
//! validated from raw JSON to produce field-level messages; update payloads
//! deserialize straight into `Option` fields so an explicit `0` or `false` is
//! distinguishable from an omitted field.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::{self, ObjectId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ApiError;

/// Maximum length of a todo's text, counted in UTF-16 code units.
pub const VALUE_MAX_LEN: usize = 50;

/// Identifier of a stored todo, assigned on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(ObjectId);

impl TodoId {
    /// Generate a fresh identifier. Used by stores that assign ids themselves.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for TodoId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl FromStr for TodoId {
    type Err = oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single todo item as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub value: String,
    pub order: i64,
    /// When the todo was completed; `None` while it is still open.
    pub done_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Mark the todo completed at `now`, or reopen it.
    pub fn set_done(&mut self, done: bool, now: DateTime<Utc>) {
        self.done_at = done.then_some(now);
    }

    pub fn is_done(&self) -> bool {
        self.done_at.is_some()
    }
}

/// A todo that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub value: String,
    pub order: i64,
}

/// Validated payload of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    pub value: String,
}

impl CreateTodo {
    /// Validate a raw JSON body. The first violation found is reported.
    pub fn validate(body: &Value) -> Result<Self, ApiError> {
        let Value::Object(fields) = body else {
            return Err(ApiError::validation("\"value\" must be of type object"));
        };

        let value = match fields.get("value") {
            None => return Err(ApiError::validation("\"value\" is required")),
            Some(Value::String(value)) => value,
            Some(_) => return Err(ApiError::validation("\"value\" must be a string")),
        };
        if value.is_empty() {
            return Err(ApiError::validation("\"value\" is not allowed to be empty"));
        }
        if value.encode_utf16().count() > VALUE_MAX_LEN {
            return Err(ApiError::validation(format!(
                "\"value\" length must be less than or equal to {VALUE_MAX_LEN} characters long"
            )));
        }

        if let Some(unknown) = fields.keys().find(|key| key.as_str() != "value") {
            return Err(ApiError::validation(format!("\"{unknown}\" is not allowed")));
        }

        Ok(Self {
            value: value.clone(),
        })
    }
}

/// Payload of `PATCH /todos/{todoId}`. Every field is optional; only the
/// fields present in the request are applied. A `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateTodo {
    pub order: Option<i64>,
    pub done: Option<bool>,
    pub value: Option<String>,
}

/// Body of a successful create.
#[derive(Debug, Serialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

/// Body of a successful list.
#[derive(Debug, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}
