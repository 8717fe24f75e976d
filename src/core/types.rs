use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    core::errors::{AppError, AppResult},
    xml::record::NestedRecord,
};

/// Synthetic id telling the store to allocate a new record.
pub const NEW_RECORD_ID: &str = "-1";

/// Flattened bulletin record as written to the key-value store.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertRecord {
    pub status: String,
    pub document_id: String,
    pub revision: String,
    pub category: String,
    pub area_code: String,
    pub title: String,
    pub summary: String,
    pub raw: NestedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl UpsertRecord {
    /// `{document_id}.{revision}`, used when logging upsert decisions.
    pub fn document_key(&self) -> String {
        format!("{}.{}", self.document_id, self.revision)
    }

    /// The incoming revision; a malformed one is the sender's fault.
    pub fn revision_number(&self) -> AppResult<i64> {
        parse_revision(&Value::String(self.revision.clone())).map_err(AppError::InvalidInput)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchPattern {
    Cmp,
}

/// One predicate of a store search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchCriterion {
    pub key: String,
    pub value: String,
    pub pattern: MatchPattern,
}

impl MatchCriterion {
    pub fn exact(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            pattern: MatchPattern::Cmp,
        }
    }
}

/// A record previously written to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredMatch {
    pub id: Value,
    pub revision: Value,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StoredMatch {
    /// The stored revision; a malformed one means the store holds bad data.
    pub fn revision_number(&self) -> AppResult<i64> {
        parse_revision(&self.revision)
            .map_err(|message| AppError::Internal(format!("stored record {}: {message}", self.id)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub code: String,
    pub datalist: Vec<StoredMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Acknowledgement of a `set` call. Only `code` is interpreted; the rest of
/// the store's reply is kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreAck {
    pub code: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(StoreAck),
    Updated(StoreAck),
    Unchanged,
}

/// Revisions travel as decimal strings but some stores echo them back as numbers.
pub fn parse_revision(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| format!("revision {number} is not an integer")),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|err| format!("revision {text:?} is not an integer: {err}")),
        other => Err(format!("revision {other} is not an integer")),
    }
}
