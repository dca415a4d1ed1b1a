//! Call-boundary value model.
//!
//! # Responsibility
//! - Carry params, results and entries as a schema-tagged union.
//! - Convert between wire strings and typed values exactly once.
//!
//! # Invariants
//! - `CallValue::Str` is only produced for `InterfaceSchemaType::String`.
//! - `CallValue::Json` is only produced for `InterfaceSchemaType::Json`.

use crate::model::interface::InterfaceSchemaType;
use crate::nucleus::{NucleusError, NucleusResult};
use serde::{Deserialize, Serialize};

/// Value passed to and returned from a nucleus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", content = "value", rename_all = "snake_case")]
pub enum CallValue {
    #[serde(rename = "string")]
    Str(String),
    Json(serde_json::Value),
}

impl CallValue {
    /// Schema this value encodes under.
    pub fn schema(&self) -> InterfaceSchemaType {
        match self {
            Self::Str(_) => InterfaceSchemaType::String,
            Self::Json(_) => InterfaceSchemaType::Json,
        }
    }

    /// Decodes a wire payload according to `schema`.
    ///
    /// # Errors
    /// - `NucleusError::Decode` when a `json` payload is malformed.
    pub fn decode(schema: InterfaceSchemaType, raw: &str) -> NucleusResult<Self> {
        match schema {
            InterfaceSchemaType::String => Ok(Self::Str(raw.to_string())),
            InterfaceSchemaType::Json => serde_json::from_str(raw)
                .map(Self::Json)
                .map_err(|err| NucleusError::Decode(err.to_string())),
        }
    }

    /// Encodes this value as a wire payload (compact JSON for `Json`).
    pub fn encode(&self) -> String {
        match self {
            Self::Str(value) => value.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for CallValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for CallValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<serde_json::Value> for CallValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}
