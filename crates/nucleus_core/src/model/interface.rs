//! Exposed-function records and their wire-encoding schema.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Wire-encoding string for plain string payloads.
pub const SCHEMA_STRING: &str = "string";
/// Wire-encoding string for structured JSON payloads.
pub const SCHEMA_JSON: &str = "json";

/// Encoding contract for one exposed function's params and result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceSchemaType {
    /// Opaque string in, string-like result out.
    String,
    /// JSON-compatible value in and out.
    Json,
}

impl InterfaceSchemaType {
    /// Stable string id used in manifests and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => SCHEMA_STRING,
            Self::Json => SCHEMA_JSON,
        }
    }
}

impl Display for InterfaceSchemaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceSchemaType {
    type Err = UnsupportedSchemaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SCHEMA_STRING => Ok(Self::String),
            SCHEMA_JSON => Ok(Self::Json),
            other => Err(UnsupportedSchemaError(other.to_string())),
        }
    }
}

/// Raised when a schema string is neither `string` nor `json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedSchemaError(pub String);

impl Display for UnsupportedSchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "interface schema is unsupported: {} (expected string|json)",
            self.0
        )
    }
}

impl Error for UnsupportedSchemaError {}

/// One callable function exposed by a nucleus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub schema: InterfaceSchemaType,
}

impl Interface {
    pub fn new(name: impl Into<String>, schema: InterfaceSchemaType) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}
