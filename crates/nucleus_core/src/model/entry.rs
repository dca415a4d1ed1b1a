//! Host-supplied entry definition.

use crate::model::interface::InterfaceSchemaType;
use serde::{Deserialize, Serialize};

/// One entry type as declared by the host chain.
///
/// Validation rules for the type live in the nucleus, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDef {
    /// Entry type name, e.g. `post`.
    pub name: String,
    /// Encoding of entry values of this type.
    pub format: InterfaceSchemaType,
}

impl EntryDef {
    pub fn new(name: impl Into<String>, format: InterfaceSchemaType) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }
}
