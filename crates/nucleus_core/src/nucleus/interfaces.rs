//! Exposed-interface bookkeeping and schema lookup.
//!
//! # Responsibility
//! - Store the functions a nucleus exposes while loading.
//! - Track the `Constructed -> Loading -> Ready` lifecycle.
//! - Resolve a function's schema for call-boundary encoding.
//!
//! # Invariants
//! - Exposed names are unique within one table.
//! - Nothing can be exposed once the table is sealed.
//! - Iteration order equals exposure order.

use super::{Nucleus, NucleusBuilder, NucleusError, NucleusResult};
use crate::model::interface::{Interface, InterfaceSchemaType};

/// Lifecycle of one nucleus instance.
///
/// `Loading` is only observable between the first exposure and sealing. A
/// nucleus that exposes nothing moves straight from `Constructed` to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NucleusState {
    /// Factory returned, nothing exposed yet.
    Constructed,
    /// Source is being loaded and functions exposed.
    Loading,
    /// Interfaces fixed; `call` and `validate_entry` usable.
    Ready,
}

/// Ordered, duplicate-free set of exposed functions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTable {
    entries: Vec<Interface>,
    sealed: bool,
}

impl InterfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NucleusState {
        if self.sealed {
            NucleusState::Ready
        } else if self.entries.is_empty() {
            NucleusState::Constructed
        } else {
            NucleusState::Loading
        }
    }

    /// Fixes the exposed set. Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn as_slice(&self) -> &[Interface] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn schema_of(&self, name: &str) -> Option<InterfaceSchemaType> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.schema)
    }
}

impl NucleusBuilder for InterfaceTable {
    fn expose(&mut self, interface: Interface) -> NucleusResult<()> {
        if self.sealed {
            return Err(NucleusError::InterfacesSealed(interface.name));
        }
        if self.schema_of(&interface.name).is_some() {
            return Err(NucleusError::DuplicateInterface(interface.name));
        }
        self.entries.push(interface);
        Ok(())
    }
}

/// Returns the schema of the exposed function `name`.
///
/// Scans `nucleus.interfaces()` and returns the first match.
///
/// # Errors
/// - `NucleusError::FunctionNotFound` when no exposed function has that name.
pub fn interface_schema<N: Nucleus + ?Sized>(
    nucleus: &N,
    name: &str,
) -> NucleusResult<InterfaceSchemaType> {
    nucleus
        .interfaces()
        .iter()
        .find(|interface| interface.name == name)
        .map(|interface| interface.schema)
        .ok_or_else(|| NucleusError::FunctionNotFound(name.to_string()))
}
