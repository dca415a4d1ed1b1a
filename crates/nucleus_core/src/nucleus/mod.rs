//! Nucleus execution-environment contracts.
//!
//! # Responsibility
//! - Define the public `Nucleus` capability driven by hosts and dispatchers.
//! - Define the internal `NucleusBuilder` capability used while loading code.
//! - Define the recoverable error tier shared by every implementation.
//!
//! # Invariants
//! - Hosts only ever hold `Box<dyn Nucleus>`; `expose` is unreachable from it.
//! - Errors raised by embedded logic are propagated unchanged.

use crate::model::entry::EntryDef;
use crate::model::interface::{Interface, InterfaceSchemaType};
use crate::model::value::CallValue;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod interfaces;
pub mod static_nucleus;

pub use interfaces::{interface_schema, InterfaceTable, NucleusState};

pub type NucleusResult<T> = Result<T, NucleusError>;

/// Public capability of one execution-environment instance.
///
/// Instances are owned by exactly one host context. `call` takes `&mut self`,
/// so concurrent callers must serialize access themselves.
pub trait Nucleus {
    /// Registered type name of this implementation.
    fn nucleus_type(&self) -> &str;

    /// Validates `entry` against `def` using the embedded validation logic.
    ///
    /// # Errors
    /// - `NucleusError::Validation` naming the violated rule.
    /// - `NucleusError::SchemaMismatch` when `entry` does not match `def.format`.
    fn validate_entry(&self, def: &EntryDef, entry: &CallValue) -> NucleusResult<()>;

    /// Every exposed function, in exposure order.
    fn interfaces(&self) -> &[Interface];

    /// Invokes the exposed function `name` synchronously.
    ///
    /// # Errors
    /// - `NucleusError::FunctionNotFound` when `name` is not exposed.
    /// - Any error raised by the embedded logic.
    fn call(&mut self, name: &str, params: CallValue) -> NucleusResult<CallValue>;
}

impl<N: Nucleus + ?Sized> Nucleus for Box<N> {
    fn nucleus_type(&self) -> &str {
        (**self).nucleus_type()
    }

    fn validate_entry(&self, def: &EntryDef, entry: &CallValue) -> NucleusResult<()> {
        (**self).validate_entry(def, entry)
    }

    fn interfaces(&self) -> &[Interface] {
        (**self).interfaces()
    }

    fn call(&mut self, name: &str, params: CallValue) -> NucleusResult<CallValue> {
        (**self).call(name, params)
    }
}

/// Loading-time capability: makes one function discoverable and callable.
///
/// Only concrete implementations call this, while turning source code into a
/// ready instance.
pub trait NucleusBuilder {
    fn expose(&mut self, interface: Interface) -> NucleusResult<()>;
}

/// Recoverable runtime errors of the nucleus layer.
#[derive(Debug, Clone, PartialEq)]
pub enum NucleusError {
    /// Requested type name is not registered.
    UnknownType {
        requested: String,
        available: Vec<String>,
    },
    FunctionNotFound(String),
    SchemaMismatch {
        target: String,
        expected: InterfaceSchemaType,
        actual: InterfaceSchemaType,
    },
    DuplicateInterface(String),
    /// `expose` after the instance reached `Ready`.
    InterfacesSealed(String),
    Validation {
        entry: String,
        rule: String,
    },
    Decode(String),
    Load(String),
    Execution(String),
}

impl Display for NucleusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType { available, .. } => write!(
                f,
                "invalid nucleus type; must be one of: {}",
                available.join(", ")
            ),
            Self::FunctionNotFound(name) => write!(f, "function not found: {name}"),
            Self::SchemaMismatch {
                target,
                expected,
                actual,
            } => write!(
                f,
                "schema mismatch for `{target}`: expected {expected}, got {actual}"
            ),
            Self::DuplicateInterface(name) => write!(f, "function already exposed: {name}"),
            Self::InterfacesSealed(name) => {
                write!(f, "cannot expose `{name}`: nucleus interfaces are sealed")
            }
            Self::Validation { entry, rule } => {
                write!(f, "entry `{entry}` failed validation rule `{rule}`")
            }
            Self::Decode(message) => write!(f, "failed to decode call params: {message}"),
            Self::Load(message) => write!(f, "failed to load nucleus code: {message}"),
            Self::Execution(message) => write!(f, "nucleus execution failed: {message}"),
        }
    }
}

impl Error for NucleusError {}
