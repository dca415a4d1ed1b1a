//! Registration and construction of nucleus instances.
//!
//! # Responsibility
//! - Register factories under unique, case-sensitive type names.
//! - Build nucleus instances from a type name plus source code.
//!
//! # Invariants
//! - Registered entries are never replaced or removed.
//! - Registration errors are build/wiring defects; startup must not continue.
//! - Unknown type names at `create` time are ordinary recoverable errors.

use crate::nucleus::static_nucleus::{new_static_nucleus, STATIC_NUCLEUS_TYPE};
use crate::nucleus::{Nucleus, NucleusError, NucleusResult};
use log::{debug, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Constructor for one execution-environment type.
///
/// Receives the opaque host context and the raw source code.
pub type NucleusFactory<H> =
    Arc<dyn Fn(&H, &str) -> NucleusResult<Box<dyn Nucleus>> + Send + Sync>;

/// Fatal registration errors.
///
/// Every variant signals conflicting or broken build-time wiring; the startup
/// sequence is expected to abort when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    MissingFactory(String),
    DuplicateType(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFactory(name) => {
                write!(f, "nucleus factory for type `{name}` does not exist")
            }
            Self::DuplicateType(name) => {
                write!(f, "nucleus factory for type `{name}` already registered")
            }
        }
    }
}

impl Error for RegistryError {}

/// Type name to factory mapping, generic over the host context `H`.
///
/// Populate once with `&mut self`, then share by reference: lookups through
/// `create` only need `&self` and are safe from many threads.
pub struct NucleusRegistry<H: ?Sized> {
    factories: BTreeMap<String, NucleusFactory<H>>,
}

impl<H: ?Sized> Default for NucleusRegistry<H> {
    fn default() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for NucleusRegistry<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NucleusRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

impl<H: ?Sized> NucleusRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&H, &str) -> NucleusResult<Box<dyn Nucleus>> + Send + Sync + 'static,
    {
        let factory: NucleusFactory<H> = Arc::new(factory);
        self.register_factory(name, Some(factory))
    }

    /// Registers an optional factory slot under `name`.
    ///
    /// Used by wiring tables where a slot may be left empty.
    ///
    /// # Errors
    /// - `RegistryError::MissingFactory` when `factory` is `None`.
    /// - `RegistryError::DuplicateType` when `name` is already registered.
    pub fn register_factory(
        &mut self,
        name: &str,
        factory: Option<NucleusFactory<H>>,
    ) -> Result<(), RegistryError> {
        let Some(factory) = factory else {
            return Err(RegistryError::MissingFactory(name.to_string()));
        };
        if self.factories.contains_key(name) {
            return Err(RegistryError::DuplicateType(name.to_string()));
        }

        self.factories.insert(name.to_string(), factory);
        info!("event=nucleus_register module=registry status=ok type={name}");
        Ok(())
    }

    /// Registers every execution environment shipped with the distribution.
    ///
    /// Call at most once per registry; a second call fails with
    /// `RegistryError::DuplicateType`.
    pub fn register_builtin_nucleii(&mut self) -> Result<(), RegistryError>
    where
        H: 'static,
    {
        self.register(STATIC_NUCLEUS_TYPE, new_static_nucleus::<H>)
    }

    /// Builds a nucleus of `type_name` from `code`.
    ///
    /// The factory result is returned unchanged.
    ///
    /// # Errors
    /// - `NucleusError::UnknownType` listing every registered name when
    ///   `type_name` is not registered.
    /// - Any construction error returned by the factory.
    pub fn create(&self, host: &H, type_name: &str, code: &str) -> NucleusResult<Box<dyn Nucleus>> {
        let Some(factory) = self.factories.get(type_name) else {
            return Err(NucleusError::UnknownType {
                requested: type_name.to_string(),
                available: self.type_names(),
            });
        };

        debug!(
            "event=nucleus_create module=registry status=start type={type_name} code_bytes={}",
            code.len()
        );
        factory(host, code)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Returns sorted registered type names.
    pub fn type_names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}
