//! Nucleus type registry.
//!
//! This module maps execution-environment type names to factories. The
//! registry is an explicit value built during startup and handed to the host;
//! there is no process-wide singleton.

pub mod nucleus_registry;

pub use nucleus_registry::{NucleusFactory, NucleusRegistry, RegistryError};
