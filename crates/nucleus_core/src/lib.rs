//! Pluggable execution environments ("nuclei") for application chains.
//! Hosts register nucleus factories by type name, build instances from source
//! code, and drive them through one call/validation contract.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod model;
pub mod nucleus;
pub mod registry;

pub use config::{load_chain_manifest, ChainManifest, ConfigError, NucleusSection};
pub use dispatch::call_encoded;
pub use logging::{default_log_level, init_logging, LoggingConfig};
pub use model::entry::EntryDef;
pub use model::interface::{Interface, InterfaceSchemaType, UnsupportedSchemaError};
pub use model::value::CallValue;
pub use nucleus::static_nucleus::{new_static_nucleus, StaticNucleus, STATIC_NUCLEUS_TYPE};
pub use nucleus::{
    interface_schema, InterfaceTable, Nucleus, NucleusBuilder, NucleusError, NucleusResult,
    NucleusState,
};
pub use registry::{NucleusFactory, NucleusRegistry, RegistryError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
