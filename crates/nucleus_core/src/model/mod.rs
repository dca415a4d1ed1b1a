//! Value model shared by every nucleus implementation.
//!
//! # Responsibility
//! - Define the interface schema contract (`string` / `json`).
//! - Define the statically typed call value passed across the call boundary.
//! - Define the host-supplied entry definition consumed by validation.
//!
//! # Invariants
//! - A `CallValue` variant always corresponds to exactly one schema.
//! - Schema names are lower-case and case-sensitive on the wire.

pub mod entry;
pub mod interface;
pub mod value;
