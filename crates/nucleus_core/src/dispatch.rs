//! Wire-level call dispatch.
//!
//! # Responsibility
//! - Resolve a function's schema before touching its params.
//! - Decode wire params once, call, and encode the result back.

use crate::model::value::CallValue;
use crate::nucleus::{interface_schema, Nucleus, NucleusResult};

/// Calls `name` with a wire-encoded payload and returns the wire-encoded result.
///
/// # Errors
/// - `NucleusError::FunctionNotFound` when `name` is not exposed.
/// - `NucleusError::Decode` when a `json` payload is malformed.
/// - Any error returned by `Nucleus::call`.
pub fn call_encoded<N: Nucleus + ?Sized>(
    nucleus: &mut N,
    name: &str,
    raw_params: &str,
) -> NucleusResult<String> {
    let schema = interface_schema(&*nucleus, name)?;
    let params = CallValue::decode(schema, raw_params)?;
    let result = nucleus.call(name, params)?;
    Ok(result.encode())
}
