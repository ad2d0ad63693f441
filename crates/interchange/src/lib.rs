//! castable-interchange: declaring record types in a JSON schema document.
//!
//! Field declarations are usually written in code with
//! [`castable_core::RegistryBuilder`]. This crate accepts the same
//! declarations as data, for tooling that generates them or ships them
//! alongside the payloads they describe.

pub mod deserialize;
pub mod types;

pub use deserialize::{from_json, from_str, load_into, load_registry, InterchangeError};
pub use types::*;
