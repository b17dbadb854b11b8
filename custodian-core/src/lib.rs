//! Custodian Core
//!
//! Resource model, attribute schemas and the provider contract shared by the
//! Custodian CLI, state backends and providers.

pub mod provider;
pub mod resource;
pub mod schema;
