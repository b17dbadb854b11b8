//! Wire types of the Backup Recovery API
//!
//! Field names are camelCase on the wire; optional fields are left out of
//! request bodies when unset.

pub mod common;
pub mod connection;
pub mod policy;
pub mod registration;

pub use common::*;
pub use connection::*;
pub use policy::*;
pub use registration::*;
