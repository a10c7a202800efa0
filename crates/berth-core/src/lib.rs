//! Berth Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout berth:
//! - Identifiers (UnitName, EndpointId)
//! - The relation data model (Relation, RemoteUnit)
//! - The flag store and well-known flag names
//! - Trigger events and the node descriptor
//! - Error taxonomy

pub mod id;
pub mod flag;
pub mod relation;
pub mod descriptor;
pub mod event;
pub mod error;

pub use id::*;
pub use flag::*;
pub use relation::*;
pub use descriptor::*;
pub use event::*;
pub use error::*;
