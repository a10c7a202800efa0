//! Berth Endpoint - Controller-relation adapter runtime
//!
//! This crate ties the reconciliation core to the flag surface:
//! - Signal publishing (available/changed flag pair, self-announcement)
//! - The endpoint controller state machine driven by trigger events

pub mod publisher;
pub mod controller;

pub use publisher::*;
pub use controller::*;
