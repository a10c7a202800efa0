//! Berth State Engine - Authority reconciliation and readiness
//!
//! This crate implements the reconciliation core:
//! - Scanning peer announcements for cluster config
//! - First-wins authority selection
//! - Split-brain detection
//! - Membership evaluation against the chosen config

pub mod reconcile;
pub mod readiness;

pub use reconcile::*;
pub use readiness::*;
