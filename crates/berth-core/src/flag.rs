//! Flag store - named boolean signals shared with the surrounding framework
//!
//! Flags are the only surface through which readiness and conflict are
//! reported. Set and clear are idempotent; a flag stays raised until
//! something explicitly clears it.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::EndpointId;

/// Trigger flag fragment: the peer set changed.
pub const FLAG_CHANGED: &str = "changed";
/// Trigger flag fragment: a peer departed.
pub const FLAG_DEPARTED: &str = "departed";
/// This node is listed in the active controller's config.
pub const FLAG_ACTIVE_AVAILABLE: &str = "active.available";
/// Readiness transitioned since the consumer last cleared this.
pub const FLAG_ACTIVE_CHANGED: &str = "active.changed";
/// Two controllers presented active config in the same pass.
pub const FLAG_SPLIT_BRAIN: &str = "split-brain";

/// Shared store of raised flags.
///
/// Only the owning endpoint mutates its namespace, but consumers on other
/// components may poll, so the set sits behind a lock.
#[derive(Debug, Default)]
pub struct FlagStore {
    raised: RwLock<HashSet<String>>,
}

impl FlagStore {
    pub fn new() -> Arc<Self> {
        Arc::new(FlagStore::default())
    }

    /// Raise a flag. No-op if already raised.
    pub fn set(&self, name: &str) {
        let inserted = self.raised.write().insert(name.to_string());
        if inserted {
            tracing::debug!(flag = name, "set flag");
        }
    }

    /// Lower a flag. No-op if not raised.
    pub fn clear(&self, name: &str) {
        let removed = self.raised.write().remove(name);
        if removed {
            tracing::debug!(flag = name, "cleared flag");
        }
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.raised.read().contains(name)
    }

    /// Number of currently raised flags.
    pub fn len(&self) -> usize {
        self.raised.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.raised.read().is_empty()
    }
}

impl EndpointId {
    /// `endpoint.<e>.changed` - raised by the framework when peer data changes.
    pub fn changed_flag(&self) -> String {
        self.expand(FLAG_CHANGED)
    }

    /// `endpoint.<e>.departed` - raised by the framework when a peer leaves.
    pub fn departed_flag(&self) -> String {
        self.expand(FLAG_DEPARTED)
    }

    /// `endpoint.<e>.active.available`
    pub fn available_flag(&self) -> String {
        self.expand(FLAG_ACTIVE_AVAILABLE)
    }

    /// `endpoint.<e>.active.changed`
    pub fn active_changed_flag(&self) -> String {
        self.expand(FLAG_ACTIVE_CHANGED)
    }

    /// `endpoint.<e>.split-brain`
    pub fn split_brain_flag(&self) -> String {
        self.expand(FLAG_SPLIT_BRAIN)
    }
}
