//! Signal publishing
//!
//! Translates readiness transitions into idempotent flag operations and
//! pushes this node's self-description out to the peers.

use std::sync::Arc;

use berth_core::{EndpointId, FlagStore, NodeDescriptor, Relation};

/// Owns the readiness flag pair and the outbound announcement.
pub struct SignalPublisher {
    endpoint: EndpointId,
    flags: Arc<FlagStore>,
}

impl SignalPublisher {
    pub fn new(endpoint: EndpointId, flags: Arc<FlagStore>) -> Self {
        SignalPublisher { endpoint, flags }
    }

    /// Announce this node to the peers on the relation.
    ///
    /// Active and standby controllers both read the same entries; repeated
    /// sends overwrite, never append.
    pub fn publish_self(&self, relation: &mut Relation, descriptor: &NodeDescriptor) {
        tracing::info!(
            hostname = %descriptor.hostname,
            partition = %descriptor.partition,
            default = descriptor.default,
            "sending node info"
        );
        relation.publish(descriptor.to_entries());
    }

    /// Move the readiness flag pair to match the evaluated state.
    ///
    /// On ready: raise `active.available` and `active.changed`. The
    /// `changed` marker stays up until the consumer clears it after
    /// acting; re-evaluation does not clear it. On not-ready: lower both.
    pub fn apply_readiness_transition(&self, ready: bool) {
        let available = self.endpoint.available_flag();
        let changed = self.endpoint.active_changed_flag();

        if ready {
            tracing::info!("controller is ready, raising readiness flags");
            self.flags.set(&available);
            self.flags.set(&changed);
        } else {
            tracing::info!("controller not ready, clearing readiness flags");
            self.flags.clear(&available);
            self.flags.clear(&changed);
        }
    }
}
