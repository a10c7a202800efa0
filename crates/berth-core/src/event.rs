//! Trigger events delivered by the surrounding framework
//!
//! The framework raises the matching trigger flag and then invokes the
//! endpoint's dispatch entry point. Modeled as an explicit enum so tests
//! can drive the controller directly and deterministically.

use crate::EndpointId;
use crate::{FLAG_CHANGED, FLAG_DEPARTED};

/// The two external triggers that start a reconciliation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointEvent {
    /// Peer set or peer data changed.
    PeersChanged,
    /// A peer left the relation.
    PeerDeparted,
}

impl EndpointEvent {
    /// The trigger flag the framework raises for this event.
    pub fn flag_name(&self, endpoint: &EndpointId) -> String {
        match self {
            EndpointEvent::PeersChanged => endpoint.changed_flag(),
            EndpointEvent::PeerDeparted => endpoint.departed_flag(),
        }
    }

    /// Parse a trigger flag back into an event, if it is one.
    pub fn from_flag(endpoint: &EndpointId, flag: &str) -> Option<Self> {
        if flag == endpoint.expand(FLAG_CHANGED) {
            Some(EndpointEvent::PeersChanged)
        } else if flag == endpoint.expand(FLAG_DEPARTED) {
            Some(EndpointEvent::PeerDeparted)
        } else {
            None
        }
    }
}
