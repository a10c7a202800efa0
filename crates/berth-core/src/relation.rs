//! Relation data model
//!
//! Explicit structs standing in for the framework's relation and unit
//! objects. The transport layer owns mutation: it records each peer's last
//! announcement as it arrives and drops the entry when the peer departs.
//! The reconciler only reads.

use std::collections::HashMap;

use serde_json::Value;

use crate::UnitName;

/// Publish key carrying this node's own network identity.
///
/// The framework resolves the address and materializes it into the local
/// publish bag before any trigger event fires.
pub const KEY_INGRESS_ADDRESS: &str = "ingress-address";

/// Receive key under which controllers announce cluster config.
pub const KEY_PARTITIONS: &str = "partitions";

/// Last-received announcement state for one remote unit.
#[derive(Clone, Debug, Default)]
pub struct RemoteUnit {
    /// Framework-assigned unit name, e.g. `controller/0`.
    pub unit_name: UnitName,
    /// Key/value bag last received from this unit. A newer announcement
    /// from the same unit replaces the previous one wholesale.
    pub received: HashMap<String, Value>,
}

impl RemoteUnit {
    pub fn new(unit_name: UnitName) -> Self {
        RemoteUnit {
            unit_name,
            received: HashMap::new(),
        }
    }

    pub fn with_received(unit_name: UnitName, received: HashMap<String, Value>) -> Self {
        RemoteUnit {
            unit_name,
            received,
        }
    }

    /// The unit's announced cluster config, if it announced one.
    ///
    /// JSON `null` is treated the same as a missing key: this unit is a
    /// standby and contributes nothing.
    pub fn partitions(&self) -> Option<&Value> {
        match self.received.get(KEY_PARTITIONS) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }
}

/// One relation between this node and a set of controller replicas.
///
/// `joined_units` keeps arrival order: the transport appends a unit the
/// first time data arrives from it and removes it on departure.
#[derive(Clone, Debug, Default)]
pub struct Relation {
    joined_units: Vec<RemoteUnit>,
    to_publish: HashMap<String, Value>,
}

impl Relation {
    pub fn new() -> Self {
        Relation::default()
    }

    /// Units currently joined, in arrival order.
    pub fn joined_units(&self) -> &[RemoteUnit] {
        &self.joined_units
    }

    /// Look up a joined unit by name.
    pub fn unit(&self, name: &UnitName) -> Option<&RemoteUnit> {
        self.joined_units.iter().find(|u| &u.unit_name == name)
    }

    /// Record the latest bag received from a unit, joining it if new.
    pub fn unit_received(&mut self, name: UnitName, received: HashMap<String, Value>) {
        if let Some(unit) = self.joined_units.iter_mut().find(|u| u.unit_name == name) {
            unit.received = received;
        } else {
            self.joined_units.push(RemoteUnit::with_received(name, received));
        }
    }

    /// Drop a departed unit. No-op if the unit was never joined.
    pub fn unit_departed(&mut self, name: &UnitName) {
        self.joined_units.retain(|u| &u.unit_name != name);
    }

    /// Merge key/value pairs into the outbound bag, last write wins per key.
    pub fn publish<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.to_publish.extend(entries);
    }

    /// The outbound bag as peers will see it.
    pub fn to_publish(&self) -> &HashMap<String, Value> {
        &self.to_publish
    }

    /// This node's own network identity for membership comparison.
    ///
    /// Read from the local publish bag, where the framework places it.
    pub fn ingress_address(&self) -> Option<&str> {
        self.to_publish.get(KEY_INGRESS_ADDRESS).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.joined_units.is_empty()
    }
}
