//! Authority reconciliation
//!
//! At most one controller replica should be announcing cluster config at a
//! time; the standby posts nothing. The reconciler scans the joined units,
//! takes the first live announcement as authoritative and flags the
//! relation as split-brained if any further unit is also announcing.

use std::sync::Arc;

use serde_json::Value;

use berth_core::{EndpointId, FlagStore, Relation};

/// The single authoritative config chosen in one reconciliation pass.
///
/// Recomputed from scratch every pass; never merged across passes.
pub type ClusterAuthority = Option<Value>;

/// Whether an announced config counts as "nothing announced".
///
/// Standby replicas either omit the key or post an empty value; any of
/// these shapes is treated as silence.
pub fn is_empty_config(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Scans peer announcements and picks at most one as authoritative.
pub struct Reconciler {
    endpoint: EndpointId,
    flags: Arc<FlagStore>,
}

impl Reconciler {
    pub fn new(endpoint: EndpointId, flags: Arc<FlagStore>) -> Self {
        Reconciler { endpoint, flags }
    }

    /// Run one reconciliation pass over the relation.
    ///
    /// Units are visited in arrival order and the first live announcement
    /// wins. A second live announcement in the same pass means two
    /// controllers believe they are active: the split-brain flag is raised
    /// (sticky, never cleared here) and the chosen config is kept.
    pub fn reconcile(&self, relation: &Relation) -> ClusterAuthority {
        let mut chosen: ClusterAuthority = None;

        for unit in relation.joined_units() {
            let announced = unit
                .partitions()
                .filter(|config| !is_empty_config(config));

            let Some(config) = announced else {
                tracing::debug!(unit = %unit.unit_name, "unit is standby, no config announced");
                continue;
            };

            if chosen.is_some() {
                tracing::warn!(
                    unit = %unit.unit_name,
                    "two controllers presenting active data: split-brain"
                );
                // Remediation is the surrounding system's call; this core
                // only records the condition.
                self.flags.set(&self.endpoint.split_brain_flag());
            } else {
                tracing::debug!(unit = %unit.unit_name, "taking config as authoritative");
                chosen = Some(config.clone());
            }
        }

        chosen
    }
}
