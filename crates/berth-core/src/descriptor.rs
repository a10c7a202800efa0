//! Node self-description published toward the controllers

use serde::Serialize;
use serde_json::{json, Value};

/// What this node announces about itself.
///
/// Republished wholesale on every send; both the active and the standby
/// controller read the same entries from the relation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub hostname: String,
    pub partition: String,
    pub default: bool,
}

impl NodeDescriptor {
    pub fn new(hostname: impl Into<String>, partition: impl Into<String>, default: bool) -> Self {
        NodeDescriptor {
            hostname: hostname.into(),
            partition: partition.into(),
            default,
        }
    }

    /// The publish entries for this descriptor.
    pub fn to_entries(&self) -> Vec<(String, Value)> {
        vec![
            ("hostname".to_string(), json!(self.hostname)),
            ("partition".to_string(), json!(self.partition)),
            ("default".to_string(), json!(self.default)),
        ]
    }
}
