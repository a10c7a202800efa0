//! Membership evaluation against the authoritative config
//!
//! Pure functions only: no flag mutation happens here.

use serde::Deserialize;

use crate::{is_empty_config, ClusterAuthority};

/// Structured view of the parts of the config this node cares about.
///
/// The blob is otherwise opaque; unknown fields are the controller's
/// business and are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PartitionConfig {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

/// One member entry in the controller's node list.
#[derive(Debug, Deserialize)]
pub struct NodeRecord {
    pub ingress_address: String,
}

/// Is this node listed in the authoritative config?
///
/// Exact string comparison against each record's `ingress_address`, no
/// normalization. Absent or malformed config evaluates to not listed.
pub fn node_listed(authority: &ClusterAuthority, self_address: &str) -> bool {
    let Some(config) = authority.as_ref().filter(|c| !is_empty_config(c)) else {
        tracing::debug!("controller not ready, config is empty");
        return false;
    };

    let parsed: PartitionConfig = match serde_json::from_value(config.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(%err, "config does not parse, treating node as not listed");
            return false;
        }
    };

    let listed = parsed
        .nodes
        .iter()
        .any(|node| node.ingress_address == self_address);
    tracing::debug!(nodes = parsed.nodes.len(), listed, "evaluated membership");
    listed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_authority_not_listed() {
        assert!(!node_listed(&None, "10.0.0.5"));
    }

    #[test]
    fn test_empty_authority_not_listed() {
        assert!(!node_listed(&Some(json!({})), "10.0.0.5"));
    }

    #[test]
    fn test_listed_when_address_matches() {
        let authority = Some(json!({
            "nodes": [
                {"ingress_address": "10.0.0.9"},
                {"ingress_address": "10.0.0.5"},
            ],
        }));
        assert!(node_listed(&authority, "10.0.0.5"));
    }

    #[test]
    fn test_not_listed_when_no_match() {
        let authority = Some(json!({
            "nodes": [{"ingress_address": "10.0.0.9"}],
        }));
        assert!(!node_listed(&authority, "10.0.0.5"));
    }

    #[test]
    fn test_exact_match_only() {
        let authority = Some(json!({
            "nodes": [{"ingress_address": "10.0.0.50"}],
        }));
        assert!(!node_listed(&authority, "10.0.0.5"));
    }

    #[test]
    fn test_missing_nodes_key_not_listed() {
        let authority = Some(json!({"version": 3}));
        assert!(!node_listed(&authority, "10.0.0.5"));
    }

    #[test]
    fn test_malformed_nodes_not_listed() {
        let authority = Some(json!({"nodes": "oops"}));
        assert!(!node_listed(&authority, "10.0.0.5"));
    }

    #[test]
    fn test_extra_record_fields_ignored() {
        let authority = Some(json!({
            "nodes": [{"ingress_address": "10.0.0.5", "state": "idle", "cpus": 8}],
        }));
        assert!(node_listed(&authority, "10.0.0.5"));
    }
}
