//! Endpoint controller - the readiness state machine
//!
//! Orchestrates one reconciliation pass per trigger event:
//! reconcile the peer announcements, evaluate membership, move the
//! readiness flags, cache the chosen config, clear the trigger.

use std::sync::Arc;

use berth_core::{
    BerthError, BerthResult, EndpointEvent, EndpointId, FlagStore, NodeDescriptor, Relation,
};
use berth_state::{node_listed, ClusterAuthority, Reconciler};

use crate::SignalPublisher;

/// Where the endpoint currently stands.
///
/// `Reconciling` is only observable from inside a dispatch; between events
/// the machine rests in `Idle`, `Active` or `Broken`. No state is
/// terminal: any later peers-changed event re-enters `Reconciling`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointState {
    Idle,
    Reconciling,
    Active,
    Broken,
}

/// The relation-side adapter a compute node owns.
pub struct EndpointController {
    endpoint: EndpointId,
    flags: Arc<FlagStore>,
    reconciler: Reconciler,
    publisher: SignalPublisher,
    relations: Vec<Relation>,
    active_data: ClusterAuthority,
    state: EndpointState,
}

impl EndpointController {
    pub fn new(endpoint: EndpointId, flags: Arc<FlagStore>) -> Self {
        EndpointController {
            reconciler: Reconciler::new(endpoint.clone(), Arc::clone(&flags)),
            publisher: SignalPublisher::new(endpoint.clone(), Arc::clone(&flags)),
            endpoint,
            flags,
            relations: Vec::new(),
            active_data: None,
            state: EndpointState::Idle,
        }
    }

    pub fn endpoint(&self) -> &EndpointId {
        &self.endpoint
    }

    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// The config chosen by the last reconciliation pass, if any.
    pub fn active_data(&self) -> &ClusterAuthority {
        &self.active_data
    }

    /// Wire a relation onto this endpoint. Done once by the surrounding
    /// framework when the relation is created.
    pub fn attach_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Mutable access to the single relation, for the transport side to
    /// record arriving and departing units.
    pub fn relation_mut(&mut self) -> BerthResult<&mut Relation> {
        self.check_structure()?;
        self.relations.get_mut(0).ok_or(BerthError::NoRelation)
    }

    /// A node can only be related to a single controller; both active and
    /// standby replicas are units within that one relation.
    fn controller_relation(&self) -> BerthResult<&Relation> {
        self.check_structure()?;
        self.relations.first().ok_or(BerthError::NoRelation)
    }

    fn check_structure(&self) -> BerthResult<()> {
        if self.relations.len() > 1 {
            return Err(BerthError::StructuralViolation {
                relations: self.relations.len(),
            });
        }
        Ok(())
    }

    /// This node's own network identity on the relation.
    pub fn ingress_address(&self) -> BerthResult<String> {
        let relation = self.controller_relation()?;
        relation
            .ingress_address()
            .map(str::to_string)
            .ok_or(BerthError::MissingIngressAddress)
    }

    /// Announce this node to the controllers.
    pub fn send_node_info(
        &mut self,
        hostname: &str,
        partition: &str,
        default: bool,
    ) -> BerthResult<()> {
        let descriptor = NodeDescriptor::new(hostname, partition, default);
        self.check_structure()?;
        let relation = self.relations.get_mut(0).ok_or(BerthError::NoRelation)?;
        self.publisher.publish_self(relation, &descriptor);
        Ok(())
    }

    /// Handle one trigger event. Runs to completion; the caller guarantees
    /// events for this relation arrive one at a time.
    pub fn dispatch(&mut self, event: EndpointEvent) -> BerthResult<()> {
        match event {
            EndpointEvent::PeersChanged => self.peers_changed(),
            EndpointEvent::PeerDeparted => self.peer_departed(),
        }
    }

    /// Assess the related controllers and only take data from the active
    /// one, then derive readiness from it.
    fn peers_changed(&mut self) -> BerthResult<()> {
        self.state = EndpointState::Reconciling;

        let relation = self.controller_relation()?;
        let authority = self.reconciler.reconcile(relation);
        let self_address = relation
            .ingress_address()
            .map(str::to_string)
            .ok_or(BerthError::MissingIngressAddress)?;
        self.active_data = authority;

        if node_listed(&self.active_data, &self_address) {
            self.publisher.apply_readiness_transition(true);
            self.state = EndpointState::Active;
        } else {
            self.publisher.apply_readiness_transition(false);
            self.state = EndpointState::Broken;
        }

        // Pass complete; the trigger has been consumed.
        self.flags.clear(&self.endpoint.changed_flag());
        Ok(())
    }

    /// A controller left: drop readiness until the next changed event
    /// re-evaluates. The split-brain flag is left as it stands.
    fn peer_departed(&mut self) -> BerthResult<()> {
        self.publisher.apply_readiness_transition(false);
        self.flags.clear(&self.endpoint.departed_flag());
        self.state = EndpointState::Broken;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use serde_json::{json, Value};

    use berth_core::{UnitName, KEY_INGRESS_ADDRESS};

    fn controller_with_relation(self_addr: &str) -> (EndpointController, Arc<FlagStore>) {
        let endpoint = EndpointId::new("ctl");
        let flags = FlagStore::new();
        let mut controller = EndpointController::new(endpoint, Arc::clone(&flags));

        let mut relation = Relation::new();
        relation.publish([(KEY_INGRESS_ADDRESS.to_string(), json!(self_addr))]);
        controller.attach_relation(relation);

        (controller, flags)
    }

    fn announce(controller: &mut EndpointController, unit: &str, config: Value) {
        controller
            .relation_mut()
            .unwrap()
            .unit_received(
                UnitName::new(unit),
                HashMap::from([("partitions".to_string(), config)]),
            );
    }

    fn fire(controller: &mut EndpointController, flags: &FlagStore, event: EndpointEvent) {
        flags.set(&event.flag_name(controller.endpoint()));
        controller.dispatch(event).unwrap();
    }

    #[test]
    fn test_listed_node_becomes_active() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");
        announce(
            &mut controller,
            "controller/0",
            json!({"nodes": [{"ingress_address": "10.0.0.5"}]}),
        );

        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        let endpoint = controller.endpoint().clone();
        assert_eq!(controller.state(), EndpointState::Active);
        assert!(flags.is_set(&endpoint.available_flag()));
        assert!(flags.is_set(&endpoint.active_changed_flag()));
        assert!(!flags.is_set(&endpoint.changed_flag()));
        assert!(controller.active_data().is_some());
    }

    #[test]
    fn test_unlisted_node_goes_broken() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");
        announce(
            &mut controller,
            "controller/0",
            json!({"nodes": [{"ingress_address": "10.0.0.9"}]}),
        );

        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        let endpoint = controller.endpoint().clone();
        assert_eq!(controller.state(), EndpointState::Broken);
        assert!(!flags.is_set(&endpoint.available_flag()));
        assert!(!flags.is_set(&endpoint.active_changed_flag()));
        assert!(!flags.is_set(&endpoint.changed_flag()));
    }

    #[test]
    fn test_zero_peers_not_ready_no_split_brain() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");

        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        let endpoint = controller.endpoint().clone();
        assert_eq!(controller.state(), EndpointState::Broken);
        assert!(controller.active_data().is_none());
        assert!(!flags.is_set(&endpoint.available_flag()));
        assert!(!flags.is_set(&endpoint.split_brain_flag()));
    }

    #[test]
    fn test_split_brain_keeps_first_announcement() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");
        let first = json!({"nodes": [{"ingress_address": "10.0.0.5"}]});
        announce(&mut controller, "controller/0", first.clone());
        announce(
            &mut controller,
            "controller/1",
            json!({"nodes": [{"ingress_address": "10.0.0.9"}]}),
        );

        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        let endpoint = controller.endpoint().clone();
        assert!(flags.is_set(&endpoint.split_brain_flag()));
        assert_eq!(controller.active_data(), &Some(first));
        // First announcement listed us, so we are still active.
        assert_eq!(controller.state(), EndpointState::Active);
    }

    #[test]
    fn test_departure_clears_readiness_keeps_split_brain() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");
        let config = json!({"nodes": [{"ingress_address": "10.0.0.5"}]});
        announce(&mut controller, "controller/0", config.clone());
        announce(&mut controller, "controller/1", config);
        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        let endpoint = controller.endpoint().clone();
        assert_eq!(controller.state(), EndpointState::Active);
        assert!(flags.is_set(&endpoint.split_brain_flag()));

        controller
            .relation_mut()
            .unwrap()
            .unit_departed(&UnitName::new("controller/1"));
        fire(&mut controller, &flags, EndpointEvent::PeerDeparted);

        assert_eq!(controller.state(), EndpointState::Broken);
        assert!(!flags.is_set(&endpoint.available_flag()));
        assert!(!flags.is_set(&endpoint.active_changed_flag()));
        assert!(!flags.is_set(&endpoint.departed_flag()));
        assert!(flags.is_set(&endpoint.split_brain_flag()));
    }

    #[test]
    fn test_broken_reenters_on_next_change() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");
        fire(&mut controller, &flags, EndpointEvent::PeersChanged);
        assert_eq!(controller.state(), EndpointState::Broken);

        announce(
            &mut controller,
            "controller/0",
            json!({"nodes": [{"ingress_address": "10.0.0.5"}]}),
        );
        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        assert_eq!(controller.state(), EndpointState::Active);
    }

    #[test]
    fn test_second_relation_is_structural_violation() {
        let (mut controller, _flags) = controller_with_relation("10.0.0.5");
        controller.attach_relation(Relation::new());

        let err = controller.dispatch(EndpointEvent::PeersChanged).unwrap_err();
        assert!(matches!(
            err,
            BerthError::StructuralViolation { relations: 2 }
        ));
    }

    #[test]
    fn test_no_relation_is_an_error() {
        let endpoint = EndpointId::new("ctl");
        let flags = FlagStore::new();
        let mut controller = EndpointController::new(endpoint, flags);

        let err = controller.dispatch(EndpointEvent::PeersChanged).unwrap_err();
        assert!(matches!(err, BerthError::NoRelation));
    }

    #[test]
    fn test_missing_ingress_address_is_an_error() {
        let endpoint = EndpointId::new("ctl");
        let flags = FlagStore::new();
        let mut controller = EndpointController::new(endpoint, flags);
        controller.attach_relation(Relation::new());

        let err = controller.dispatch(EndpointEvent::PeersChanged).unwrap_err();
        assert!(matches!(err, BerthError::MissingIngressAddress));
    }

    #[test]
    fn test_send_node_info_reaches_publish_bag() {
        let (mut controller, _flags) = controller_with_relation("10.0.0.5");
        controller.send_node_info("node-1", "debug", true).unwrap();

        let relation = controller.relation_mut().unwrap();
        assert_eq!(relation.to_publish().get("hostname"), Some(&json!("node-1")));
        assert_eq!(relation.to_publish().get("partition"), Some(&json!("debug")));
        assert_eq!(relation.to_publish().get("default"), Some(&json!(true)));
    }

    #[test]
    fn test_repeated_ready_passes_idempotent() {
        let (mut controller, flags) = controller_with_relation("10.0.0.5");
        announce(
            &mut controller,
            "controller/0",
            json!({"nodes": [{"ingress_address": "10.0.0.5"}]}),
        );

        fire(&mut controller, &flags, EndpointEvent::PeersChanged);
        fire(&mut controller, &flags, EndpointEvent::PeersChanged);

        let endpoint = controller.endpoint().clone();
        assert!(flags.is_set(&endpoint.available_flag()));
        assert!(flags.is_set(&endpoint.active_changed_flag()));
    }
}
