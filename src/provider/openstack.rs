//! OpenStack
//!
//! Tables for the OpenStack provider. Security group rules are the only
//! direction-sensitive edge: the remote group of an ingress rule is where
//! traffic comes from, the remote group of any other rule is where it goes.

use super::rules::{Endpoint, RefRule, RuleTable, Target};
use super::table::{ClassificationTable, TableProvider};
use super::ProviderType;
use crate::schema::{openstack_catalog, SchemaCatalog};

pub const COMPUTE_INSTANCE: &str = "openstack_compute_instance_v2";
pub const COMPUTE_INTERFACE_ATTACH: &str = "openstack_compute_interface_attach_v2";
pub const SECGROUP: &str = "openstack_networking_secgroup_v2";
pub const SECGROUP_RULE: &str = "openstack_networking_secgroup_rule_v2";
pub const NETWORKING_PORT: &str = "openstack_networking_port_v2";
pub const LB_LOADBALANCER: &str = "openstack_lb_loadbalancer_v2";
pub const LB_LISTENER: &str = "openstack_lb_listener_v2";
pub const LB_POOL: &str = "openstack_lb_pool_v2";
pub const LB_MEMBER: &str = "openstack_lb_member_v2";
pub const DB_INSTANCE: &str = "openstack_db_instance_v1";

const NODE_TYPES: &[&str] = &[COMPUTE_INSTANCE, SECGROUP, LB_LOADBALANCER, DB_INSTANCE];

const EDGE_TYPES: &[&str] = &[
    COMPUTE_INTERFACE_ATTACH,
    SECGROUP_RULE,
    NETWORKING_PORT,
    LB_LISTENER,
    LB_POOL,
    LB_MEMBER,
];

/// Fields kept when pruning resource configuration
pub const USED_ATTRIBUTES: &[&str] = &[
    "id",
    "instance_id",
    "direction",
    "remote_group_id",
    "security_group_ids",
    "loadbalancer_id",
    "listener_id",
    "pool_id",
];

const INGRESS_IN_ELSE_OUT: Target = Target::Switch {
    field: "direction",
    equals: "ingress",
    then: Endpoint::In,
    otherwise: Endpoint::Out,
};

fn rules() -> RuleTable {
    RuleTable::default()
        .with(COMPUTE_INTERFACE_ATTACH, &[RefRule::single("instance_id")])
        .with(
            SECGROUP_RULE,
            &[RefRule::single("remote_group_id").with_target(INGRESS_IN_ELSE_OUT)],
        )
        .with(NETWORKING_PORT, &[RefRule::list("security_group_ids")])
        .with(LB_LISTENER, &[RefRule::single("loadbalancer_id")])
        .with(LB_POOL, &[RefRule::single("listener_id")])
        .with(LB_MEMBER, &[RefRule::single("pool_id")])
}

/// The OpenStack adapter, backed by the embedded catalog
pub fn provider() -> TableProvider<&'static SchemaCatalog> {
    TableProvider::new(
        ProviderType::OpenStack,
        ClassificationTable::new(NODE_TYPES, EDGE_TYPES),
        rules(),
        USED_ATTRIBUTES,
        openstack_catalog(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::provider::{ProviderAdapter, ResourceConfig};
    use serde_json::{json, Value};

    fn config(value: Value) -> ResourceConfig {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_interface_attach_references_instance() {
        let refs = provider().resource_in_out(
            COMPUTE_INTERFACE_ATTACH,
            &config(json!({"instance_id": "srv-1"})),
        );
        assert_eq!(refs.ins, vec!["srv-1"]);
        assert!(refs.outs.is_empty());
    }

    #[test]
    fn test_ingress_rule_is_inbound() {
        let refs = provider().resource_in_out(
            SECGROUP_RULE,
            &config(json!({"direction": "ingress", "remote_group_id": "sg-a"})),
        );
        assert_eq!(refs.ins, vec!["sg-a"]);
        assert!(refs.outs.is_empty());
    }

    #[test]
    fn test_egress_rule_is_outbound() {
        let refs = provider().resource_in_out(
            SECGROUP_RULE,
            &config(json!({"direction": "egress", "remote_group_id": "sg-b"})),
        );
        assert!(refs.ins.is_empty());
        assert_eq!(refs.outs, vec!["sg-b"]);
    }

    #[test]
    fn test_rule_without_direction_is_outbound() {
        let refs = provider().resource_in_out(
            SECGROUP_RULE,
            &config(json!({"remote_group_id": "sg-c"})),
        );
        assert_eq!(refs.outs, vec!["sg-c"]);
    }

    #[test]
    fn test_rule_without_remote_group_has_no_refs() {
        let refs = provider().resource_in_out(
            SECGROUP_RULE,
            &config(json!({"direction": "ingress", "remote_ip_prefix": "0.0.0.0/0"})),
        );
        assert!(refs.is_empty());
    }

    #[test]
    fn test_port_references_every_security_group() {
        let refs = provider().resource_in_out(
            NETWORKING_PORT,
            &config(json!({"security_group_ids": ["sg-x", "sg-y"]})),
        );
        assert_eq!(refs.ins, vec!["sg-x", "sg-y"]);
        assert!(refs.outs.is_empty());
    }

    #[test]
    fn test_load_balancer_chain() {
        let p = provider();
        let listener = p.resource_in_out(LB_LISTENER, &config(json!({"loadbalancer_id": "lb-1"})));
        let pool = p.resource_in_out(LB_POOL, &config(json!({"listener_id": "ls-1"})));
        let member = p.resource_in_out(LB_MEMBER, &config(json!({"pool_id": "pl-1"})));

        assert_eq!(listener.ins, vec!["lb-1"]);
        assert_eq!(pool.ins, vec!["ls-1"]);
        assert_eq!(member.ins, vec!["pl-1"]);
    }

    #[test]
    fn test_listener_without_load_balancer() {
        let refs = provider().resource_in_out(LB_LISTENER, &ResourceConfig::new());
        assert!(refs.is_empty());
    }

    #[test]
    fn test_strict_rejects_numeric_remote_group() {
        let err = provider()
            .try_resource_in_out(
                SECGROUP_RULE,
                &config(json!({"direction": "ingress", "remote_group_id": 7})),
            )
            .unwrap_err();
        assert_eq!(err.resource_type, SECGROUP_RULE);
        assert_eq!(err.field, "remote_group_id");
    }

    #[test]
    fn test_every_rule_type_is_an_edge() {
        let p = provider();
        for resource in p.rules().resource_types() {
            assert!(p.is_edge(resource), "{} should be an edge", resource);
            assert!(!p.is_node(resource));
        }
    }

    #[test]
    fn test_used_attributes_cover_rule_fields() {
        let p = provider();
        for field in p.rules().fields() {
            assert!(p.used_attributes().contains(&field), "{} missing", field);
        }
    }

    #[test]
    fn test_classified_types_are_documented() {
        let p = provider();
        for resource in NODE_TYPES.iter().chain(EDGE_TYPES) {
            assert!(p.resource(resource).is_ok(), "{} undocumented", resource);
        }
    }

    #[test]
    fn test_unknown_schema_kinds() {
        let p = provider();
        assert_eq!(
            p.resource("openstack_unknown_v0").unwrap_err().kind(),
            ErrorKind::NotFoundResource
        );
        assert_eq!(
            p.data_source("openstack_unknown_v0").unwrap_err().kind(),
            ErrorKind::NotFoundDataSource
        );
    }
}
