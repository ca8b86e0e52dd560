//! Gateway Event Controller Common Types
//!
//! Resource types shared by the controller and its event handlers:
//! the `submariner.io/v1` Endpoint custom resource and helpers for
//! classifying Endpoints and Nodes.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node label marking a node as a gateway candidate
pub const GATEWAY_LABEL: &str = "submariner.io/gateway";

/// Well-known node label carrying the node's hostname
pub const HOSTNAME_LABEL: &str = "kubernetes.io/hostname";

/// Published gateway connection descriptor of a cluster
///
/// One Endpoint exists per active gateway. Endpoints whose `cluster_id`
/// matches the local cluster are *local*, all others are *remote*.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "submariner.io",
    version = "v1",
    kind = "Endpoint",
    plural = "endpoints",
    namespaced,
    derive = "PartialEq"
)]
pub struct EndpointSpec {
    #[serde(rename = "cluster_id")]
    pub cluster_id: String,

    #[serde(rename = "cable_name")]
    pub cable_name: String,

    #[serde(rename = "healthCheckIP", default, skip_serializing_if = "String::is_empty")]
    pub health_check_ip: String,

    /// Hostname of the gateway node that published this Endpoint
    pub hostname: String,

    #[serde(default)]
    pub subnets: Vec<String>,

    #[serde(rename = "private_ip", default)]
    pub private_ip: String,

    #[serde(rename = "public_ip", default)]
    pub public_ip: String,

    #[serde(rename = "nat_enabled", default)]
    pub nat_enabled: bool,

    /// Cable driver name (e.g. "libreswan", "wireguard", "vxlan")
    #[serde(default)]
    pub backend: String,

    #[serde(rename = "backend_config", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub backend_config: BTreeMap<String, String>,
}

impl Endpoint {
    /// Identity used to key remote endpoints: the object name
    pub fn identity(&self) -> String {
        self.name_any()
    }

    /// Whether this Endpoint was published by the given cluster
    pub fn is_from_cluster(&self, cluster_id: &str) -> bool {
        self.spec.cluster_id == cluster_id
    }

    /// Whether this Endpoint was published by the given gateway host
    pub fn is_from_host(&self, hostname: &str) -> bool {
        self.spec.hostname == hostname
    }
}

/// Check a node's labels for the gateway label (`submariner.io/gateway=true`)
pub fn is_gateway_node(labels: &BTreeMap<String, String>) -> bool {
    labels
        .get(GATEWAY_LABEL)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_spec_uses_wire_field_names() {
        let spec = EndpointSpec {
            cluster_id: "east".to_string(),
            cable_name: "submariner-cable-east-10-0-0-1".to_string(),
            hostname: "gw-1".to_string(),
            nat_enabled: true,
            ..Default::default()
        };

        let json = serde_json::to_value(&spec).expect("Should serialize EndpointSpec");

        assert_eq!(json["cluster_id"], "east");
        assert_eq!(json["cable_name"], "submariner-cable-east-10-0-0-1");
        assert_eq!(json["nat_enabled"], true);
        // Empty optional fields are omitted
        assert!(json.get("healthCheckIP").is_none());
        assert!(json.get("backend_config").is_none());
    }

    #[test]
    fn test_gateway_label_values() {
        let mut labels = BTreeMap::new();
        assert!(!is_gateway_node(&labels));

        labels.insert(GATEWAY_LABEL.to_string(), "false".to_string());
        assert!(!is_gateway_node(&labels));

        labels.insert(GATEWAY_LABEL.to_string(), "True".to_string());
        assert!(is_gateway_node(&labels));
    }
}
