//! Compute Routes
//!
//! The route record as returned by the Compute API, the `google_compute_route`
//! resource schema, and the mapping between the two.

use crate::schema::{AttrType, Attribute, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A route, as returned by the Compute API
///
/// Absent fields deserialize to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteRecord {
    pub dest_range: String,
    pub name: String,
    pub network: String,
    pub description: String,
    pub next_hop_gateway: String,
    pub next_hop_ilb: String,
    pub next_hop_ip: String,
    pub next_hop_vpn_tunnel: String,
    pub priority: i64,
    pub tags: Vec<String>,
    pub next_hop_network: String,
}

/// An attribute map could not be read back into a [`RouteRecord`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("route attribute {key} is not a {expected}")]
pub struct RouteAttributeError {
    pub key: &'static str,
    pub expected: &'static str,
}

impl RouteRecord {
    /// Attribute map under the engine's snake_case keys
    pub fn to_attributes(&self) -> Map<String, Value> {
        // Every field is written, zero values included
        let mut output = Map::new();
        output.insert("dest_range".into(), self.dest_range.clone().into());
        output.insert("name".into(), self.name.clone().into());
        output.insert("network".into(), self.network.clone().into());
        output.insert("description".into(), self.description.clone().into());
        output.insert("next_hop_gateway".into(), self.next_hop_gateway.clone().into());
        output.insert("next_hop_ilb".into(), self.next_hop_ilb.clone().into());
        output.insert("next_hop_ip".into(), self.next_hop_ip.clone().into());
        output.insert("next_hop_vpn_tunnel".into(), self.next_hop_vpn_tunnel.clone().into());
        output.insert("priority".into(), self.priority.into());
        output.insert("tags".into(), self.tags.clone().into());
        output.insert("next_hop_network".into(), self.next_hop_network.clone().into());
        output
    }

    /// Inverse of [`RouteRecord::to_attributes`]; missing keys read as zero values
    pub fn from_attributes(map: &Map<String, Value>) -> Result<Self, RouteAttributeError> {
        Ok(Self {
            dest_range: string_attr(map, "dest_range")?,
            name: string_attr(map, "name")?,
            network: string_attr(map, "network")?,
            description: string_attr(map, "description")?,
            next_hop_gateway: string_attr(map, "next_hop_gateway")?,
            next_hop_ilb: string_attr(map, "next_hop_ilb")?,
            next_hop_ip: string_attr(map, "next_hop_ip")?,
            next_hop_vpn_tunnel: string_attr(map, "next_hop_vpn_tunnel")?,
            priority: match map.get("priority") {
                None | Some(Value::Null) => 0,
                Some(v) => v.as_i64().ok_or(RouteAttributeError {
                    key: "priority",
                    expected: "integer",
                })?,
            },
            // Tags keep their response order
            tags: match map.get("tags") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|t| t.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or(RouteAttributeError {
                        key: "tags",
                        expected: "set of strings",
                    })?,
                Some(_) => {
                    return Err(RouteAttributeError {
                        key: "tags",
                        expected: "set of strings",
                    })
                },
            },
            next_hop_network: string_attr(map, "next_hop_network")?,
        })
    }
}

fn string_attr(map: &Map<String, Value>, key: &'static str) -> Result<String, RouteAttributeError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RouteAttributeError {
            key,
            expected: "string",
        }),
    }
}

/// Flatten routes into the engine's list-of-maps shape, order preserved
pub fn flatten_routes(routes: &[RouteRecord]) -> Value {
    Value::Array(
        routes
            .iter()
            .map(|route| Value::Object(route.to_attributes()))
            .collect(),
    )
}

/// Schema of the `google_compute_route` resource
pub fn route_resource_schema() -> Schema {
    Schema::new()
        .attr(
            "dest_range",
            Attribute::required(
                AttrType::String,
                "The destination range of outgoing packets that this route applies to.",
            ),
        )
        .attr(
            "name",
            Attribute::required(AttrType::String, "Name of the route."),
        )
        .attr(
            "network",
            Attribute::required(AttrType::String, "The network that this route applies to."),
        )
        .attr(
            "description",
            Attribute::optional(AttrType::String, "An optional description of this resource."),
        )
        .attr(
            "next_hop_gateway",
            Attribute::optional(AttrType::String, "URL to a gateway that should handle matching packets."),
        )
        .attr(
            "next_hop_ilb",
            Attribute::optional(
                AttrType::String,
                "The IP address or URL to a forwarding rule of type loadBalancingScheme=INTERNAL that should handle matching packets.",
            ),
        )
        .attr(
            "next_hop_instance",
            Attribute::optional(AttrType::String, "URL to an instance that should handle matching packets."),
        )
        .attr(
            "next_hop_instance_zone",
            Attribute::optional(AttrType::String, "The zone of the instance specified in next_hop_instance."),
        )
        .attr(
            "next_hop_ip",
            Attribute::optional(AttrType::String, "Network IP address of an instance that should handle matching packets.")
                .with_computed(),
        )
        .attr(
            "next_hop_vpn_tunnel",
            Attribute::optional(AttrType::String, "URL to a VpnTunnel that should handle matching packets."),
        )
        .attr(
            "next_hop_network",
            Attribute::computed(AttrType::String, "URL to a Network that should handle matching packets."),
        )
        .attr(
            "priority",
            Attribute::optional(AttrType::Int, "The priority of this route, used to break ties.")
                .with_computed(),
        )
        .attr(
            "tags",
            Attribute::optional(
                AttrType::set_of(AttrType::String),
                "A list of instance tags to which this route applies.",
            ),
        )
        .attr(
            "project",
            Attribute::optional(AttrType::String, "The ID of the project in which the resource belongs.")
                .with_computed(),
        )
        .attr(
            "self_link",
            Attribute::computed(AttrType::String, "The URI of the created resource."),
        )
}
