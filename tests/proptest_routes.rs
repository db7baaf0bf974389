//! Property-based tests using proptest
//!
//! These tests verify that flattening route records into attribute maps keeps
//! length and order, copies every field verbatim, and never merges distinct routes.

use gcp_router_status::compute::{flatten_routes, RouteRecord};
use gcp_router_status::datasource::{router_status_schema, RouterLookup};
use gcp_router_status::schema::ResourceData;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Generate arbitrary route records as the API would return them
fn arb_route() -> impl Strategy<Value = RouteRecord> {
    (
        (
            "(10|172|192)\\.[0-9]{1,3}\\.0\\.0/(8|16|24)", // dest_range
            "[a-z][a-z0-9-]{0,20}",                        // name
            prop_oneof![Just(""), Just("projects/p/global/networks/default")],
            ".{0,16}", // description
        ),
        (
            prop_oneof![Just(""), Just("projects/p/global/gateways/default-internet-gateway")],
            prop_oneof![Just(""), Just("10.1.0.5")],
            prop_oneof![Just(""), Just("169.254.0.2")],
            prop_oneof![Just(""), Just("projects/p/regions/r/vpnTunnels/t1")],
        ),
        0i64..=65535,
        prop::collection::vec("[a-z]{1,8}", 0..4),
        prop_oneof![Just(""), Just("projects/p/global/networks/peer")],
    )
        .prop_map(
            |(
                (dest_range, name, network, description),
                (next_hop_gateway, next_hop_ilb, next_hop_ip, next_hop_vpn_tunnel),
                priority,
                tags,
                next_hop_network,
            )| RouteRecord {
                dest_range,
                name,
                network: network.to_string(),
                description,
                next_hop_gateway: next_hop_gateway.to_string(),
                next_hop_ilb: next_hop_ilb.to_string(),
                next_hop_ip: next_hop_ip.to_string(),
                next_hop_vpn_tunnel: next_hop_vpn_tunnel.to_string(),
                priority,
                tags,
                next_hop_network: next_hop_network.to_string(),
            },
        )
}

fn arb_routes() -> impl Strategy<Value = Vec<RouteRecord>> {
    prop::collection::vec(arb_route(), 0..32)
}

proptest! {
    /// The flattened list has one entry per route
    #[test]
    fn flatten_keeps_length(routes in arb_routes()) {
        let flat = flatten_routes(&routes);
        prop_assert_eq!(flat.as_array().unwrap().len(), routes.len());
    }

    /// Entries keep response order and every field verbatim
    #[test]
    fn flatten_is_verbatim_and_ordered(routes in arb_routes()) {
        let flat = flatten_routes(&routes);
        for (route, item) in routes.iter().zip(flat.as_array().unwrap()) {
            let map = item.as_object().unwrap();
            prop_assert_eq!(map.len(), 11);
            prop_assert_eq!(&map["dest_range"], &Value::from(route.dest_range.clone()));
            prop_assert_eq!(&map["priority"], &Value::from(route.priority));
            prop_assert_eq!(&map["tags"], &Value::from(route.tags.clone()));
            prop_assert_eq!(&RouteRecord::from_attributes(map).unwrap(), route);
        }
    }

    /// Distinct routes never flatten to the same map
    #[test]
    fn flatten_is_injective(a in arb_route(), b in arb_route()) {
        let same_map = a.to_attributes() == b.to_attributes();
        prop_assert_eq!(same_map, a == b);
    }

    /// Flattened routes are always accepted by the data source schema
    #[test]
    fn flattened_routes_fit_schema(routes in arb_routes()) {
        let schema = Arc::new(router_status_schema(RouterLookup::ByName));
        let mut data = ResourceData::new(schema, Map::new());
        prop_assert!(data.set("best_routes", flatten_routes(&routes)).is_ok());
        prop_assert!(data.set("best_routes_for_router", flatten_routes(&routes)).is_ok());
    }
}
