//! Router status data source
//!
//! Reads the status of a Cloud Router and exposes its network and best routes as
//! computed attributes.

use super::resolver::RouterLookup;
use crate::compute::{flatten_routes, route_resource_schema, RouteRecord, RouterStatusApi};
use crate::config::ProviderConfig;
use crate::error::{Result, SchemaWriteError};
use crate::schema::{
    datasource_schema_from_resource_schema, AttrType, Attribute, ResourceData, Schema,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Attribute schema of the router status data source
pub fn router_status_schema(lookup: RouterLookup) -> Schema {
    let route_elem = AttrType::Object(datasource_schema_from_resource_schema(
        &route_resource_schema(),
    ));

    let name = match lookup {
        RouterLookup::ByName => Attribute::required(
            AttrType::String,
            "Name of the router to query. This can be the router name, or a fully qualified self-link.",
        ),
        RouterLookup::ById => Attribute::optional(
            AttrType::String,
            "Name of the router, taken from the data source identifier.",
        )
        .with_computed(),
    };

    Schema::new()
        .attr("name", name)
        .attr(
            "project",
            Attribute::optional(AttrType::String, "Project ID of the target router.").with_computed(),
        )
        .attr(
            "region",
            Attribute::optional(AttrType::String, "Region of the target router.").with_computed(),
        )
        .attr(
            "network",
            Attribute::computed(AttrType::String, "URI of the network to which this router belongs."),
        )
        .attr(
            "best_routes",
            Attribute::computed(
                AttrType::list_of(route_elem.clone()),
                "Best routes for this router's network.",
            ),
        )
        .attr(
            "best_routes_for_router",
            Attribute::computed(
                AttrType::list_of(route_elem),
                "Best routes learned by this router.",
            ),
        )
}

/// Read-only data source over `routers.getRouterStatus`
#[derive(Debug, Clone)]
pub struct RouterStatusDataSource {
    lookup: RouterLookup,
    schema: Arc<Schema>,
}

impl RouterStatusDataSource {
    pub fn new(lookup: RouterLookup) -> Self {
        Self {
            lookup,
            schema: Arc::new(router_status_schema(lookup)),
        }
    }

    pub fn lookup(&self) -> RouterLookup {
        self.lookup
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Fresh record for the given configuration
    pub fn new_data(&self, config: Map<String, Value>) -> ResourceData {
        ResourceData::new(self.schema.clone(), config)
    }

    /// Record for an existing router identifier
    pub fn import(&self, id: &str) -> ResourceData {
        ResourceData::with_id(self.schema.clone(), Map::new(), id)
    }

    /// Fetch the router status and write it into `data`
    ///
    /// Issues exactly one API call. Errors are returned as they occur; attributes
    /// written before a failing write are not rolled back.
    pub async fn read<A>(
        &self,
        data: &mut ResourceData,
        config: &ProviderConfig,
        api: &A,
    ) -> Result<()>
    where
        A: RouterStatusApi + ?Sized,
    {
        // Nothing is written if resolution or the call fails
        let query = self.lookup.resolve(data, config)?;
        tracing::debug!(
            "Reading router status: project={}, region={}, router={}",
            query.project,
            query.region,
            query.name
        );

        let status = api.get_router_status(&query).await?;

        // Each read replaces the previous snapshot
        data.clear_state();
        data.set("name", Value::String(query.name.clone()))?;
        data.set("project", Value::String(query.project.clone()))?;
        data.set("region", Value::String(query.region.clone()))?;
        data.set("network", Value::String(status.network))?;
        set_routes(data, "best_routes", &status.best_routes)?;
        set_routes(data, "best_routes_for_router", &status.best_routes_for_router)?;

        // By-id records keep the identifier they were read with
        if self.lookup.assigns_identity() {
            data.set_id(&query.id());
        }

        Ok(())
    }
}

/// Flatten `routes` into `field`
fn set_routes(
    data: &mut ResourceData,
    field: &str,
    routes: &[RouteRecord],
) -> std::result::Result<(), SchemaWriteError> {
    tracing::debug!("mapping {} routes for {}", routes.len(), field);
    data.set(field, flatten_routes(routes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{RouterQuery, RouterStatus};
    use crate::error::{ConfigurationError, Error, RemoteError};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a fixed status, or 404 when none is set
    struct FakeApi {
        status: Option<RouterStatus>,
        calls: Mutex<Vec<RouterQuery>>,
    }

    impl FakeApi {
        fn new(status: Option<RouterStatus>) -> Self {
            Self {
                status,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RouterQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RouterStatusApi for FakeApi {
        async fn get_router_status(
            &self,
            query: &RouterQuery,
        ) -> std::result::Result<RouterStatus, RemoteError> {
            self.calls.lock().unwrap().push(query.clone());
            self.status.clone().ok_or_else(|| RemoteError::Api {
                status: StatusCode::NOT_FOUND,
                message: format!("The resource '{}' was not found", query.id()),
            })
        }
    }

    fn edge_status() -> RouterStatus {
        RouterStatus {
            network: "https://www.googleapis.com/compute/v1/projects/proj-1/global/networks/default".to_string(),
            best_routes: vec![RouteRecord {
                dest_range: "10.0.0.0/8".to_string(),
                name: "r1".to_string(),
                priority: 100,
                ..Default::default()
            }],
            best_routes_for_router: vec![],
        }
    }

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_read_by_name() {
        let ds = RouterStatusDataSource::new(RouterLookup::ByName);
        let api = FakeApi::new(Some(edge_status()));
        let mut data = ds.new_data(config(json!({
            "name": "edge-router",
            "project": "proj-1",
            "region": "us-central1"
        })));

        ds.read(&mut data, &ProviderConfig::default(), &api)
            .await
            .unwrap();

        assert_eq!(api.calls(), vec![RouterQuery::new("proj-1", "us-central1", "edge-router")]);
        assert_eq!(data.id(), "projects/proj-1/regions/us-central1/routers/edge-router");
        assert_eq!(data.get_str("network"), Some(edge_status().network.as_str()));

        let best = data.get("best_routes").unwrap().as_array().unwrap();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0]["dest_range"], "10.0.0.0/8");
        assert_eq!(best[0]["priority"], 100);
        assert_eq!(best[0]["tags"], json!([]));

        assert_eq!(data.state()["best_routes_for_router"], json!([]));
    }

    #[tokio::test]
    async fn test_read_is_idempotent() {
        let ds = RouterStatusDataSource::new(RouterLookup::ByName);
        let api = FakeApi::new(Some(edge_status()));
        let mut data = ds.new_data(config(json!({"name": "edge-router"})));
        let ambient = ProviderConfig::new(Some("proj-1"), Some("us-central1"));

        ds.read(&mut data, &ambient, &api).await.unwrap();
        let first = data.to_json();
        // Second read must not accumulate anything
        ds.read(&mut data, &ambient, &api).await.unwrap();

        assert_eq!(data.to_json(), first);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reread_follows_new_provider_defaults() {
        let ds = RouterStatusDataSource::new(RouterLookup::ByName);
        let api = FakeApi::new(Some(edge_status()));
        let mut data = ds.new_data(config(json!({"name": "edge-router"})));

        // Same record, defaults changed between reads
        ds.read(&mut data, &ProviderConfig::new(Some("proj-aaa"), Some("us-central1")), &api)
            .await
            .unwrap();
        ds.read(&mut data, &ProviderConfig::new(Some("proj-bbb"), Some("europe-west1")), &api)
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![
                RouterQuery::new("proj-aaa", "us-central1", "edge-router"),
                RouterQuery::new("proj-bbb", "europe-west1", "edge-router"),
            ]
        );
        assert_eq!(data.id(), "projects/proj-bbb/regions/europe-west1/routers/edge-router");
        assert_eq!(data.get_str("project"), Some("proj-bbb"));
        assert_eq!(data.get_str("region"), Some("europe-west1"));
    }

    #[tokio::test]
    async fn test_read_by_id_keeps_identifier() {
        let ds = RouterStatusDataSource::new(RouterLookup::ById);
        let api = FakeApi::new(Some(edge_status()));
        let mut data = ds.import("edge-router");

        ds.read(
            &mut data,
            &ProviderConfig::new(Some("proj-1"), Some("us-central1")),
            &api,
        )
        .await
        .unwrap();

        assert_eq!(data.id(), "edge-router");
        assert_eq!(data.get_str("name"), Some("edge-router"));
        assert_eq!(data.get_str("region"), Some("us-central1"));
        assert_eq!(data.get("best_routes").unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_remote_error() {
        let ds = RouterStatusDataSource::new(RouterLookup::ByName);
        let api = FakeApi::new(None);
        let mut data = ds.new_data(config(json!({"name": "missing"})));

        let err = ds
            .read(
                &mut data,
                &ProviderConfig::new(Some("proj-1"), Some("us-central1")),
                &api,
            )
            .await
            .unwrap_err();

        match err {
            Error::Remote(remote) => assert!(remote.is_not_found()),
            other => panic!("expected remote error, got {other:?}"),
        }
        assert_eq!(data.id(), "");
        assert!(data.state().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_project_makes_no_call() {
        let ds = RouterStatusDataSource::new(RouterLookup::ByName);
        let api = FakeApi::new(Some(edge_status()));
        let mut data = ds.new_data(config(json!({"name": "edge-router", "region": "us-central1"})));

        let err = ds
            .read(&mut data, &ProviderConfig::default(), &api)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::Unresolved { attribute: "project" })
        ));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_schema_surface() {
        let schema = router_status_schema(RouterLookup::ByName);
        assert!(schema.get("name").unwrap().required);
        assert!(schema.get("project").unwrap().optional);
        assert!(schema.get("network").unwrap().is_read_only());

        let AttrType::List(elem) = &schema.get("best_routes").unwrap().ty else {
            panic!("best_routes should be a list");
        };
        let AttrType::Object(route) = elem.as_ref() else {
            panic!("best_routes element should be an object");
        };
        for field in [
            "dest_range",
            "name",
            "network",
            "description",
            "next_hop_gateway",
            "next_hop_ilb",
            "next_hop_ip",
            "next_hop_vpn_tunnel",
            "priority",
            "tags",
            "next_hop_network",
        ] {
            assert!(route.get(field).unwrap().is_read_only(), "{field}");
        }

        let by_id = router_status_schema(RouterLookup::ById);
        assert!(!by_id.get("name").unwrap().required);
    }
}
