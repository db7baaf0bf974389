//! Cloud Router status
//!
//! The `routers.getRouterStatus` call and the types it exchanges.

use super::route::RouteRecord;
use crate::error::RemoteError;
use crate::gcp::client::GcpClient;
use async_trait::async_trait;
use serde::Deserialize;

/// Lookup keys for one router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterQuery {
    pub project: String,
    pub region: String,
    pub name: String,
}

impl RouterQuery {
    pub fn new(project: &str, region: &str, name: &str) -> Self {
        Self {
            project: project.to_string(),
            region: region.to_string(),
            name: name.to_string(),
        }
    }

    /// Tracking identifier: `projects/{project}/regions/{region}/routers/{name}`
    pub fn id(&self) -> String {
        format!(
            "projects/{}/regions/{}/routers/{}",
            self.project, self.region, self.name
        )
    }
}

/// Status of a router, as returned by the Compute API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterStatus {
    /// URI of the network the router belongs to
    pub network: String,
    /// Best routes for the router's network
    pub best_routes: Vec<RouteRecord>,
    /// Best routes learned by this router
    pub best_routes_for_router: Vec<RouteRecord>,
}

/// Envelope of `routers.getRouterStatus`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RouterStatusResponse {
    result: RouterStatus,
}

/// Source of router status
#[async_trait]
pub trait RouterStatusApi: Send + Sync {
    async fn get_router_status(&self, query: &RouterQuery) -> Result<RouterStatus, RemoteError>;
}

#[async_trait]
impl RouterStatusApi for GcpClient {
    async fn get_router_status(&self, query: &RouterQuery) -> Result<RouterStatus, RemoteError> {
        let url = self.compute_regional_url(
            &query.project,
            &query.region,
            &format!(
                "routers/{}/getRouterStatus",
                urlencoding::encode(&query.name)
            ),
        );
        let response: RouterStatusResponse = self.get_json(&url).await?;
        Ok(response.result)
    }
}
