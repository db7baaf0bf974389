//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use crate::error::{ConfigurationError, RemoteError};
use serde::de::DeserializeOwned;
use url::Url;

/// Public Compute Engine v1 endpoint
pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.googleapis.com/compute/v1/";

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("gcp-router-status/{}", crate::VERSION)
}

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    compute_endpoint: String,
}

impl GcpClient {
    /// Create a new GCP client against the public Compute endpoint
    pub fn new(credentials: GcpCredentials) -> Result<Self, RemoteError> {
        let http = GcpHttpClient::new(&user_agent())?;

        Ok(Self {
            credentials,
            http,
            compute_endpoint: DEFAULT_COMPUTE_ENDPOINT.to_string(),
        })
    }

    /// Point Compute calls at another endpoint (private service connect, emulators, tests)
    pub fn with_compute_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigurationError> {
        let mut url = Url::parse(endpoint).map_err(|source| ConfigurationError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        // URL builders append relative paths directly
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        self.compute_endpoint = url.to_string();
        Ok(self)
    }

    /// Base URL Compute calls are made against, always ending in `/`
    pub fn compute_endpoint(&self) -> &str {
        &self.compute_endpoint
    }

    /// Make an authenticated GET request to a GCP API
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let token = self.credentials.get_token().await?;
        self.http.get_json(url, &token).await
    }

    // =========================================================================
    // Compute Engine API helpers
    // =========================================================================

    /// Build Compute Engine API URL
    pub fn compute_url(&self, project: &str, path: &str) -> String {
        format!(
            "{}projects/{}/{}",
            self.compute_endpoint,
            urlencoding::encode(project),
            path
        )
    }

    /// Build regional Compute Engine API URL
    pub fn compute_regional_url(&self, project: &str, region: &str, resource: &str) -> String {
        self.compute_url(
            project,
            &format!("regions/{}/{}", urlencoding::encode(region), resource),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GcpClient {
        GcpClient::new(GcpCredentials::from_access_token("token")).unwrap()
    }

    #[test]
    fn test_compute_regional_url() {
        assert_eq!(
            client().compute_regional_url("proj-1", "us-central1", "routers/edge/getRouterStatus"),
            "https://compute.googleapis.com/compute/v1/projects/proj-1/regions/us-central1/routers/edge/getRouterStatus"
        );
    }

    #[test]
    fn test_endpoint_override_gets_trailing_slash() {
        let client = client()
            .with_compute_endpoint("http://127.0.0.1:8080/compute/v1")
            .unwrap();
        assert_eq!(client.compute_endpoint(), "http://127.0.0.1:8080/compute/v1/");
        assert_eq!(
            client.compute_url("proj-1", "global/networks"),
            "http://127.0.0.1:8080/compute/v1/projects/proj-1/global/networks"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            client().with_compute_endpoint("not a url"),
            Err(ConfigurationError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(user_agent().starts_with("gcp-router-status/"));
    }
}
