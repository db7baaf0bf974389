//! Read-only GCP Cloud Router status data source
//!
//! Resolves a router's project, region and name, calls `routers.getRouterStatus` on the
//! Compute API, and flattens the returned network and best routes into a declarative
//! attribute schema.
//!
//! # Example
//!
//! ```ignore
//! use gcp_router_status::config::ProviderConfig;
//! use gcp_router_status::datasource::{get_data_source, ROUTER_STATUS};
//! use gcp_router_status::gcp::{auth::GcpCredentials, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::new(GcpCredentials::new().await?)?;
//!     let ds = get_data_source(ROUTER_STATUS).unwrap();
//!     let mut data = ds.new_data(serde_json::json!({"name": "edge-router"}).as_object().cloned().unwrap());
//!     ds.read(&mut data, &ProviderConfig::new(Some("my-project"), Some("us-central1")), &client).await?;
//!     println!("{}", data.to_json());
//!     Ok(())
//! }
//! ```

pub mod compute;
pub mod config;
pub mod datasource;
pub mod error;
pub mod gcp;
pub mod schema;

/// Version injected at compile time via ROUTER_STATUS_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ROUTER_STATUS_VERSION") {
    Some(v) => v,
    None => "dev",
};
