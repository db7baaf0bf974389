//! GCP API interaction module
//!
//! This module provides the transport the data sources read through: authentication,
//! the HTTP client, and the ambient project/region defaults.
//!
//! # Module Structure
//!
//! - [`auth`] - Credentials (ADC or static token) and gcloud defaults
//! - [`client`] - Main GCP client and Compute URL builders
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use gcp_router_status::gcp::{auth::GcpCredentials, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = GcpClient::new(GcpCredentials::new().await?)?;
//!     let url = client.compute_regional_url("my-project", "us-central1", "routers");
//!     let routers: serde_json::Value = client.get_json(&url).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
