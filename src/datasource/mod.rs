//! Data sources
//!
//! Registered data sources, looked up by key, and the fan-out used to read many
//! independent records at once.
//!
//! # Architecture
//!
//! - [`resolver`] - Resolves project, region and router for a read
//! - [`router_status`] - The router status data source itself
//!
//! Two keys are registered, one per lookup strategy:
//!
//! - `google_compute_router_status` - router given by `name`
//! - `google_compute_router_status_by_id` - router given by the record identifier

pub mod resolver;
pub mod router_status;

pub use resolver::RouterLookup;
pub use router_status::{router_status_schema, RouterStatusDataSource};

use crate::compute::RouterStatusApi;
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::schema::ResourceData;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const ROUTER_STATUS: &str = "google_compute_router_status";
pub const ROUTER_STATUS_BY_ID: &str = "google_compute_router_status_by_id";

/// Global registry, schemas declared once on first access
static REGISTRY: OnceLock<HashMap<&'static str, RouterStatusDataSource>> = OnceLock::new();

pub fn get_registry() -> &'static HashMap<&'static str, RouterStatusDataSource> {
    REGISTRY.get_or_init(|| {
        HashMap::from([
            (ROUTER_STATUS, RouterStatusDataSource::new(RouterLookup::ByName)),
            (ROUTER_STATUS_BY_ID, RouterStatusDataSource::new(RouterLookup::ById)),
        ])
    })
}

/// Get a data source by key
pub fn get_data_source(key: &str) -> Option<&'static RouterStatusDataSource> {
    get_registry().get(key)
}

/// All registered keys, sorted
pub fn get_all_data_source_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = get_registry().keys().copied().collect();
    keys.sort_unstable();
    keys
}

/// Read independent records with at most `limit` calls in flight
///
/// Results come back in input order; one failing read does not affect the others.
pub async fn read_concurrent<A>(
    data_source: &RouterStatusDataSource,
    records: Vec<ResourceData>,
    config: &ProviderConfig,
    api: &A,
    limit: usize,
) -> Vec<Result<ResourceData>>
where
    A: RouterStatusApi + ?Sized,
{
    stream::iter(records)
        // A failure stays in its own slot; the stream keeps going
        .map(|mut data| async move {
            data_source.read(&mut data, config, api).await?;
            Ok::<_, Error>(data)
        })
        // `buffered` yields in input order, unlike `buffer_unordered`
        .buffered(limit.max(1))
        .collect::<Vec<_>>()
        .await
}
