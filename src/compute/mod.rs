//! Compute Engine types
//!
//! - [`route`] - Route records and their attribute mapping
//! - [`router`] - Router status lookup

pub mod route;
pub mod router;

pub use route::{flatten_routes, route_resource_schema, RouteAttributeError, RouteRecord};
pub use router::{RouterQuery, RouterStatus, RouterStatusApi};
