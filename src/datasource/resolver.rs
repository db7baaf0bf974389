//! Router lookup
//!
//! Resolves the `(project, region, router)` keys of a read. The router reference comes
//! either from the `name` attribute or from the record's identifier; project and region
//! come from the configured attribute, then the reference itself when it is a full path,
//! then the provider defaults.

use crate::compute::RouterQuery;
use crate::config::ProviderConfig;
use crate::error::ConfigurationError;
use crate::schema::ResourceData;

/// Where a read takes the router from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterLookup {
    /// Explicit `name` attribute; the read assigns the record identifier
    ByName,
    /// Identifier set by a prior read or import
    ById,
}

/// A router reference: a bare name, or a path carrying project and region
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouterRef {
    project: Option<String>,
    region: Option<String>,
    name: String,
}

/// Parse `name`, `projects/{p}/regions/{r}/routers/{n}` or a self-link ending in the latter
fn parse_router_ref(value: &str) -> Result<RouterRef, ConfigurationError> {
    // Bare name
    if !value.contains('/') {
        return Ok(RouterRef {
            project: None,
            region: None,
            name: value.to_string(),
        });
    }

    let malformed = || ConfigurationError::MalformedIdentifier(value.to_string());
    // Self-links carry a scheme and API prefix before the path
    let path = value
        .find("projects/")
        .map(|i| &value[i..])
        .ok_or_else(malformed)?;
    let parts: Vec<&str> = path.split('/').collect();

    match parts.as_slice() {
        ["projects", project, "regions", region, "routers", name]
            if !project.is_empty() && !region.is_empty() && !name.is_empty() =>
        {
            Ok(RouterRef {
                project: Some(project.to_string()),
                region: Some(region.to_string()),
                name: name.to_string(),
            })
        },
        _ => Err(malformed()),
    }
}

impl RouterLookup {
    /// Resolve the lookup keys of `data`, in project, region, router order
    pub fn resolve(
        &self,
        data: &ResourceData,
        config: &ProviderConfig,
    ) -> Result<RouterQuery, ConfigurationError> {
        // Explicit values come from configuration only; attributes a previous
        // read wrote back must not pin the query
        let router = match self {
            RouterLookup::ByName => data
                .config_str("name")
                .map(parse_router_ref)
                .transpose()?,
            RouterLookup::ById => {
                if data.id().is_empty() {
                    return Err(ConfigurationError::MissingIdentifier);
                }
                Some(parse_router_ref(data.id())?)
            },
        };

        // explicit > embedded in the reference > provider default
        let project = match data.config_str("project") {
            Some(project) => project.to_string(),
            None => match router.as_ref().and_then(|r| r.project.clone()) {
                Some(project) => project,
                None => config.project()?.to_string(),
            },
        };

        let region = match data.config_str("region") {
            Some(region) => region.to_string(),
            None => match router.as_ref().and_then(|r| r.region.clone()) {
                Some(region) => region,
                None => config.region()?.to_string(),
            },
        };

        // Project and region fail first, then the router itself
        let Some(router) = router else {
            return Err(ConfigurationError::Unresolved { attribute: "name" });
        };

        Ok(RouterQuery {
            project,
            region,
            name: router.name,
        })
    }

    /// Whether a successful read sets the record identifier
    pub fn assigns_identity(&self) -> bool {
        matches!(self, RouterLookup::ByName)
    }
}
