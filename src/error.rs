//! Error types
//!
//! Every read fails with one of three kinds of error:
//!
//! - [`ConfigurationError`] - a lookup key (project, region, router) could not be resolved
//! - [`RemoteError`] - the Compute API call failed, surfaced as returned
//! - [`SchemaWriteError`] - an attribute write was rejected by the declared schema

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error returned by a data source read
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    SchemaWrite(#[from] SchemaWriteError),
}

impl Error {
    /// Short hint for the user, if the error has a well-known cause
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Configuration(ConfigurationError::Unresolved { attribute: "project" }) => {
                Some("Pass --project, set GOOGLE_CLOUD_PROJECT, or run 'gcloud config set project'.")
            },
            Error::Configuration(ConfigurationError::Unresolved { attribute: "region" }) => {
                Some("Pass --region or run 'gcloud config set compute/region'.")
            },
            Error::Remote(err) => err.hint(),
            _ => None,
        }
    }
}

/// A lookup key could not be determined
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("cannot determine {attribute}: set it on the data source or configure a provider default")]
    Unresolved { attribute: &'static str },
    #[error("cannot determine router: the record has no identifier")]
    MissingIdentifier,
    #[error("malformed router identifier {0:?}")]
    MalformedIdentifier(String),
    #[error("invalid compute endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

/// The Compute API call failed
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("GCP API request failed ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to parse response JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to get access token: {0}")]
    Auth(#[source] gcp_auth::Error),
    #[error("failed to initialize HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RemoteError {
    /// HTTP status of the failed call, if the API answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            RemoteError::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// User-facing hint for common failure codes
    pub fn hint(&self) -> Option<&'static str> {
        if let RemoteError::Auth(_) = self {
            return Some("Run 'gcloud auth application-default login'.");
        }

        match self.status()?.as_u16() {
            400 => Some("Invalid request. Check the router name, project and region."),
            401 => Some("Authentication failed. Run 'gcloud auth application-default login'."),
            403 => Some("Permission denied. Check your GCP IAM permissions."),
            404 => Some("Router not found."),
            429 => Some("Rate limit exceeded. Please try again later."),
            500 | 503 => Some("GCP service temporarily unavailable. Please try again."),
            _ => None,
        }
    }
}

/// An attribute write was rejected by the schema
///
/// This is a contract violation between the flattener and the declared schema,
/// never a user error.
#[derive(Debug, Error)]
#[error("Error setting {field}: {reason}")]
pub struct SchemaWriteError {
    pub field: String,
    pub reason: String,
}

impl SchemaWriteError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_hint_by_status() {
        let err = RemoteError::Api {
            status: StatusCode::FORBIDDEN,
            message: "Required 'compute.routers.get' permission".to_string(),
        };
        assert_eq!(
            err.hint(),
            Some("Permission denied. Check your GCP IAM permissions.")
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_api_error_message_is_verbatim() {
        let err = RemoteError::Api {
            status: StatusCode::NOT_FOUND,
            message: "The resource 'projects/p/regions/r/routers/x' was not found".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err
            .to_string()
            .ends_with("The resource 'projects/p/regions/r/routers/x' was not found"));
    }

    #[test]
    fn test_unresolved_project_hint() {
        let err = Error::from(ConfigurationError::Unresolved { attribute: "project" });
        assert!(err.hint().unwrap().contains("--project"));
        assert!(err.to_string().starts_with("cannot determine project"));
    }

    #[test]
    fn test_schema_write_error_message() {
        let err = SchemaWriteError::new("best_routes", "expected a list");
        assert_eq!(err.to_string(), "Error setting best_routes: expected a list");
    }
}
