//! Error types for the Firecrawl tools.
//!
//! Three families of failure exist, each surfacing at a different point:
//!
//! - [`ValidationError`] when a configuration is built from raw arguments
//! - [`BootstrapError`] when a tool is constructed and the client cannot be set up
//! - [`ServiceError`] when the remote service call itself fails
//!
//! [`Error`] wraps all three for the generic [`crate::tools::Tool::run`] entry point.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// The umbrella error type returned by [`crate::tools::Tool::run`].
#[derive(Debug, Error)]
pub enum Error {
    /// The arguments did not satisfy the tool's schema.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The client could not be bootstrapped.
    #[error("{0}")]
    Bootstrap(#[from] BootstrapError),

    /// The remote service call failed.
    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl Error {
    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        match self {
            Self::Validation(err) => err.to_dict(),
            Self::Bootstrap(err) => err.to_dict(),
            Self::Service(err) => err.to_dict(),
        }
    }
}

/// The constraint a configuration field violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// A required field was omitted.
    Required,
    /// The value had the wrong JSON type.
    InvalidType {
        /// Human-readable name of the expected type.
        expected: &'static str,
    },
    /// A numeric value was outside its allowed range.
    OutOfRange {
        /// Description of the allowed range.
        detail: String,
    },
    /// A string or list that must not be empty was empty.
    Empty,
    /// The field is not part of the schema (strict mode only).
    UnknownField,
    /// The value had the right type but is not an accepted value.
    InvalidValue {
        /// What was wrong with the value.
        detail: String,
    },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "field is required"),
            Self::InvalidType { expected } => write!(f, "expected {expected}"),
            Self::OutOfRange { detail } => write!(f, "out of range ({detail})"),
            Self::Empty => write!(f, "must not be empty"),
            Self::UnknownField => write!(f, "unknown field"),
            Self::InvalidValue { detail } => write!(f, "{detail}"),
        }
    }
}

/// Error raised when a configuration field is malformed or out of constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration field '{field}': {constraint}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `scrape_options.formats[1]`).
    pub field: String,
    /// The violated constraint.
    pub constraint: Constraint,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            constraint,
        }
    }

    /// Creates a missing required field error.
    #[must_use]
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, Constraint::Required)
    }

    /// Creates a wrong type error.
    #[must_use]
    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::new(field, Constraint::InvalidType { expected })
    }

    /// Creates an out of range error.
    #[must_use]
    pub fn out_of_range(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(
            field,
            Constraint::OutOfRange {
                detail: detail.into(),
            },
        )
    }

    /// Creates an empty value error.
    #[must_use]
    pub fn empty(field: impl Into<String>) -> Self {
        Self::new(field, Constraint::Empty)
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(field, Constraint::UnknownField)
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(
            field,
            Constraint::InvalidValue {
                detail: detail.into(),
            },
        )
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("ValidationError"));
        map.insert("field".to_string(), serde_json::json!(self.field));
        map.insert(
            "constraint".to_string(),
            serde_json::json!(self.constraint.to_string()),
        );
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Errors raised while bootstrapping the remote-service client.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The client library is absent and installation was declined.
    #[error("`{package}` client library not found, please run `{install_hint}`")]
    MissingDependency {
        /// The client library package.
        package: String,
        /// The command the operator can run to install it.
        install_hint: String,
    },

    /// The installation subprocess failed.
    #[error("Failed to install `{package}` with `{command}`: {source}")]
    DependencyInstall {
        /// The client library package.
        package: String,
        /// The command that was run.
        command: String,
        /// Why it failed.
        #[source]
        source: InstallError,
    },

    /// The install succeeded but the running build cannot pick it up.
    #[error("`{package}` was installed with `{command}`; rebuild the application to use it")]
    RebuildRequired {
        /// The client library package.
        package: String,
        /// The command that was run.
        command: String,
    },

    /// The client library was present but refused to construct a client.
    #[error("{0}")]
    Client(#[from] ServiceError),
}

impl BootstrapError {
    /// Creates a missing dependency error.
    #[must_use]
    pub fn missing_dependency(package: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self::MissingDependency {
            package: package.into(),
            install_hint: install_hint.into(),
        }
    }

    /// Creates a dependency install error.
    #[must_use]
    pub fn dependency_install(
        package: impl Into<String>,
        command: impl Into<String>,
        source: InstallError,
    ) -> Self {
        Self::DependencyInstall {
            package: package.into(),
            command: command.into(),
            source,
        }
    }

    /// Creates a rebuild required error.
    #[must_use]
    pub fn rebuild_required(package: impl Into<String>, command: impl Into<String>) -> Self {
        Self::RebuildRequired {
            package: package.into(),
            command: command.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::MissingDependency {
                package,
                install_hint,
            } => {
                map.insert("type".to_string(), serde_json::json!("MissingDependencyError"));
                map.insert("package".to_string(), serde_json::json!(package));
                map.insert("install_hint".to_string(), serde_json::json!(install_hint));
            }
            Self::DependencyInstall {
                package,
                command,
                source,
            } => {
                map.insert("type".to_string(), serde_json::json!("DependencyInstallError"));
                map.insert("package".to_string(), serde_json::json!(package));
                map.insert("command".to_string(), serde_json::json!(command));
                map.insert("reason".to_string(), serde_json::json!(source.to_string()));
            }
            Self::RebuildRequired { package, command } => {
                map.insert("type".to_string(), serde_json::json!("RebuildRequiredError"));
                map.insert("package".to_string(), serde_json::json!(package));
                map.insert("command".to_string(), serde_json::json!(command));
            }
            Self::Client(err) => return err.to_dict(),
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Why an install command failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    /// The command could not be started.
    #[error("could not run `{program}`: {reason}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// The operating system's reason.
        reason: String,
    },

    /// The command ran and reported failure.
    #[error("command exited with {status}")]
    ExitStatus {
        /// The exit status as reported by the platform.
        status: String,
    },
}

/// A failure reported by the remote service or its client.
///
/// These are passed through to the caller untouched; nothing in this crate
/// retries or reinterprets them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status} error: {body}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The (truncated) response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The service reported `success: false`.
    #[error("Firecrawl rejected the request: {message}")]
    Rejected {
        /// The error message from the service.
        message: String,
    },

    /// A crawl job stopped before completing.
    #[error("Crawl job {id} failed or was stopped (status: {status})")]
    CrawlFailed {
        /// The crawl job id.
        id: String,
        /// The terminal status reported by the service.
        status: String,
    },

    /// No credential is available for an API that requires one.
    #[error("No API key provided for {api_url}; set FIRECRAWL_API_KEY or pass one explicitly")]
    MissingApiKey {
        /// The API base URL that requires a key.
        api_url: String,
    },
}

impl ServiceError {
    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("RemoteServiceError"));

        match self {
            Self::Http { status, .. } => {
                map.insert("status".to_string(), serde_json::json!(status));
            }
            Self::CrawlFailed { id, status } => {
                map.insert("crawl_id".to_string(), serde_json::json!(id));
                map.insert("status".to_string(), serde_json::json!(status));
            }
            Self::Transport(_)
            | Self::Decode(_)
            | Self::Rejected { .. }
            | Self::MissingApiKey { .. } => {}
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field_and_constraint() {
        let err = ValidationError::out_of_range("limit", "must be at least 1");

        assert_eq!(err.field, "limit");
        assert_eq!(
            err.to_string(),
            "Invalid configuration field 'limit': out of range (must be at least 1)"
        );
    }

    #[test]
    fn test_validation_error_to_dict() {
        let err = ValidationError::invalid_type("max_depth", "a non-negative integer");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "ValidationError");
        assert_eq!(dict.get("field").unwrap(), "max_depth");
        assert_eq!(dict.get("constraint").unwrap(), "expected a non-negative integer");
    }

    #[test]
    fn test_missing_dependency_message_includes_hint() {
        let err = BootstrapError::missing_dependency("firecrawl-tools", "cargo add firecrawl-tools");

        assert!(err.to_string().contains("please run `cargo add firecrawl-tools`"));
        assert_eq!(err.to_dict().get("type").unwrap(), "MissingDependencyError");
    }

    #[test]
    fn test_dependency_install_keeps_typed_source() {
        let err = BootstrapError::dependency_install(
            "firecrawl-tools",
            "cargo add firecrawl-tools",
            InstallError::ExitStatus {
                status: "exit status: 101".to_string(),
            },
        );

        assert_eq!(
            err.to_string(),
            "Failed to install `firecrawl-tools` with `cargo add firecrawl-tools`: command exited with exit status: 101"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            err.to_dict().get("reason").unwrap(),
            "command exited with exit status: 101"
        );
    }

    #[test]
    fn test_rebuild_required_message() {
        let err = BootstrapError::rebuild_required("firecrawl-tools", "cargo add firecrawl-tools");

        assert!(err.to_string().contains("rebuild the application"));
        assert!(!err.to_string().contains("please run"));
        assert_eq!(err.to_dict().get("type").unwrap(), "RebuildRequiredError");
    }

    #[test]
    fn test_bootstrap_client_error_delegates_to_service_dict() {
        let err = BootstrapError::from(ServiceError::MissingApiKey {
            api_url: "https://api.firecrawl.dev".to_string(),
        });

        assert_eq!(err.to_dict().get("type").unwrap(), "RemoteServiceError");
    }

    #[test]
    fn test_service_error_to_dict() {
        let err = ServiceError::Http {
            status: 429,
            body: "slow down".to_string(),
        };
        let dict = err.to_dict();

        assert_eq!(dict.get("status").unwrap(), 429);
        assert_eq!(dict.get("message").unwrap(), "HTTP 429 error: slow down");
    }

    #[test]
    fn test_umbrella_error_wraps_each_family() {
        let err: Error = ValidationError::required("url").into();
        assert!(matches!(err, Error::Validation(_)));

        let err: Error = ServiceError::Decode("eof".to_string()).into();
        assert_eq!(err.to_dict().get("type").unwrap(), "RemoteServiceError");
    }
}
