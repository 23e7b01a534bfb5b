//! Client library detection and construction.

use crate::client::{ClientConfig, ClientHandle, Credentials};
use crate::errors::ServiceError;

/// Detects whether a client implementation is available and builds it.
#[cfg_attr(test, mockall::automock)]
pub trait ClientLoader: Send + Sync {
    /// Whether the client library can be loaded right now.
    fn is_available(&self) -> bool;

    /// Builds a client with the given credentials.
    fn load(&self, credentials: &Credentials) -> Result<ClientHandle, ServiceError>;
}

/// Loads the built-in HTTP client, available with the `http-client` feature.
#[derive(Debug, Clone, Default)]
pub struct HttpClientLoader {
    config: ClientConfig,
}

impl HttpClientLoader {
    /// Creates a loader that builds clients with the given configuration.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Creates a loader configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// The configuration handed to built clients.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl ClientLoader for HttpClientLoader {
    fn is_available(&self) -> bool {
        cfg!(feature = "http-client")
    }

    #[cfg(feature = "http-client")]
    fn load(&self, credentials: &Credentials) -> Result<ClientHandle, ServiceError> {
        crate::client::HttpFirecrawlClient::new(self.config.clone(), credentials)
            .map(ClientHandle::new)
    }

    #[cfg(not(feature = "http-client"))]
    fn load(&self, _credentials: &Credentials) -> Result<ClientHandle, ServiceError> {
        Err(ServiceError::Transport(
            "built without the `http-client` feature".to_string(),
        ))
    }
}
