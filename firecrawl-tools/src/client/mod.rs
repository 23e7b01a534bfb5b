//! Firecrawl service clients.
//!
//! This module provides:
//! - The [`FirecrawlService`] seam every client implements
//! - [`ClientHandle`], the owned client a tool holds once bootstrapped
//! - Connection settings and credentials
//! - A blocking HTTP client (behind the `http-client` feature)

mod config;
#[cfg(feature = "http-client")]
mod http;

pub use config::{
    ClientConfig, Credentials, API_KEY_ENV, API_URL_ENV, HOSTED_API_URL,
};
#[cfg(feature = "http-client")]
pub use http::HttpFirecrawlClient;

use serde_json::Value;

use crate::errors::ServiceError;
use crate::mapper::WireOptions;

/// The operations the tools need from a Firecrawl client.
///
/// Results are passed through to the caller untouched.
#[cfg_attr(test, mockall::automock)]
pub trait FirecrawlService: Send + Sync {
    /// Crawls a site starting at `url` and returns the finished crawl.
    fn crawl_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError>;

    /// Scrapes a single page.
    fn scrape_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError>;
}

/// A ready-to-use client.
pub struct ClientHandle {
    service: Box<dyn FirecrawlService>,
}

impl ClientHandle {
    /// Wraps a service implementation.
    #[must_use]
    pub fn new(service: impl FirecrawlService + 'static) -> Self {
        Self {
            service: Box::new(service),
        }
    }

    /// Wraps an already boxed service.
    #[must_use]
    pub fn from_boxed(service: Box<dyn FirecrawlService>) -> Self {
        Self { service }
    }

    /// Crawls a site.
    pub fn crawl_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError> {
        self.service.crawl_url(url, options)
    }

    /// Scrapes a page.
    pub fn scrape_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError> {
        self.service.scrape_url(url, options)
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle").finish_non_exhaustive()
    }
}
