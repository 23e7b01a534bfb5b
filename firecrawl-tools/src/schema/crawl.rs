//! Crawl configuration.

use std::collections::BTreeMap;
use std::fmt;

use schemars::{schema_for, JsonSchema};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::scrape::ScrapeOptions;
use super::{from_arguments, Strictness};
use crate::errors::ValidationError;

/// Default crawl depth.
pub const DEFAULT_MAX_DEPTH: u32 = 2;
/// Default crawl page limit.
pub const DEFAULT_LIMIT: u32 = 10_000;

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Where crawl notifications are delivered.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Webhook {
    /// A bare notification URL.
    Url(String),
    /// A notification endpoint with extra settings.
    Config(WebhookConfig),
}

/// Structured webhook settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebhookConfig {
    /// Notification URL.
    pub url: String,
    /// Headers sent with each notification.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Metadata echoed back in each notification.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    /// Event types to subscribe to (`started`, `page`, `completed`, `failed`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

impl Webhook {
    /// The notification URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Config(config) => &config.url,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Url(url) if url.trim().is_empty() => Err(ValidationError::empty("webhook")),
            Self::Config(config) if config.url.trim().is_empty() => {
                Err(ValidationError::empty("webhook.url"))
            }
            _ => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for Webhook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WebhookVisitor;

        impl<'de> Visitor<'de> for WebhookVisitor {
            type Value = Webhook;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a URL string or an object")
            }

            fn visit_str<E: de::Error>(self, url: &str) -> Result<Webhook, E> {
                Ok(Webhook::Url(url.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Webhook, A::Error> {
                WebhookConfig::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(Webhook::Config)
            }
        }

        deserializer.deserialize_any(WebhookVisitor)
    }
}

/// A validated crawl request.
///
/// Deserializes from snake case arguments and serializes to the service's
/// crawl options (camel case, without the URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CrawlConfig {
    /// Base URL to start crawling from
    #[serde(skip_serializing)]
    #[schemars(length(min = 1))]
    pub(crate) url: String,
    /// URL patterns to exclude from the crawl
    #[serde(default)]
    pub(crate) exclude_paths: Vec<String>,
    /// URL patterns to include in the crawl
    #[serde(default)]
    pub(crate) include_paths: Vec<String>,
    /// Maximum depth to crawl relative to the entered URL
    #[serde(default = "default_max_depth")]
    pub(crate) max_depth: u32,
    /// Ignore the website sitemap when crawling
    #[serde(default)]
    pub(crate) ignore_sitemap: bool,
    /// Do not re-scrape the same path with different (or none) query parameters
    #[serde(default)]
    pub(crate) ignore_query_parameters: bool,
    /// Maximum number of pages to crawl
    #[serde(default = "default_limit")]
    #[schemars(range(min = 1))]
    pub(crate) limit: u32,
    /// Enables the crawler to navigate from a specific URL to previously linked pages
    #[serde(default)]
    pub(crate) allow_backward_links: bool,
    /// Allows the crawler to follow links to external websites
    #[serde(default)]
    pub(crate) allow_external_links: bool,
    /// Webhook configuration for crawl notifications
    #[serde(default)]
    pub(crate) webhook: Option<Webhook>,
    /// Options for scraping pages during crawl
    #[serde(default, serialize_with = "object_or_empty")]
    pub(crate) scrape_options: Option<ScrapeOptions>,
}

fn object_or_empty<S: Serializer>(
    options: &Option<ScrapeOptions>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match options {
        Some(options) => options.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl CrawlConfig {
    fn new(url: String) -> Self {
        Self {
            url,
            exclude_paths: Vec::new(),
            include_paths: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            ignore_sitemap: false,
            ignore_query_parameters: false,
            limit: DEFAULT_LIMIT,
            allow_backward_links: false,
            allow_external_links: false,
            webhook: None,
            scrape_options: None,
        }
    }

    /// Validates a crawl configuration from a raw argument map.
    ///
    /// Omitted fields take their defaults; under [`Strictness::Strict`] any key
    /// outside the schema (including inside `scrape_options` and `webhook`) is
    /// rejected.
    pub fn from_args(
        args: &Map<String, Value>,
        strictness: Strictness,
    ) -> Result<Self, ValidationError> {
        let config: Self = from_arguments(args, strictness)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::empty("url"));
        }
        if self.limit < 1 {
            return Err(ValidationError::out_of_range("limit", "must be at least 1"));
        }
        if let Some(webhook) = &self.webhook {
            webhook.validate()?;
        }
        if let Some(options) = &self.scrape_options {
            options.validate("scrape_options")?;
        }
        Ok(())
    }

    /// Starts a builder for the given URL.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            config: Self::new(url.into()),
        }
    }

    /// The URL the crawl starts from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path patterns to skip.
    #[must_use]
    pub fn exclude_paths(&self) -> &[String] {
        &self.exclude_paths
    }

    /// Path patterns to restrict the crawl to.
    #[must_use]
    pub fn include_paths(&self) -> &[String] {
        &self.include_paths
    }

    /// Maximum link depth from the start URL.
    #[must_use]
    pub const fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Whether the sitemap is ignored.
    #[must_use]
    pub const fn ignore_sitemap(&self) -> bool {
        self.ignore_sitemap
    }

    /// Whether query-string variants of a path are skipped.
    #[must_use]
    pub const fn ignore_query_parameters(&self) -> bool {
        self.ignore_query_parameters
    }

    /// Maximum number of pages.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether links back up the path hierarchy are followed.
    #[must_use]
    pub const fn allow_backward_links(&self) -> bool {
        self.allow_backward_links
    }

    /// Whether links to other sites are followed.
    #[must_use]
    pub const fn allow_external_links(&self) -> bool {
        self.allow_external_links
    }

    /// The notification webhook, if given.
    #[must_use]
    pub const fn webhook(&self) -> Option<&Webhook> {
        self.webhook.as_ref()
    }

    /// Per-page scrape options, if given.
    #[must_use]
    pub const fn scrape_options(&self) -> Option<&ScrapeOptions> {
        self.scrape_options.as_ref()
    }
}

/// The JSON Schema for the crawl tool's arguments.
#[must_use]
pub fn crawl_input_schema() -> Value {
    serde_json::to_value(schema_for!(CrawlConfig)).unwrap_or(Value::Null)
}

/// Builder for [`CrawlConfig`]; `build` applies the same checks as `from_args`.
#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl CrawlConfigBuilder {
    /// Sets the path patterns to skip.
    #[must_use]
    pub fn exclude_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude_paths = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the path patterns to restrict the crawl to.
    #[must_use]
    pub fn include_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.include_paths = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the maximum link depth.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Sets whether the sitemap is ignored.
    #[must_use]
    pub fn ignore_sitemap(mut self, ignore: bool) -> Self {
        self.config.ignore_sitemap = ignore;
        self
    }

    /// Sets whether query-string variants are skipped.
    #[must_use]
    pub fn ignore_query_parameters(mut self, ignore: bool) -> Self {
        self.config.ignore_query_parameters = ignore;
        self
    }

    /// Sets the page limit.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.config.limit = limit;
        self
    }

    /// Sets whether backward links are followed.
    #[must_use]
    pub fn allow_backward_links(mut self, allow: bool) -> Self {
        self.config.allow_backward_links = allow;
        self
    }

    /// Sets whether external links are followed.
    #[must_use]
    pub fn allow_external_links(mut self, allow: bool) -> Self {
        self.config.allow_external_links = allow;
        self
    }

    /// Sets a bare webhook URL.
    #[must_use]
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.config.webhook = Some(Webhook::Url(url.into()));
        self
    }

    /// Sets a structured webhook.
    #[must_use]
    pub fn webhook(mut self, webhook: WebhookConfig) -> Self {
        self.config.webhook = Some(Webhook::Config(webhook));
        self
    }

    /// Sets the per-page scrape options.
    #[must_use]
    pub fn scrape_options(mut self, options: ScrapeOptions) -> Self {
        self.config.scrape_options = Some(options);
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<CrawlConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
