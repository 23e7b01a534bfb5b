//! Scrape configuration.

use std::collections::BTreeMap;
use std::fmt;

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{from_arguments, join, Strictness};
use crate::errors::ValidationError;

/// Default scrape timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A common output format.
///
/// `formats` accepts any name the service understands; these are the usual ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Clean markdown.
    Markdown,
    /// Cleaned HTML.
    Html,
    /// Unmodified HTML.
    RawHtml,
    /// Links found on the page.
    Links,
    /// Viewport screenshot.
    Screenshot,
    /// Full-page screenshot.
    ScreenshotFullPage,
    /// Structured JSON extraction.
    Json,
    /// Change tracking against a previous scrape.
    ChangeTracking,
}

impl Format {
    /// The name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::RawHtml => "rawHtml",
            Self::Links => "links",
            Self::Screenshot => "screenshot",
            Self::ScreenshotFullPage => "screenshot@fullPage",
            Self::Json => "json",
            Self::ChangeTracking => "changeTracking",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}

fn default_formats() -> Vec<String> {
    vec![Format::Markdown.into()]
}

const fn default_true() -> bool {
    true
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Page-level scrape options, shared by the scrape tool and nested crawl options.
///
/// Deserializes from snake case arguments and serializes to the service's
/// scrape options in camel case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ScrapeOptions {
    /// Formats to include in the output (markdown, html, rawHtml, links, screenshot, ...)
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Only return the main content of the page excluding headers, navs, footers, etc.
    #[serde(default = "default_true")]
    pub only_main_content: bool,
    /// Tags to include in the output
    #[serde(default)]
    pub include_tags: Vec<String>,
    /// Tags to exclude from the output
    #[serde(default)]
    pub exclude_tags: Vec<String>,
    /// Headers to send with the request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Specify a delay in milliseconds before fetching the content
    #[serde(default)]
    pub wait_for: u64,
    /// Set to true if you want to emulate scraping from a mobile device
    #[serde(default)]
    pub mobile: bool,
    /// Skip TLS certificate verification when making requests
    #[serde(default)]
    pub skip_tls_verification: bool,
    /// Timeout in milliseconds for the scraping operation
    #[serde(default = "default_timeout")]
    #[schemars(range(min = 1))]
    pub timeout: u64,
    /// Options for JSON extraction from the page
    #[serde(default)]
    pub json_options: Option<Map<String, Value>>,
    /// Location settings for the request
    #[serde(default)]
    pub location: Option<Map<String, Value>>,
    /// Removes all base 64 images from the output
    #[serde(default)]
    pub remove_base64_images: bool,
    /// Enables ad-blocking and cookie popup blocking
    #[serde(default = "default_true")]
    pub block_ads: bool,
    /// Actions to perform on the page before grabbing the content
    #[serde(default)]
    pub actions: Vec<Map<String, Value>>,
    /// Specifies the type of proxy to use
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            only_main_content: true,
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            headers: BTreeMap::new(),
            wait_for: 0,
            mobile: false,
            skip_tls_verification: false,
            timeout: DEFAULT_TIMEOUT_MS,
            json_options: None,
            location: None,
            remove_base64_images: false,
            block_ads: true,
            actions: Vec::new(),
            proxy: None,
        }
    }
}

impl ScrapeOptions {
    /// Validates scrape options from a raw argument map.
    pub fn from_args(
        args: &Map<String, Value>,
        strictness: Strictness,
    ) -> Result<Self, ValidationError> {
        let options: Self = from_arguments(args, strictness)?;
        options.validate("")?;
        Ok(options)
    }

    /// Checks the constraints serde cannot express, naming fields under `prefix`.
    pub(crate) fn validate(&self, prefix: &str) -> Result<(), ValidationError> {
        if let Some(i) = self.formats.iter().position(|f| f.trim().is_empty()) {
            return Err(ValidationError::empty(format!(
                "{}[{i}]",
                join(prefix, "formats")
            )));
        }
        if self.timeout < 1 {
            return Err(ValidationError::out_of_range(
                join(prefix, "timeout"),
                "must be at least 1",
            ));
        }
        if self.proxy.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ValidationError::empty(join(prefix, "proxy")));
        }
        Ok(())
    }
}

/// A validated single-page scrape request.
#[derive(Debug, Clone, PartialEq, JsonSchema)]
pub struct ScrapeConfig {
    /// The URL to scrape
    #[schemars(length(min = 1))]
    url: String,
    #[serde(flatten)]
    options: ScrapeOptions,
}

impl ScrapeConfig {
    /// Validates a scrape configuration from a raw argument map.
    ///
    /// Omitted fields take their defaults; under [`Strictness::Strict`] any key
    /// outside the schema is rejected.
    pub fn from_args(
        args: &Map<String, Value>,
        strictness: Strictness,
    ) -> Result<Self, ValidationError> {
        let mut rest = args.clone();
        let url = match rest.remove("url") {
            None | Some(Value::Null) => return Err(ValidationError::required("url")),
            Some(Value::String(url)) => url,
            Some(_) => return Err(ValidationError::invalid_type("url", "a string")),
        };

        let config = Self {
            url,
            options: from_arguments(&rest, strictness)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::empty("url"));
        }
        self.options.validate("")
    }

    /// Starts a builder for the given URL.
    #[must_use]
    pub fn builder(url: impl Into<String>) -> ScrapeConfigBuilder {
        ScrapeConfigBuilder {
            config: Self {
                url: url.into(),
                options: ScrapeOptions::default(),
            },
        }
    }

    /// The page to scrape.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The page-level options.
    #[must_use]
    pub const fn options(&self) -> &ScrapeOptions {
        &self.options
    }
}

/// The JSON Schema for the scrape tool's arguments.
#[must_use]
pub fn scrape_input_schema() -> Value {
    serde_json::to_value(schema_for!(ScrapeConfig)).unwrap_or(Value::Null)
}

/// Builder for [`ScrapeConfig`]; `build` applies the same checks as `from_args`.
#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    fn options(&mut self) -> &mut ScrapeOptions {
        &mut self.config.options
    }

    /// Sets the output formats.
    #[must_use]
    pub fn formats<I, F>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.options().formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether only the main content is returned.
    #[must_use]
    pub fn only_main_content(mut self, only_main_content: bool) -> Self {
        self.options().only_main_content = only_main_content;
        self
    }

    /// Sets the HTML tags to keep.
    #[must_use]
    pub fn include_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options().include_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the HTML tags to drop.
    #[must_use]
    pub fn exclude_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options().exclude_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a custom request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options().headers.insert(name.into(), value.into());
        self
    }

    /// Sets the delay before fetching, in milliseconds.
    #[must_use]
    pub fn wait_for(mut self, millis: u64) -> Self {
        self.options().wait_for = millis;
        self
    }

    /// Sets mobile emulation.
    #[must_use]
    pub fn mobile(mut self, mobile: bool) -> Self {
        self.options().mobile = mobile;
        self
    }

    /// Sets whether TLS verification is skipped.
    #[must_use]
    pub fn skip_tls_verification(mut self, skip: bool) -> Self {
        self.options().skip_tls_verification = skip;
        self
    }

    /// Sets the operation timeout in milliseconds.
    #[must_use]
    pub fn timeout(mut self, millis: u64) -> Self {
        self.options().timeout = millis;
        self
    }

    /// Sets the JSON extraction options.
    #[must_use]
    pub fn json_options(mut self, options: Map<String, Value>) -> Self {
        self.options().json_options = Some(options);
        self
    }

    /// Sets the geolocation settings.
    #[must_use]
    pub fn location(mut self, location: Map<String, Value>) -> Self {
        self.options().location = Some(location);
        self
    }

    /// Sets whether base64 images are stripped.
    #[must_use]
    pub fn remove_base64_images(mut self, remove: bool) -> Self {
        self.options().remove_base64_images = remove;
        self
    }

    /// Sets ad blocking.
    #[must_use]
    pub fn block_ads(mut self, block: bool) -> Self {
        self.options().block_ads = block;
        self
    }

    /// Appends a browser action.
    #[must_use]
    pub fn action(mut self, action: Map<String, Value>) -> Self {
        self.options().actions.push(action);
        self
    }

    /// Sets the proxy selector.
    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.options().proxy = Some(proxy.into());
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<ScrapeConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
