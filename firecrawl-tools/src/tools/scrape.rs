//! Single-page scrape tool.

use serde_json::Value;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::{argument_map, Tool, ToolDefinition};
use crate::bootstrap::Bootstrapper;
use crate::client::{ClientHandle, Credentials};
use crate::errors::{BootstrapError, Error, ServiceError};
use crate::mapper;
use crate::schema::{scrape_input_schema, ScrapeConfig, Strictness};

const NAME: &str = "Firecrawl web scrape tool";
const DESCRIPTION: &str = "Scrape webpages using Firecrawl and return the contents";

/// Scrapes a single page through Firecrawl.
#[derive(Debug)]
pub struct ScrapeWebsiteTool {
    client: ClientHandle,
    strictness: Strictness,
}

impl ScrapeWebsiteTool {
    /// Builds the tool with the default bootstrapper.
    ///
    /// Without `api_key`, the key is read from `FIRECRAWL_API_KEY`.
    pub fn new(api_key: Option<String>) -> Result<Self, BootstrapError> {
        Self::with_bootstrapper(api_key, &Bootstrapper::default())
    }

    /// Builds the tool, obtaining its client from `bootstrapper`.
    pub fn with_bootstrapper(
        api_key: Option<String>,
        bootstrapper: &Bootstrapper,
    ) -> Result<Self, BootstrapError> {
        let client = bootstrapper.ensure_client(&Credentials::resolve(api_key))?;
        Ok(Self::with_client(client))
    }

    /// Builds the tool around an existing client.
    #[must_use]
    pub fn with_client(client: ClientHandle) -> Self {
        Self {
            client,
            strictness: Strictness::Lenient,
        }
    }

    /// Sets how unknown argument keys are treated by [`Tool::run`].
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Returns the tool's client.
    #[must_use]
    pub const fn ensure_client(&self) -> &ClientHandle {
        &self.client
    }

    /// Scrapes the page described by `config` and returns the service's result.
    pub fn scrape(&self, config: &ScrapeConfig) -> Result<Value, ServiceError> {
        let span = info_span!(
            "scrape_website",
            invocation_id = %Uuid::new_v4(),
            url = %config.url()
        );
        let _guard = span.enter();

        let options = mapper::scrape_options(config.options());
        debug!(?options, "Mapped scrape options");

        let result = self.client.scrape_url(config.url(), &options)?;
        info!("Scrape finished");
        Ok(result)
    }
}

impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(NAME)
            .with_description(DESCRIPTION)
            .with_input_schema(scrape_input_schema())
    }

    fn run(&self, args: &Value) -> Result<Value, Error> {
        let config = ScrapeConfig::from_args(argument_map(args)?, self.strictness)?;
        Ok(self.scrape(&config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockFirecrawlService;
    use crate::schema::Format;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_scrape_returns_result_unchanged() {
        let mut service = MockFirecrawlService::new();
        service
            .expect_scrape_url()
            .withf(|url, options| {
                url == "https://example.com" && options["formats"] == json!(["html", "links"])
            })
            .times(1)
            .returning(|_, _| Ok(json!({"html": "<p>hi</p>", "links": [], "extra": 1})));
        let tool = ScrapeWebsiteTool::with_client(ClientHandle::new(service));

        let config = ScrapeConfig::builder("https://example.com")
            .formats([Format::Html, Format::Links])
            .build()
            .unwrap();

        assert_eq!(
            tool.scrape(&config).unwrap(),
            json!({"html": "<p>hi</p>", "links": [], "extra": 1})
        );
    }

    #[test]
    fn test_run_surfaces_service_errors() {
        let mut service = MockFirecrawlService::new();
        service.expect_scrape_url().returning(|_, _| {
            Err(ServiceError::Http {
                status: 402,
                body: "Payment required".to_string(),
            })
        });
        let tool = ScrapeWebsiteTool::with_client(ClientHandle::new(service));

        let err = tool.run(&json!({"url": "https://example.com"})).unwrap_err();

        assert!(matches!(
            err,
            Error::Service(ServiceError::Http { status: 402, .. })
        ));
    }

    #[test]
    fn test_run_rejects_missing_url() {
        let mut service = MockFirecrawlService::new();
        service.expect_scrape_url().times(0);
        let tool = ScrapeWebsiteTool::with_client(ClientHandle::new(service));

        let err = tool.run(&json!({"formats": ["markdown"]})).unwrap_err();

        assert!(matches!(err, Error::Validation(ref e) if e.field == "url"));
    }

    #[test]
    fn test_definition() {
        let tool = ScrapeWebsiteTool::with_client(ClientHandle::new(MockFirecrawlService::new()));

        assert_eq!(tool.name(), "Firecrawl web scrape tool");
        assert_eq!(
            tool.description(),
            "Scrape webpages using Firecrawl and return the contents"
        );
        assert!(tool.definition().input_schema["properties"]
            .get("only_main_content")
            .is_some());
    }
}
