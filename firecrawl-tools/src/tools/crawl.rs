//! Website crawl tool.

use serde_json::Value;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::{argument_map, Tool, ToolDefinition};
use crate::bootstrap::Bootstrapper;
use crate::client::{ClientHandle, Credentials};
use crate::errors::{BootstrapError, Error, ServiceError};
use crate::mapper;
use crate::schema::{crawl_input_schema, CrawlConfig, Strictness};

const NAME: &str = "Firecrawl web crawl tool";
const DESCRIPTION: &str = "Crawl webpages using Firecrawl and return the contents";

/// Crawls a website through Firecrawl.
///
/// The client is bootstrapped when the tool is built; a tool that exists
/// always has a working client.
#[derive(Debug)]
pub struct CrawlWebsiteTool {
    client: ClientHandle,
    strictness: Strictness,
}

impl CrawlWebsiteTool {
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

    /// Returns the tool's client. The client is created once, when the tool is built.
    #[must_use]
    pub const fn ensure_client(&self) -> &ClientHandle {
        &self.client
    }

    /// Crawls the site described by `config` and returns the service's result.
    pub fn crawl(&self, config: &CrawlConfig) -> Result<Value, ServiceError> {
        let span = info_span!(
            "crawl_website",
            invocation_id = %Uuid::new_v4(),
            url = %config.url()
        );
        let _guard = span.enter();

        let options = mapper::crawl_options(config);
        debug!(?options, "Mapped crawl options");

        let result = self.client.crawl_url(config.url(), &options)?;
        info!("Crawl finished");
        Ok(result)
    }
}

impl Tool for CrawlWebsiteTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(NAME)
            .with_description(DESCRIPTION)
            .with_input_schema(crawl_input_schema())
    }

    fn run(&self, args: &Value) -> Result<Value, Error> {
        let config = CrawlConfig::from_args(argument_map(args)?, self.strictness)?;
        Ok(self.crawl(&config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockFirecrawlService;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_crawl_passes_mapped_options() {
        let mut service = MockFirecrawlService::new();
        service
            .expect_crawl_url()
            .withf(|url, options| {
                url == "https://example.com"
                    && options["maxDepth"] == json!(3)
                    && options["limit"] == json!(50)
            })
            .times(1)
            .returning(|_, _| Ok(json!({"status": "completed", "data": []})));
        let tool = CrawlWebsiteTool::with_client(ClientHandle::new(service));

        let config = CrawlConfig::builder("https://example.com")
            .max_depth(3)
            .limit(50)
            .build()
            .unwrap();

        assert_eq!(
            tool.crawl(&config).unwrap(),
            json!({"status": "completed", "data": []})
        );
    }

    #[test]
    fn test_run_rejects_non_object_arguments() {
        let tool = CrawlWebsiteTool::with_client(ClientHandle::new(MockFirecrawlService::new()));

        assert!(matches!(
            tool.run(&json!("https://example.com")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_run_validates_before_calling_service() {
        let mut service = MockFirecrawlService::new();
        service.expect_crawl_url().times(0);
        let tool = CrawlWebsiteTool::with_client(ClientHandle::new(service));

        let err = tool.run(&json!({"url": "https://example.com", "limit": 0})).unwrap_err();

        assert!(matches!(err, Error::Validation(ref e) if e.field == "limit"));
    }

    #[test]
    fn test_strict_run_rejects_unknown_keys() {
        let tool = CrawlWebsiteTool::with_client(ClientHandle::new(MockFirecrawlService::new()))
            .with_strictness(Strictness::Strict);

        assert!(tool
            .run(&json!({"url": "https://example.com", "depth": 2}))
            .is_err());
    }

    #[test]
    fn test_definition() {
        let tool = CrawlWebsiteTool::with_client(ClientHandle::new(MockFirecrawlService::new()));
        let def = tool.definition();

        assert_eq!(def.name, "Firecrawl web crawl tool");
        assert_eq!(def.input_schema["required"], json!(["url"]));
    }
}
