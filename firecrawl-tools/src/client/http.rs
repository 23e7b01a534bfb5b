//! Blocking HTTP client for the Firecrawl v1 API.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::config::{ClientConfig, Credentials};
use super::FirecrawlService;
use crate::errors::ServiceError;
use crate::mapper::WireOptions;

const ERROR_BODY_LIMIT: usize = 200;

/// Crawl states that mean the job is still running.
const PENDING_STATES: [&str; 6] = ["active", "paused", "pending", "queued", "waiting", "scraping"];

/// Talks to the Firecrawl REST API over HTTP.
pub struct HttpFirecrawlClient {
    client: Client,
    config: ClientConfig,
    api_key: Option<String>,
}

impl HttpFirecrawlClient {
    /// Builds a client for the configured API.
    ///
    /// The hosted API refuses to be used without a key.
    pub fn new(config: ClientConfig, credentials: &Credentials) -> Result<Self, ServiceError> {
        if config.is_hosted() && !credentials.has_key() {
            return Err(ServiceError::MissingApiKey {
                api_url: config.api_url,
            });
        }

        // The blocking client defaults to a 30 second timeout; `None` lifts it.
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: credentials.api_key().map(str::to_string),
            config,
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<Value, ServiceError> {
        let request = self.authorize(self.client.post(self.endpoint(path)).json(body));
        Self::send(request)
    }

    fn get_json(&self, path: &str) -> Result<Value, ServiceError> {
        let request = self.authorize(self.client.get(self.endpoint(path)));
        Self::send(request)
    }

    fn send(request: RequestBuilder) -> Result<Value, ServiceError> {
        let response = request
            .send()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ServiceError::Transport(format!("Failed to read response: {e}")))?;

        read_response(status, &body)
    }
}

impl FirecrawlService for HttpFirecrawlClient {
    fn scrape_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError> {
        let document = self.post_json("/v1/scrape", &request_body(url, options))?;

        Ok(document.get("data").cloned().unwrap_or(Value::Null))
    }

    fn crawl_url(&self, url: &str, options: &WireOptions) -> Result<Value, ServiceError> {
        let started = self.post_json("/v1/crawl", &request_body(url, options))?;
        let id = started
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ServiceError::Decode("crawl response has no job id".to_string()))?
            .to_string();
        info!(crawl_id = %id, url, "Crawl job started");

        let interval = self.config.poll_interval();
        loop {
            let status = self.get_json(&format!("/v1/crawl/{id}"))?;
            match crawl_progress(&id, status)? {
                CrawlProgress::Done(document) => {
                    info!(crawl_id = %id, "Crawl job completed");
                    return Ok(document);
                }
                CrawlProgress::Running(state) => {
                    debug!(crawl_id = %id, state = %state, "Crawl job still running");
                    if interval > Duration::ZERO {
                        std::thread::sleep(interval);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for HttpFirecrawlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFirecrawlClient")
            .field("config", &self.config)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, PartialEq)]
enum CrawlProgress {
    Done(Value),
    Running(String),
}

fn request_body(url: &str, options: &WireOptions) -> Value {
    let mut body = options.clone();
    body.insert("url".to_string(), json!(url));
    Value::Object(body)
}

fn read_response(status: u16, body: &str) -> Result<Value, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(ServiceError::Http {
            status,
            body: truncate(body, ERROR_BODY_LIMIT).to_string(),
        });
    }

    let document: Value =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;

    if document.get("success").and_then(Value::as_bool) == Some(false) {
        let message = document
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(ServiceError::Rejected { message });
    }

    Ok(document)
}

fn crawl_progress(id: &str, document: Value) -> Result<CrawlProgress, ServiceError> {
    let state = document
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| ServiceError::Decode("crawl status response has no status".to_string()))?
        .to_string();

    if state == "completed" {
        Ok(CrawlProgress::Done(document))
    } else if PENDING_STATES.contains(&state.as_str()) {
        Ok(CrawlProgress::Running(state))
    } else {
        Err(ServiceError::CrawlFailed {
            id: id.to_string(),
            status: state,
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    &s[..end]
}
