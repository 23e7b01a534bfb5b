//! # Firecrawl Tools
//!
//! Crawl and scrape tools for agent frameworks, backed by the Firecrawl service.
//!
//! The crate provides:
//!
//! - **Validated configuration**: every crawl and scrape option with its default,
//!   checked before anything leaves the process
//! - **Deterministic request mapping**: configurations translated into the
//!   service's field names and nesting
//! - **Client bootstrap**: a working client or a clear error, with an optional
//!   interactive install when the client library is missing
//! - **Tool facades**: one call per tool, returning the service's result as-is
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use firecrawl_tools::prelude::*;
//!
//! let tool = ScrapeWebsiteTool::new(Some("fc-...".to_string()))?;
//! let config = ScrapeConfig::builder("https://example.com")
//!     .formats([Format::Markdown, Format::Links])
//!     .build()?;
//!
//! let page = tool.scrape(&config)?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod bootstrap;
pub mod client;
pub mod errors;
pub mod mapper;
pub mod observability;
pub mod schema;
pub mod testing;
pub mod tools;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrap::{
        AlwaysConfirm, Bootstrapper, ClientLoader, CommandInstaller, Confirm, ConsolePrompt,
        HttpClientLoader, Installer, NeverConfirm,
    };
    pub use crate::client::{ClientConfig, ClientHandle, Credentials, FirecrawlService};
    pub use crate::errors::{BootstrapError, Error, InstallError, ServiceError, ValidationError};
    pub use crate::mapper::{crawl_options, scrape_options, WireOptions};
    pub use crate::schema::{
        CrawlConfig, Format, ScrapeConfig, ScrapeOptions, Strictness, Webhook, WebhookConfig,
    };
    pub use crate::tools::{CrawlWebsiteTool, ScrapeWebsiteTool, Tool, ToolDefinition};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
