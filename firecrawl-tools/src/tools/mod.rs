//! The crawl and scrape tools.
//!
//! This module provides:
//! - Tool definitions and the [`Tool`] trait agent frameworks drive
//! - [`CrawlWebsiteTool`] and [`ScrapeWebsiteTool`], which validate their
//!   configuration, map it to the service's options and return the service's
//!   result unchanged

mod crawl;
mod definitions;
mod scrape;


pub use crawl::CrawlWebsiteTool;
pub use definitions::ToolDefinition;
pub use scrape::ScrapeWebsiteTool;

use serde_json::{Map, Value};

use crate::errors::{Error, ValidationError};

/// Trait for tool implementations.
pub trait Tool: Send + Sync {
    /// Returns the tool's name.
    fn name(&self) -> &str;

    /// Returns what the tool does.
    fn description(&self) -> &str;

    /// Returns the tool definition, including its argument schema.
    fn definition(&self) -> ToolDefinition;

    /// Validates raw arguments and runs the tool.
    fn run(&self, args: &Value) -> Result<Value, Error>;
}

pub(crate) fn argument_map(args: &Value) -> Result<&Map<String, Value>, ValidationError> {
    args.as_object()
        .ok_or_else(|| ValidationError::invalid_type("arguments", "a JSON object"))
}
