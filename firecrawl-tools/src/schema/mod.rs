//! Configuration schema for the crawl and scrape tools.
//!
//! This module provides:
//! - Validated, defaulted configuration types deserialized from raw arguments
//! - JSON Schemas derived from those types for tool definitions
//! - Builders for constructing configurations in code
//!
//! Arguments use snake case; the same types serialize to the service's camel
//! case request options. Validation never touches the network or the
//! filesystem.

mod crawl;
mod scrape;

pub use crawl::{
    crawl_input_schema, CrawlConfig, CrawlConfigBuilder, Webhook, WebhookConfig, DEFAULT_LIMIT,
    DEFAULT_MAX_DEPTH,
};
pub use scrape::{
    scrape_input_schema, Format, ScrapeConfig, ScrapeConfigBuilder, ScrapeOptions,
    DEFAULT_TIMEOUT_MS,
};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::ValidationError;

/// How unknown argument keys are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Unknown keys are ignored.
    #[default]
    Lenient,
    /// Unknown keys are rejected.
    Strict,
}

/// Keys whose objects are configuration structs rather than free-form payloads.
const NESTED_CONFIGS: [&str; 2] = ["scrape_options", "webhook"];

/// Deserializes `args` into `T`, reporting failures by dotted field path.
///
/// A key holding JSON `null` reads the same as a missing key.
pub(crate) fn from_arguments<T: DeserializeOwned>(
    args: &Map<String, Value>,
    strictness: Strictness,
) -> Result<T, ValidationError> {
    let mut unknown = Vec::new();
    let mut track = |path: serde_ignored::Path<'_>| unknown.push(dotted(&path));

    let value = Value::Object(without_nulls(args));
    let parsed: T = serde_path_to_error::deserialize(serde_ignored::Deserializer::new(
        value, &mut track,
    ))
    .map_err(|err| field_error(&err.path().to_string(), &err.inner().to_string()))?;

    match unknown.into_iter().next() {
        Some(field) if strictness == Strictness::Strict => {
            Err(ValidationError::unknown_field(field))
        }
        _ => Ok(parsed),
    }
}

fn without_nulls(args: &Map<String, Value>) -> Map<String, Value> {
    args.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| match value {
            Value::Object(nested) if NESTED_CONFIGS.contains(&key.as_str()) => {
                (key.clone(), Value::Object(without_nulls(nested)))
            }
            _ => (key.clone(), value.clone()),
        })
        .collect()
}

fn dotted(path: &serde_ignored::Path<'_>) -> String {
    use serde_ignored::Path;

    match path {
        Path::Root => String::new(),
        Path::Seq { parent, index } => format!("{}[{index}]", dotted(parent)),
        Path::Map { parent, key } => join(&dotted(parent), key),
        Path::Some { parent }
        | Path::NewtypeStruct { parent }
        | Path::NewtypeVariant { parent } => dotted(parent),
    }
}

fn field_error(path: &str, message: &str) -> ValidationError {
    let path = if path == "." { "" } else { path };

    match message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
    {
        Some(field) => ValidationError::required(join(path, field)),
        None => ValidationError::invalid_value(path, message),
    }
}

pub(crate) fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}
