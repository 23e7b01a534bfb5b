//! Mapping of validated configurations onto the service's request options.
//!
//! The configuration types serialize straight to the service's camel case
//! keys, so equal configurations always produce equal option maps. Omitted
//! lists and maps are emitted as empty collections; `webhook`, `jsonOptions`,
//! `location` and `proxy` are emitted as `null` when unset.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{CrawlConfig, ScrapeOptions};

/// The request options sent alongside the target URL.
pub type WireOptions = Map<String, Value>;

/// Maps a crawl configuration to the service's crawl options.
#[must_use]
pub fn crawl_options(config: &CrawlConfig) -> WireOptions {
    wire_object(config)
}

/// Maps scrape options to the service's scrape options.
///
/// Used both for the scrape tool and for the `scrapeOptions` nested in a crawl.
#[must_use]
pub fn scrape_options(options: &ScrapeOptions) -> WireOptions {
    wire_object(options)
}

fn wire_object<T: Serialize>(config: &T) -> WireOptions {
    // Configs only hold string-keyed maps, so serialization cannot fail.
    match serde_json::to_value(config) {
        Ok(Value::Object(wire)) => wire,
        _ => WireOptions::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        crawl_input_schema, scrape_input_schema, CrawlConfig, Format, ScrapeConfig, Strictness,
        WebhookConfig,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn crawl(value: Value) -> CrawlConfig {
        CrawlConfig::from_args(value.as_object().unwrap(), Strictness::Strict).unwrap()
    }

    fn scrape(value: Value) -> ScrapeConfig {
        ScrapeConfig::from_args(value.as_object().unwrap(), Strictness::Strict).unwrap()
    }

    #[test]
    fn test_crawl_defaults_scenario() {
        let config = crawl(json!({"url": "https://example.com", "max_depth": 2, "limit": 10000}));

        assert_eq!(
            Value::Object(crawl_options(&config)),
            json!({
                "excludePaths": [],
                "includePaths": [],
                "maxDepth": 2,
                "ignoreSitemap": false,
                "ignoreQueryParameters": false,
                "limit": 10000,
                "allowBackwardLinks": false,
                "allowExternalLinks": false,
                "webhook": null,
                "scrapeOptions": {},
            })
        );
    }

    #[test]
    fn test_scrape_defaults_scenario() {
        let config = scrape(json!({"url": "https://example.com"}));

        assert_eq!(
            Value::Object(scrape_options(config.options())),
            json!({
                "formats": ["markdown"],
                "onlyMainContent": true,
                "includeTags": [],
                "excludeTags": [],
                "headers": {},
                "waitFor": 0,
                "mobile": false,
                "skipTlsVerification": false,
                "timeout": 30000,
                "jsonOptions": null,
                "location": null,
                "removeBase64Images": false,
                "blockAds": true,
                "actions": [],
                "proxy": null,
            })
        );
    }

    #[test]
    fn test_given_values_pass_through() {
        let config = scrape(json!({
            "url": "https://example.com",
            "formats": ["markdown", "screenshot@fullPage"],
            "include_tags": ["main"],
            "headers": {"Cookie": "a=1"},
            "json_options": {"prompt": "extract prices"},
            "location": {"country": "DE"},
            "actions": [{"type": "wait", "milliseconds": 500}],
            "proxy": "stealth",
        }));
        let wire = scrape_options(config.options());

        assert_eq!(wire["formats"], json!(["markdown", "screenshot@fullPage"]));
        assert_eq!(wire["includeTags"], json!(["main"]));
        assert_eq!(wire["headers"], json!({"Cookie": "a=1"}));
        assert_eq!(wire["jsonOptions"], json!({"prompt": "extract prices"}));
        assert_eq!(wire["location"], json!({"country": "DE"}));
        assert_eq!(wire["actions"], json!([{"type": "wait", "milliseconds": 500}]));
        assert_eq!(wire["proxy"], json!("stealth"));
    }

    #[test]
    fn test_nested_scrape_options_use_scrape_mapping() {
        let config = crawl(json!({
            "url": "https://example.com",
            "scrape_options": {"formats": ["links"]},
        }));
        let wire = crawl_options(&config);

        let mut expected = scrape_options(&ScrapeOptions::default());
        expected.insert("formats".to_string(), json!([Format::Links.as_str()]));
        assert_eq!(wire["scrapeOptions"], Value::Object(expected));

        let config = CrawlConfig::builder("https://example.com")
            .scrape_options(ScrapeOptions {
                remove_base64_images: true,
                ..ScrapeOptions::default()
            })
            .build()
            .unwrap();
        let wire = crawl_options(&config);

        let mut expected = scrape_options(&ScrapeOptions::default());
        expected.insert("removeBase64Images".to_string(), json!(true));
        assert_eq!(wire["scrapeOptions"], Value::Object(expected));
    }

    #[test]
    fn test_webhook_forms() {
        let config = crawl(json!({"url": "https://example.com", "webhook": "https://h.example.com"}));
        assert_eq!(crawl_options(&config)["webhook"], json!("https://h.example.com"));

        let config = CrawlConfig::builder("https://example.com")
            .webhook(WebhookConfig {
                url: "https://h.example.com".to_string(),
                events: vec!["page".to_string()],
                ..WebhookConfig::default()
            })
            .build()
            .unwrap();
        assert_eq!(
            crawl_options(&config)["webhook"],
            json!({"url": "https://h.example.com", "events": ["page"]})
        );
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let raw = json!({
            "url": "https://example.com",
            "include_paths": ["docs/.*"],
            "scrape_options": {"headers": {"b": "2", "a": "1"}},
        });

        assert_eq!(crawl_options(&crawl(raw.clone())), crawl_options(&crawl(raw)));
    }

    #[test]
    fn test_every_argument_has_its_wire_key() {
        fn camel(name: &str) -> String {
            let mut parts = name.split('_');
            let mut out = parts.next().unwrap_or_default().to_string();
            for part in parts {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }
            out
        }

        fn argument_keys(schema: &Value) -> BTreeSet<String> {
            schema["properties"]
                .as_object()
                .unwrap()
                .keys()
                .filter(|k| k.as_str() != "url")
                .map(|k| camel(k))
                .collect()
        }

        let config = crawl(json!({"url": "https://example.com"}));
        let crawl_keys: BTreeSet<_> = crawl_options(&config).keys().cloned().collect();
        assert_eq!(crawl_keys, argument_keys(&crawl_input_schema()));

        let scrape_keys: BTreeSet<_> = scrape_options(&ScrapeOptions::default())
            .keys()
            .cloned()
            .collect();
        assert_eq!(scrape_keys, argument_keys(&scrape_input_schema()));
    }

    #[test]
    fn test_url_never_in_options() {
        let config = crawl(json!({"url": "https://example.com"}));

        assert!(!crawl_options(&config).contains_key("url"));
    }
}
