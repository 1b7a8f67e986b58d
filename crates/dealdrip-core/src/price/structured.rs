//! Price lookup in JSON-LD structured data blocks.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use super::bounds::PriceBounds;
use super::normalize::normalize_price;

lazy_static! {
    static ref LD_JSON_SCRIPT: Regex = Regex::new(
        r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#
    ).unwrap();
}

/// Key paths tried in order inside each JSON-LD document.
const PRICE_PATHS: &[&[&str]] = &[
    &["offers", "price"],
    &["offers", "lowPrice"],
    &["offers", "highPrice"],
    &["price"],
    &["priceRange"],
];

/// Find a price in the page's `application/ld+json` scripts.
///
/// Blocks that are not valid JSON are skipped. A top-level array is
/// represented by its first element, as is an `offers` array.
pub fn extract_structured_price(html: &str) -> Option<f64> {
    for caps in LD_JSON_SCRIPT.captures_iter(html) {
        let body = caps[1].trim();
        if body.is_empty() {
            continue;
        }

        let document: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                debug!("Skipping malformed JSON-LD block: {}", e);
                continue;
            }
        };

        if let Some(price) = price_in_document(&document) {
            info!("Found price {:.2} in structured data", price);
            return Some(price);
        }
    }

    None
}

fn price_in_document(document: &Value) -> Option<f64> {
    let document = first_if_array(document)?;

    PRICE_PATHS.iter().find_map(|path| {
        let mut current = document;
        for key in *path {
            current = first_if_array(current.get(*key)?)?;
        }
        price_from_value(current)
    })
}

fn first_if_array(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

fn price_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| PriceBounds::UNIVERSAL.contains(*v)),
        Value::String(s) => normalize_price(s),
        _ => None,
    }
}
