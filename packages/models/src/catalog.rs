// ABOUTME: Dynamic provider catalog fetch and parsing
// ABOUTME: GET {base}/models with bearer auth, tolerant parsing of the entry list

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Catalog returned status {0}")]
    Status(reqwest::StatusCode),
}

/// One model entry from the provider catalog.
///
/// `pricing` is present only when both prompt and completion prices parse as
/// numbers; the original decimal strings are kept for lossless persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub pricing: Option<CatalogPricing>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPricing {
    pub prompt: String,
    pub completion: String,
    pub request: Option<String>,
}

/// Fetch the model catalog from `{base_url}/models`.
///
/// Network failures and non-success statuses are errors; a response body of
/// an unexpected shape parses to an empty entry list instead.
pub(crate) async fn fetch_catalog(
    client: &Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let url = format!("{}/models", base_url);
    debug!("Fetching model catalog: {}", url);

    let response = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Accept", "application/json")
        .header("Cache-Control", "no-cache")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(CatalogError::Status(response.status()));
    }

    let body: Value = response.json().await?;
    Ok(parse_catalog(&body))
}

/// Parse a catalog response body into model entries.
///
/// Accepts either a `data` or a `models` array; anything else yields an empty
/// list. Entries without a non-empty string `id` are skipped.
pub(crate) fn parse_catalog(body: &Value) -> Vec<CatalogEntry> {
    let entries = body
        .get("data")
        .or_else(|| body.get("models"))
        .and_then(Value::as_array);

    let Some(entries) = entries else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id")?.as_str()?;
            if id.is_empty() {
                return None;
            }
            Some(CatalogEntry {
                id: id.to_string(),
                pricing: parse_pricing(entry.get("pricing")),
            })
        })
        .collect()
}

fn parse_pricing(pricing: Option<&Value>) -> Option<CatalogPricing> {
    let pricing = pricing?;
    let prompt = price_text(pricing.get("prompt")?)?;
    let completion = price_text(pricing.get("completion")?)?;
    let request = pricing.get("request").and_then(price_text);

    Some(CatalogPricing {
        prompt,
        completion,
        request,
    })
}

/// Keep a price only if it is a number or a string that parses as one
fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            s.parse::<f64>().ok()?;
            Some(s.clone())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
