use std::time::Duration;

/// Model id every lookup degrades to when the requested pair is unknown.
/// Served by the OpenAI provider's static table.
pub const FALLBACK_MODEL: &str = "gpt-4o-mini";

/// Currency code written on every synchronized pricing record
pub const PRICING_CURRENCY: &str = "USD";

/// Interval between dynamic catalog refreshes (30 minutes)
pub const CATALOG_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);
