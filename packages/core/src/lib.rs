// ABOUTME: Core constants and utilities for Banter
// ABOUTME: Foundational package providing shared functionality across all Banter packages

pub mod constants;
pub mod utils;

// Re-export constants
pub use constants::{CATALOG_REFRESH_INTERVAL, FALLBACK_MODEL, PRICING_CURRENCY};

// Re-export utilities
pub use utils::{is_usable_secret, normalize_base_url};
