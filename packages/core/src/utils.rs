// ABOUTME: Shared utility functions for Banter
// ABOUTME: Secret presence checks and URL normalization

/// Dummy values users paste from docs and .env templates
const PLACEHOLDER_SECRETS: &[&str] = &[
    "your-api-key",
    "your_api_key",
    "your-api-key-here",
    "changeme",
    "sk-xxxx",
    "sk-xxxxxxxx",
];

/// Checks whether a configured secret is actually usable.
///
/// A secret counts as usable when it is non-empty after trimming and is not a
/// known placeholder value. Purely a presence check, no network validation.
pub fn is_usable_secret(secret: &str) -> bool {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_ascii_lowercase();
    !PLACEHOLDER_SECRETS.contains(&lowered.as_str())
}

/// Strips trailing slashes from a base URL so paths can be concatenated safely
pub fn normalize_base_url(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}
