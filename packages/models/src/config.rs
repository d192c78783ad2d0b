// ABOUTME: Registry configuration and credential presence checks
// ABOUTME: Per-provider API keys and base URL overrides, loadable from the environment

use std::env;

use banter_core::{is_usable_secret, normalize_base_url};

use crate::types::Provider;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Configuration for a [`crate::ModelRegistry`] instance.
///
/// Constructed explicitly so tests can build isolated registries; production
/// code uses [`RegistryConfig::from_env`].
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub mistral_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,

    /// Base URL override for OpenAI-compatible requests
    pub openai_base_url: Option<String>,
    /// Base URL override for the dynamic OpenRouter catalog
    pub openrouter_base_url: Option<String>,
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
            google_api_key: env::var("GOOGLE_API_KEY").ok(),
            mistral_api_key: env::var("MISTRAL_API_KEY").ok(),
            groq_api_key: env::var("GROQ_API_KEY").ok(),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
            openai_base_url: env::var("OPENAI_BASE_URL").ok(),
            openrouter_base_url: env::var("OPENROUTER_BASE_URL").ok(),
        }
    }

    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::OpenAi => &self.openai_api_key,
            Provider::Anthropic => &self.anthropic_api_key,
            Provider::Google => &self.google_api_key,
            Provider::Mistral => &self.mistral_api_key,
            Provider::Groq => &self.groq_api_key,
            Provider::OpenRouter => &self.openrouter_api_key,
        };
        key.as_deref()
    }

    /// Whether the provider has a usable credential configured.
    ///
    /// Pure presence check, re-evaluated on every call; no caching and no
    /// network round trip.
    pub fn is_configured(&self, provider: Provider) -> bool {
        self.api_key(provider).is_some_and(is_usable_secret)
    }

    /// Resolved base URL for a provider, trailing slashes stripped
    pub fn base_url(&self, provider: Provider) -> String {
        let (override_url, default_url) = match provider {
            Provider::OpenAi => (self.openai_base_url.as_deref(), DEFAULT_OPENAI_BASE_URL),
            Provider::Anthropic => (None, DEFAULT_ANTHROPIC_BASE_URL),
            Provider::Google => (None, DEFAULT_GOOGLE_BASE_URL),
            Provider::Mistral => (None, DEFAULT_MISTRAL_BASE_URL),
            Provider::Groq => (None, DEFAULT_GROQ_BASE_URL),
            Provider::OpenRouter => (
                self.openrouter_base_url.as_deref(),
                DEFAULT_OPENROUTER_BASE_URL,
            ),
        };
        normalize_base_url(override_url.unwrap_or(default_url))
    }
}
