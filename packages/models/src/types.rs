// ABOUTME: Model registry type definitions
// ABOUTME: Providers, immutable model handles, and the info shapes handed to consumers

use serde::{Deserialize, Serialize};

/// Language model providers known to the registry.
///
/// All providers except [`Provider::OpenRouter`] serve a fixed model table
/// built at startup; OpenRouter's table is replaced wholesale on each
/// successful catalog refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    Groq,
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::Mistral,
        Provider::Groq,
        Provider::OpenRouter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Mistral => "mistral",
            Provider::Groq => "groq",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Parse a provider id as it appears in chat requests
    pub fn parse(value: &str) -> Option<Provider> {
        match value {
            "openai" => Some(Provider::OpenAi),
            "anthropic" => Some(Provider::Anthropic),
            "google" => Some(Provider::Google),
            "mistral" => Some(Provider::Mistral),
            "groq" => Some(Provider::Groq),
            "openrouter" => Some(Provider::OpenRouter),
            _ => None,
        }
    }

    /// Whether this provider's model table is refreshed at runtime
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Provider::OpenRouter)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider/model pair as it arrives from a chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    pub provider: String,
    pub model: String,
}

/// An immutable reference to a callable model endpoint.
///
/// Keyed by `(provider, model id)`; the base URL is resolved once at
/// construction so lookups never consult configuration again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelHandle {
    provider: Provider,
    model: String,
    base_url: String,
}

impl ModelHandle {
    pub(crate) fn new(provider: Provider, model: impl Into<String>, base_url: &str) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: base_url.to_string(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// URL of the endpoint a chat completion for this model is sent to
    pub fn chat_completions_url(&self) -> String {
        match self.provider {
            Provider::Anthropic => format!("{}/messages", self.base_url),
            Provider::Google => {
                format!("{}/models/{}:generateContent", self.base_url, self.model)
            }
            _ => format!("{}/chat/completions", self.base_url),
        }
    }

    /// Header name/value pair authenticating a request for this model
    pub fn auth_header(&self, api_key: &str) -> (&'static str, String) {
        match self.provider {
            Provider::Anthropic => ("x-api-key", api_key.to_string()),
            Provider::Google => ("x-goog-api-key", api_key.to_string()),
            _ => ("Authorization", format!("Bearer {}", api_key)),
        }
    }
}

/// A single model as reported by [`crate::ModelRegistry::models_info`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(rename = "toolCallsUnsupported")]
    pub tool_calls_unsupported: bool,
}

/// Per-provider model listing with credential status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderModels {
    pub provider: Provider,
    /// Whether a usable (non-empty, non-placeholder) credential is configured
    pub configured: bool,
    pub models: Vec<ModelInfo>,
}
