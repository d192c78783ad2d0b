// ABOUTME: The model registry and its background catalog refresh
// ABOUTME: Static provider tables, whole-table dynamic swaps, and best-effort price sync

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use banter_core::{CATALOG_REFRESH_INTERVAL, FALLBACK_MODEL, PRICING_CURRENCY};
use banter_storage::{ModelPricingStorage, ModelPricingUpsert};

use crate::catalog::{fetch_catalog, CatalogEntry};
use crate::config::RegistryConfig;
use crate::types::{ModelHandle, ModelInfo, ModelRequest, Provider, ProviderModels};

const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4.1", "gpt-4.1-mini", "o1-mini"];

const ANTHROPIC_MODELS: &[&str] = &[
    "claude-sonnet-4-20250514",
    "claude-3-7-sonnet-20250219",
    "claude-3-5-haiku-20241022",
];

const GOOGLE_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-1.5-pro", "gemini-1.5-flash"];

const MISTRAL_MODELS: &[&str] = &[
    "mistral-large-latest",
    "mistral-small-latest",
    "codestral-latest",
];

const GROQ_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
];

/// Models available through the dynamic provider before the first refresh
const OPENROUTER_SEED_MODELS: &[&str] = &["openrouter/auto", "meta-llama/llama-3.1-70b-instruct"];

/// Handles known to reject tool-invocation requests
const TOOL_CALL_DENYLIST: &[(Provider, &str)] = &[
    (Provider::OpenAi, "o1-mini"),
    (Provider::Groq, "mixtral-8x7b-32768"),
    (Provider::OpenRouter, "openrouter/auto"),
];

/// Resolves `(provider, model)` pairs to callable model handles.
///
/// Static provider tables are built once at construction. The dynamic
/// (OpenRouter) table lives behind an `RwLock<Arc<..>>` and is replaced
/// wholesale by [`ModelRegistry::refresh`]; readers take a snapshot of the
/// current `Arc`, so a lookup sees either the table before or after a given
/// refresh, never a partially updated one.
pub struct ModelRegistry {
    config: RegistryConfig,
    client: Client,
    static_tables: HashMap<Provider, HashMap<String, ModelHandle>>,
    dynamic_models: RwLock<Arc<HashMap<String, ModelHandle>>>,
    unsupported: HashSet<ModelHandle>,
    fallback: ModelHandle,
    pricing: ModelPricingStorage,
}

impl ModelRegistry {
    pub fn new(config: RegistryConfig, pricing: ModelPricingStorage) -> Self {
        Self::with_flagged_unsupported(config, pricing, &[])
    }

    /// Create a registry with additional handles flagged as unable to handle
    /// tool calls (on top of the built-in denylist). The set is fixed for the
    /// registry's lifetime.
    pub fn with_flagged_unsupported(
        config: RegistryConfig,
        pricing: ModelPricingStorage,
        flagged: &[(Provider, &str)],
    ) -> Self {
        let static_tables = build_static_tables(&config);

        let openrouter_base = config.base_url(Provider::OpenRouter);
        let seed: HashMap<String, ModelHandle> = OPENROUTER_SEED_MODELS
            .iter()
            .map(|&id| {
                (
                    id.to_string(),
                    ModelHandle::new(Provider::OpenRouter, id, &openrouter_base),
                )
            })
            .collect();

        let unsupported = TOOL_CALL_DENYLIST
            .iter()
            .chain(flagged)
            .map(|&(provider, model)| {
                ModelHandle::new(provider, model, &config.base_url(provider))
            })
            .collect();

        let fallback = ModelHandle::new(
            Provider::OpenAi,
            FALLBACK_MODEL,
            &config.base_url(Provider::OpenAi),
        );

        Self {
            config,
            client: Client::new(),
            static_tables,
            dynamic_models: RwLock::new(Arc::new(seed)),
            unsupported,
            fallback,
            pricing,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The handle every unresolvable lookup degrades to
    pub fn fallback(&self) -> &ModelHandle {
        &self.fallback
    }

    /// Resolve a request to a model handle. Infallible: unknown providers,
    /// unknown models, and absent requests all yield the fallback handle.
    pub fn resolve(&self, request: Option<&ModelRequest>) -> ModelHandle {
        let Some(request) = request else {
            return self.fallback.clone();
        };
        let Some(provider) = Provider::parse(&request.provider) else {
            return self.fallback.clone();
        };

        let handle = if provider.is_dynamic() {
            self.dynamic_snapshot().get(&request.model).cloned()
        } else {
            self.static_tables
                .get(&provider)
                .and_then(|table| table.get(&request.model))
                .cloned()
        };

        handle.unwrap_or_else(|| self.fallback.clone())
    }

    /// List every provider's models with tool-call support flags and a fresh
    /// credential presence check (never cached, never a network call).
    pub fn models_info(&self) -> Vec<ProviderModels> {
        Provider::ALL
            .iter()
            .map(|&provider| {
                let table;
                let models: &HashMap<String, ModelHandle> = if provider.is_dynamic() {
                    table = self.dynamic_snapshot();
                    &table
                } else {
                    self.static_tables
                        .get(&provider)
                        .expect("static table exists for every static provider")
                };

                let mut ids: Vec<&String> = models.keys().collect();
                ids.sort();

                let models = ids
                    .into_iter()
                    .map(|id| ModelInfo {
                        id: id.clone(),
                        tool_calls_unsupported: self.unsupported.contains(&models[id]),
                    })
                    .collect();

                ProviderModels {
                    provider,
                    configured: self.config.is_configured(provider),
                    models,
                }
            })
            .collect()
    }

    /// Whether this handle is known to reject tool-invocation requests
    pub fn is_tool_call_unsupported(&self, handle: &ModelHandle) -> bool {
        self.unsupported.contains(handle)
    }

    /// Snapshot of the current dynamic model table
    pub fn dynamic_snapshot(&self) -> Arc<HashMap<String, ModelHandle>> {
        self.dynamic_models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Refresh the dynamic provider's model table and synchronize pricing.
    ///
    /// Fetch errors and empty entry lists leave the previous table untouched.
    /// A non-empty list replaces the whole table in a single swap, then issues
    /// one best-effort pricing upsert per entry that carries numeric prompt
    /// and completion prices.
    pub async fn refresh(&self) {
        let Some(api_key) = self.config.api_key(Provider::OpenRouter) else {
            debug!("Skipping catalog refresh: no OpenRouter credential");
            return;
        };
        let base_url = self.config.base_url(Provider::OpenRouter);

        let entries = match fetch_catalog(&self.client, &base_url, api_key).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Catalog refresh failed, keeping previous table: {}", e);
                return;
            }
        };

        if entries.is_empty() {
            debug!("Catalog refresh returned no models, keeping previous table");
            return;
        }

        let table: HashMap<String, ModelHandle> = entries
            .iter()
            .map(|entry| {
                (
                    entry.id.clone(),
                    ModelHandle::new(Provider::OpenRouter, entry.id.clone(), &base_url),
                )
            })
            .collect();

        let count = table.len();
        *self
            .dynamic_models
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
        info!("Dynamic model table refreshed: {} models", count);

        self.sync_pricing(&entries).await;
    }

    /// Upsert pricing for every priced entry, concurrently and best-effort.
    /// Individual failures are logged and swallowed.
    async fn sync_pricing(&self, entries: &[CatalogEntry]) {
        let upserts = entries.iter().filter_map(|entry| {
            let pricing = entry.pricing.as_ref()?;
            let record = ModelPricingUpsert {
                model_id: entry.id.clone(),
                prompt_price: pricing.prompt.clone(),
                completion_price: pricing.completion.clone(),
                request_price: pricing.request.clone(),
                currency: PRICING_CURRENCY.to_string(),
            };
            Some(async move {
                if let Err(e) = self.pricing.upsert(&record).await {
                    warn!("Pricing upsert failed for {}: {}", record.model_id, e);
                }
            })
        });

        join_all(upserts).await;
    }
}

fn build_static_tables(config: &RegistryConfig) -> HashMap<Provider, HashMap<String, ModelHandle>> {
    let seed_lists: &[(Provider, &[&str])] = &[
        (Provider::OpenAi, OPENAI_MODELS),
        (Provider::Anthropic, ANTHROPIC_MODELS),
        (Provider::Google, GOOGLE_MODELS),
        (Provider::Mistral, MISTRAL_MODELS),
        (Provider::Groq, GROQ_MODELS),
    ];

    seed_lists
        .iter()
        .map(|&(provider, models)| {
            let base_url = config.base_url(provider);
            let table = models
                .iter()
                .map(|&id| (id.to_string(), ModelHandle::new(provider, id, &base_url)))
                .collect();
            (provider, table)
        })
        .collect()
}

/// Start the periodic catalog refresh at the default interval
pub fn spawn_refresh_task(registry: Arc<ModelRegistry>) -> Option<JoinHandle<()>> {
    spawn_refresh_task_every(registry, CATALOG_REFRESH_INTERVAL)
}

/// Start the periodic catalog refresh for a registry.
///
/// Runs one refresh immediately, then one per `period`, for the process
/// lifetime. Returns `None` without spawning anything when the dynamic
/// provider has no usable credential; the dynamic table then stays at its
/// built-in seed values. Refreshes are awaited in sequence inside the task,
/// so runs never overlap.
pub fn spawn_refresh_task_every(
    registry: Arc<ModelRegistry>,
    period: Duration,
) -> Option<JoinHandle<()>> {
    if !registry.config().is_configured(Provider::OpenRouter) {
        info!("OpenRouter credential not configured; catalog refresh disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            // First tick completes immediately
            interval.tick().await;
            registry.refresh().await;
        }
    }))
}
