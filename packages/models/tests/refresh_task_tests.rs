// ABOUTME: Tests for the background catalog refresh task
// ABOUTME: Covers credential gating, the immediate first refresh, and periodic re-fetch

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use banter_models::{spawn_refresh_task_every, ModelRegistry, RegistryConfig};
use banter_storage::{init_pool, ModelPricingStorage};

async fn setup_registry(config: RegistryConfig) -> (Arc<ModelRegistry>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let database_url = format!(
        "sqlite://{}/test.db?mode=rwc",
        temp_dir.path().to_str().unwrap()
    );
    let pool = init_pool(&database_url).await.unwrap();

    let registry = Arc::new(ModelRegistry::new(
        config,
        ModelPricingStorage::new(pool),
    ));
    (registry, temp_dir)
}

/// Poll until the dynamic table contains `model_id` or the deadline passes
async fn wait_for_model(registry: &ModelRegistry, model_id: &str) -> bool {
    for _ in 0..100 {
        if registry.dynamic_snapshot().contains_key(model_id) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_no_credential_means_no_task() {
    let (registry, _temp_dir) = setup_registry(RegistryConfig::default()).await;

    let handle = spawn_refresh_task_every(registry.clone(), Duration::from_millis(10));
    assert!(handle.is_none());

    // Seed table persists for the process lifetime
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(registry.dynamic_snapshot().contains_key("openrouter/auto"));
}

#[tokio::test]
async fn test_placeholder_credential_means_no_task() {
    let config = RegistryConfig {
        openrouter_api_key: Some("your-api-key".to_string()),
        ..Default::default()
    };
    let (registry, _temp_dir) = setup_registry(config).await;

    assert!(spawn_refresh_task_every(registry, Duration::from_millis(10)).is_none());
}

#[tokio::test]
async fn test_task_refreshes_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": "immediate-model" }] })),
        )
        .mount(&server)
        .await;

    let config = RegistryConfig {
        openrouter_api_key: Some("test-key".to_string()),
        openrouter_base_url: Some(server.uri()),
        ..Default::default()
    };
    let (registry, _temp_dir) = setup_registry(config).await;

    // Long period: only the immediate first refresh can fire
    let handle = spawn_refresh_task_every(registry.clone(), Duration::from_secs(3600)).unwrap();

    assert!(wait_for_model(&registry, "immediate-model").await);

    handle.abort();
}

#[tokio::test]
async fn test_task_refreshes_periodically() {
    let server = MockServer::start().await;

    // First response, served once
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "first-batch" }] })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Every later poll sees a different catalog
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "second-batch" }] })),
        )
        .mount(&server)
        .await;

    let config = RegistryConfig {
        openrouter_api_key: Some("test-key".to_string()),
        openrouter_base_url: Some(server.uri()),
        ..Default::default()
    };
    let (registry, _temp_dir) = setup_registry(config).await;

    let handle = spawn_refresh_task_every(registry.clone(), Duration::from_millis(50)).unwrap();

    assert!(wait_for_model(&registry, "second-batch").await);
    // Full replacement on the later refresh as well
    assert!(!registry.dynamic_snapshot().contains_key("first-batch"));

    handle.abort();
}
