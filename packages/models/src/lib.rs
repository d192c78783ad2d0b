// ABOUTME: AI model registry for Banter
// ABOUTME: Provider/model resolution with dynamic catalog refresh and price synchronization

pub mod catalog;
pub mod config;
pub mod registry;
pub mod types;

pub use catalog::CatalogError;
pub use config::RegistryConfig;
pub use registry::{spawn_refresh_task, spawn_refresh_task_every, ModelRegistry};
pub use types::{ModelHandle, ModelInfo, ModelRequest, Provider, ProviderModels};
