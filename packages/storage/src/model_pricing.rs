// ABOUTME: Model pricing storage layer using SQLite
// ABOUTME: Upsert-by-model-id writes and batch reads for synchronized prices

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::StorageError;

/// A pricing row as written during catalog synchronization.
///
/// Prices arrive from the provider as decimal strings and are stored verbatim
/// so no precision is lost in transit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricingUpsert {
    #[serde(rename = "modelId")]
    pub model_id: String,
    #[serde(rename = "promptPrice")]
    pub prompt_price: String,
    #[serde(rename = "completionPrice")]
    pub completion_price: String,
    #[serde(rename = "requestPrice")]
    pub request_price: Option<String>,
    pub currency: String,
}

/// A pricing row as read back, with prices converted to numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    #[serde(rename = "modelId")]
    pub model_id: String,
    #[serde(rename = "promptPrice")]
    pub prompt_price: f64,
    #[serde(rename = "completionPrice")]
    pub completion_price: f64,
    #[serde(rename = "requestPrice")]
    pub request_price: Option<f64>,
    pub currency: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Storage layer for synchronized model pricing
pub struct ModelPricingStorage {
    pool: SqlitePool,
}

impl ModelPricingStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite the pricing row for a model.
    ///
    /// Identity (`model_id`) is preserved; every other field is replaced and
    /// `updated_at` is refreshed.
    pub async fn upsert(&self, record: &ModelPricingUpsert) -> Result<(), StorageError> {
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO model_pricing (
                model_id, prompt_price, completion_price, request_price, currency, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(model_id) DO UPDATE SET
                prompt_price = excluded.prompt_price,
                completion_price = excluded.completion_price,
                request_price = excluded.request_price,
                currency = excluded.currency,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.model_id)
        .bind(&record.prompt_price)
        .bind(&record.completion_price)
        .bind(&record.request_price)
        .bind(&record.currency)
        .bind(&updated_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Get the pricing row for a single model, if one has been synchronized
    pub async fn get(&self, model_id: &str) -> Result<Option<ModelPricing>, StorageError> {
        let row = sqlx::query("SELECT * FROM model_pricing WHERE model_id = ?")
            .bind(model_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(Self::row_to_pricing).transpose()
    }

    /// Batch lookup by model id.
    ///
    /// An empty input returns an empty result without touching the database.
    pub async fn get_by_model_ids(
        &self,
        model_ids: &[&str],
    ) -> Result<Vec<ModelPricing>, StorageError> {
        if model_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; model_ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM model_pricing WHERE model_id IN ({}) ORDER BY model_id ASC",
            placeholders
        );

        debug!("Fetching pricing for {} models", model_ids.len());

        let mut db_query = sqlx::query(&sql);
        for model_id in model_ids {
            db_query = db_query.bind(*model_id);
        }

        let rows = db_query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(Self::row_to_pricing).collect()
    }

    /// Convert a database row to a ModelPricing
    fn row_to_pricing(row: &sqlx::sqlite::SqliteRow) -> Result<ModelPricing, StorageError> {
        let model_id: String = row.try_get("model_id").map_err(StorageError::Sqlx)?;

        let prompt_price = Self::parse_price(row, "prompt_price", &model_id)?;
        let completion_price = Self::parse_price(row, "completion_price", &model_id)?;

        let request_price: Option<String> =
            row.try_get("request_price").map_err(StorageError::Sqlx)?;
        let request_price = request_price
            .map(|raw| {
                raw.parse::<f64>().map_err(|e| {
                    StorageError::Database(format!(
                        "Invalid request_price for {}: {}",
                        model_id, e
                    ))
                })
            })
            .transpose()?;

        let updated_at_str: String = row.try_get("updated_at").map_err(StorageError::Sqlx)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| {
                StorageError::Database(format!("Failed to parse updated_at timestamp: {}", e))
            })?
            .with_timezone(&Utc);

        Ok(ModelPricing {
            model_id,
            prompt_price,
            completion_price,
            request_price,
            currency: row.try_get("currency").map_err(StorageError::Sqlx)?,
            updated_at,
        })
    }

    fn parse_price(
        row: &sqlx::sqlite::SqliteRow,
        column: &str,
        model_id: &str,
    ) -> Result<f64, StorageError> {
        let raw: String = row.try_get(column).map_err(StorageError::Sqlx)?;
        raw.parse::<f64>().map_err(|e| {
            StorageError::Database(format!("Invalid {} for {}: {}", column, model_id, e))
        })
    }
}
