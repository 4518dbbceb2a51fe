//! Per-warehouse stock ledger
//!
//! Authoritative current-state store of per-(product, warehouse) quantities.
//! Reports for an existing pair overwrite in place; the ledger holds current
//! state only, not a movement history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Stock ledger owning upsert semantics for (product, warehouse) quantities
#[derive(Clone)]
pub struct StockLedger {
    db: PgPool,
}

/// A live ledger entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockRecord {
    pub product_id: i64,
    pub warehouse_id: i64,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl StockLedger {
    /// Create a new StockLedger instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Set the quantity for a (product, warehouse) pair.
    ///
    /// Insert-or-update runs as a single statement against the pair's primary
    /// key, so concurrent reports for the same pair serialize in the store and
    /// the later one wins; neither is silently dropped. Quantity is validated
    /// before any store access.
    pub async fn upsert(
        &self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i64,
    ) -> AppResult<StockRecord> {
        shared::validate_quantity(quantity)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let record = sqlx::query_as::<_, StockRecord>(
            r#"
            INSERT INTO product_inventory (product_id, warehouse_id, quantity, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (product_id, warehouse_id)
            DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()
            RETURNING product_id, warehouse_id, quantity, updated_at
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .bind(quantity as i32)
        .fetch_one(&self.db)
        .await
        .map_err(|e| classify_reference_error(e, product_id, warehouse_id))?;

        Ok(record)
    }

    /// All live records for a product, one per stocked warehouse.
    pub async fn records_for_product(&self, product_id: i64) -> AppResult<Vec<StockRecord>> {
        let records = sqlx::query_as::<_, StockRecord>(
            r#"
            SELECT product_id, warehouse_id, quantity, updated_at
            FROM product_inventory
            WHERE product_id = $1
            ORDER BY warehouse_id ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    /// All live records held in a warehouse.
    pub async fn records_for_warehouse(&self, warehouse_id: i64) -> AppResult<Vec<StockRecord>> {
        let records = sqlx::query_as::<_, StockRecord>(
            r#"
            SELECT product_id, warehouse_id, quantity, updated_at
            FROM product_inventory
            WHERE warehouse_id = $1
            ORDER BY product_id ASC
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }
}

/// The store enforces referential integrity; surface its verdict as a typed
/// error naming the missing entity.
fn classify_reference_error(err: sqlx::Error, product_id: i64, warehouse_id: i64) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("product_id") {
                return AppError::UnknownReference {
                    entity: "product",
                    id: product_id,
                };
            }
            if constraint.contains("warehouse_id") {
                return AppError::UnknownReference {
                    entity: "warehouse",
                    id: warehouse_id,
                };
            }
        }
    }
    err.into()
}
