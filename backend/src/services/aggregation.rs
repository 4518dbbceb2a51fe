//! Query-time stock aggregation
//!
//! Totals are recomputed from live ledger records on every call. There is no
//! cached aggregate to invalidate, so a total can never go stale
//! independently of the ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::ledger::StockLedger;

/// Aggregation engine deriving totals and breakdowns from the stock ledger
#[derive(Clone)]
pub struct AggregationEngine {
    db: PgPool,
    ledger: StockLedger,
}

/// Per-warehouse quantity of a product, annotated for display
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WarehouseQuantity {
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub location: String,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

/// Per-product quantity held in a warehouse, annotated for display
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductQuantity {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl AggregationEngine {
    /// Create a new AggregationEngine instance
    pub fn new(db: PgPool) -> Self {
        let ledger = StockLedger::new(db.clone());
        Self { db, ledger }
    }

    /// Total stock for a product across all warehouses.
    ///
    /// A product with no ledger records totals 0; "never stocked" and
    /// "stocked at zero" are aggregate-equivalent.
    pub async fn total_stock(&self, product_id: i64) -> AppResult<i64> {
        let records = self.ledger.records_for_product(product_id).await?;
        Ok(records.iter().map(|r| i64::from(r.quantity)).sum())
    }

    /// Total items held in a warehouse across all products.
    pub async fn total_items(&self, warehouse_id: i64) -> AppResult<i64> {
        let records = self.ledger.records_for_warehouse(warehouse_id).await?;
        Ok(records.iter().map(|r| i64::from(r.quantity)).sum())
    }

    /// Per-warehouse quantities for a product.
    pub async fn per_warehouse_breakdown(
        &self,
        product_id: i64,
    ) -> AppResult<Vec<WarehouseQuantity>> {
        let breakdown = sqlx::query_as::<_, WarehouseQuantity>(
            r#"
            SELECT pi.warehouse_id, w.name AS warehouse_name, w.location,
                   pi.quantity, pi.updated_at
            FROM product_inventory pi
            JOIN warehouses w ON w.id = pi.warehouse_id
            WHERE pi.product_id = $1
            ORDER BY w.name ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(breakdown)
    }

    /// Per-product quantities held in a warehouse.
    pub async fn per_product_breakdown(
        &self,
        warehouse_id: i64,
    ) -> AppResult<Vec<ProductQuantity>> {
        let breakdown = sqlx::query_as::<_, ProductQuantity>(
            r#"
            SELECT pi.product_id, p.name AS product_name, p.sku, p.unit_price,
                   pi.quantity, pi.updated_at
            FROM product_inventory pi
            JOIN products p ON p.id = pi.product_id
            WHERE pi.warehouse_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        Ok(breakdown)
    }
}
