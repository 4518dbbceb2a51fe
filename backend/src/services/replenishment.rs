//! Replenishment classification
//!
//! Decides which products sit at or below their effective reorder threshold.
//! Aggregate totals come from one grouped query; the threshold precedence and
//! ordering rules are the pure logic in `shared::models::stock`.

use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::{rank_by_depletion, LowStockSignal};

/// Classifier deriving low-stock signals from aggregate totals
#[derive(Clone)]
pub struct ReplenishmentClassifier {
    db: PgPool,
}

/// Row for the per-product total query
#[derive(Debug, sqlx::FromRow)]
struct ProductTotalRow {
    id: i64,
    sku: String,
    name: String,
    reorder_level: i32,
    total_stock: i64,
}

impl ReplenishmentClassifier {
    /// Create a new ReplenishmentClassifier instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Classify a single product against its effective threshold.
    pub async fn classify(
        &self,
        product_id: i64,
        override_threshold: Option<i64>,
    ) -> AppResult<LowStockSignal> {
        let row = sqlx::query_as::<_, ProductTotalRow>(
            r#"
            SELECT p.id, p.sku, p.name, p.reorder_level,
                   COALESCE(SUM(pi.quantity), 0)::BIGINT AS total_stock
            FROM products p
            LEFT JOIN product_inventory pi ON pi.product_id = p.id
            WHERE p.id = $1
            GROUP BY p.id
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::UnknownReference {
            entity: "product",
            id: product_id,
        })?;

        Ok(LowStockSignal::evaluate(
            row.id,
            row.sku,
            row.name,
            row.total_stock,
            row.reorder_level,
            override_threshold,
        ))
    }

    /// Classify every product, most depleted first.
    ///
    /// A supplied override applies uniformly to the whole batch; without one,
    /// each product is measured against its own reorder level.
    pub async fn classify_all(
        &self,
        override_threshold: Option<i64>,
    ) -> AppResult<Vec<LowStockSignal>> {
        let rows = sqlx::query_as::<_, ProductTotalRow>(
            r#"
            SELECT p.id, p.sku, p.name, p.reorder_level,
                   COALESCE(SUM(pi.quantity), 0)::BIGINT AS total_stock
            FROM products p
            LEFT JOIN product_inventory pi ON pi.product_id = p.id
            GROUP BY p.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut signals: Vec<LowStockSignal> = rows
            .into_iter()
            .map(|row| {
                LowStockSignal::evaluate(
                    row.id,
                    row.sku,
                    row.name,
                    row.total_stock,
                    row.reorder_level,
                    override_threshold,
                )
            })
            .collect();

        rank_by_depletion(&mut signals);

        Ok(signals)
    }
}
