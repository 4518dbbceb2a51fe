//! Inventory service façade
//!
//! The single entry point the routing layer calls for stock operations.
//! Composes the ledger, the aggregation engine, and the replenishment
//! classifier; performs input normalization and nothing else.

use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::LowStockSignal;
use crate::services::aggregation::{AggregationEngine, ProductQuantity, WarehouseQuantity};
use crate::services::ledger::{StockLedger, StockRecord};
use crate::services::product::Product;
use crate::services::replenishment::ReplenishmentClassifier;
use crate::services::warehouse::Warehouse;

/// Façade over the stock ledger, aggregation engine, and classifier
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
    ledger: StockLedger,
    aggregation: AggregationEngine,
    classifier: ReplenishmentClassifier,
}

/// Product-centric inventory view
#[derive(Debug, Serialize)]
pub struct ProductInventoryView {
    pub product: Product,
    pub total_stock: i64,
    pub per_warehouse: Vec<WarehouseQuantity>,
}

/// Warehouse-centric inventory view
#[derive(Debug, Serialize)]
pub struct WarehouseInventoryView {
    pub warehouse: Warehouse,
    pub total_items: i64,
    pub records: Vec<ProductQuantity>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            ledger: StockLedger::new(db.clone()),
            aggregation: AggregationEngine::new(db.clone()),
            classifier: ReplenishmentClassifier::new(db.clone()),
            db,
        }
    }

    /// Record the current quantity of a product held in a warehouse.
    pub async fn report_stock(
        &self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i64,
    ) -> AppResult<StockRecord> {
        self.ledger.upsert(product_id, warehouse_id, quantity).await
    }

    /// A product with its aggregate stock and per-warehouse breakdown.
    pub async fn product_view(&self, product_id: i64) -> AppResult<ProductInventoryView> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, sku, category_id, unit_price, reorder_level,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::UnknownReference {
            entity: "product",
            id: product_id,
        })?;

        let total_stock = self.aggregation.total_stock(product_id).await?;
        let per_warehouse = self.aggregation.per_warehouse_breakdown(product_id).await?;

        Ok(ProductInventoryView {
            product,
            total_stock,
            per_warehouse,
        })
    }

    /// A warehouse with its item total and the products it holds.
    pub async fn warehouse_view(&self, warehouse_id: i64) -> AppResult<WarehouseInventoryView> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            SELECT id, name, location, capacity, manager_name, contact_email,
                   created_at, updated_at
            FROM warehouses
            WHERE id = $1
            "#,
        )
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::UnknownReference {
            entity: "warehouse",
            id: warehouse_id,
        })?;

        let total_items = self.aggregation.total_items(warehouse_id).await?;
        let records = self.aggregation.per_product_breakdown(warehouse_id).await?;

        Ok(WarehouseInventoryView {
            warehouse,
            total_items,
            records,
        })
    }

    /// Low-stock signals, most depleted first.
    ///
    /// The threshold arrives as the raw query-string value. Non-numeric or
    /// negative input is rejected before any store access; an absent or blank
    /// value falls back to each product's own reorder level.
    pub async fn low_stock(&self, threshold: Option<String>) -> AppResult<Vec<LowStockSignal>> {
        let override_threshold = match threshold.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_threshold(raw)?),
        };

        let signals = self.classifier.classify_all(override_threshold).await?;

        Ok(signals.into_iter().filter(|s| s.is_low).collect())
    }
}

/// Coerce the collaborator's raw threshold string to a number.
fn parse_threshold(raw: &str) -> AppResult<i64> {
    let value: i64 = raw
        .parse()
        .map_err(|_| AppError::InvalidThreshold(format!("'{}' is not an integer", raw)))?;

    shared::validate_threshold(value)
        .map_err(|msg| AppError::InvalidThreshold(msg.to_string()))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_valid() {
        assert_eq!(parse_threshold("15").unwrap(), 15);
        assert_eq!(parse_threshold("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_threshold_non_numeric() {
        assert!(matches!(
            parse_threshold("abc"),
            Err(AppError::InvalidThreshold(_))
        ));
        assert!(matches!(
            parse_threshold("1.5"),
            Err(AppError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_parse_threshold_negative() {
        assert!(matches!(
            parse_threshold("-3"),
            Err(AppError::InvalidThreshold(_))
        ));
    }
}
