//! HTTP handlers for stock reporting and inventory views

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::LowStockSignal;
use crate::services::inventory::{InventoryService, ProductInventoryView, WarehouseInventoryView};
use crate::services::ledger::StockRecord;
use crate::AppState;

/// Body for a stock report
#[derive(Debug, Deserialize)]
pub struct ReportStockInput {
    pub quantity: i64,
}

/// Query parameters for the low-stock view
#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<String>,
}

/// Report the current quantity of a product held in a warehouse
pub async fn update_product_inventory(
    State(state): State<AppState>,
    Path((product_id, warehouse_id)): Path<(i64, i64)>,
    Json(input): Json<ReportStockInput>,
) -> AppResult<Json<StockRecord>> {
    let service = InventoryService::new(state.db);
    let record = service
        .report_stock(product_id, warehouse_id, input.quantity)
        .await?;
    Ok(Json(record))
}

/// Get a product with its aggregate stock and per-warehouse breakdown
pub async fn get_product_inventory(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ProductInventoryView>> {
    let service = InventoryService::new(state.db);
    let view = service.product_view(product_id).await?;
    Ok(Json(view))
}

/// Get a warehouse with its item total and stocked products
pub async fn get_warehouse_inventory(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
) -> AppResult<Json<WarehouseInventoryView>> {
    let service = InventoryService::new(state.db);
    let view = service.warehouse_view(warehouse_id).await?;
    Ok(Json(view))
}

/// Get products at or below their effective reorder threshold
pub async fn get_low_stock_products(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<Vec<LowStockSignal>>> {
    let service = InventoryService::new(state.db);
    let signals = service.low_stock(query.threshold).await?;
    Ok(Json(signals))
}
