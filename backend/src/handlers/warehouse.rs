//! HTTP handlers for warehouse catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::warehouse::{
    CreateWarehouseInput, UpdateWarehouseInput, Warehouse, WarehouseService, WarehouseSummary,
};
use crate::AppState;

/// List warehouses with stock annotations
pub async fn list_warehouses(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WarehouseSummary>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list().await?;
    Ok(Json(warehouses))
}

/// Get a single warehouse
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.get(warehouse_id).await?;
    Ok(Json(warehouse))
}

/// Create a warehouse
pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.create(input).await?;
    Ok(Json(warehouse))
}

/// Update a warehouse
pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
    Json(input): Json<UpdateWarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.update(warehouse_id, input).await?;
    Ok(Json(warehouse))
}

/// Delete a warehouse
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = WarehouseService::new(state.db);
    service.delete(warehouse_id).await?;
    Ok(Json(()))
}
