//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::services::product::{
    CreateProductInput, Product, ProductFilters, ProductService, ProductSummary,
    UpdateProductInput,
};
use crate::AppState;

/// List products with optional category/search filters
pub async fn list_products(
    State(state): State<AppState>,
    Query(filters): Query<ProductFilters>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let service = ProductService::new(state.db);
    let products = service.list(filters).await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ProductSummary>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(()))
}
