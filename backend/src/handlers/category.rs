//! HTTP handlers for category catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::category::{
    Category, CategoryService, CategorySummary, CreateCategoryInput, UpdateCategoryInput,
};
use crate::AppState;

/// List categories with product counts
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategorySummary>>> {
    let service = CategoryService::new(state.db);
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Get a single category
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.get(category_id).await?;
    Ok(Json(category))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.create(input).await?;
    Ok(Json(category))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Json(input): Json<UpdateCategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CategoryService::new(state.db);
    let category = service.update(category_id, input).await?;
    Ok(Json(category))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = CategoryService::new(state.db);
    service.delete(category_id).await?;
    Ok(Json(()))
}
