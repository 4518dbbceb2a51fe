//! Route definitions for the Warehouse Inventory Management platform

use axum::{
    routing::{get, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product catalog and stock views
        .nest("/products", product_routes())
        // Category catalog
        .nest("/categories", category_routes())
        // Warehouse catalog and stock views
        .nest("/warehouses", warehouse_routes())
}

/// Product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/low-stock", get(handlers::get_low_stock_products))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/inventory", get(handlers::get_product_inventory))
        .route(
            "/:product_id/inventory/:warehouse_id",
            put(handlers::update_product_inventory),
        )
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
}

/// Warehouse routes
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_warehouses).post(handlers::create_warehouse),
        )
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse)
                .put(handlers::update_warehouse)
                .delete(handlers::delete_warehouse),
        )
        .route(
            "/:warehouse_id/inventory",
            get(handlers::get_warehouse_inventory),
        )
}
