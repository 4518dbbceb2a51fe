//! Product catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Product service for catalog management
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product catalog entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub category_id: Option<i64>,
    pub unit_price: Decimal,
    pub reorder_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product annotated with category name and aggregate stock for list views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub unit_price: Decimal,
    pub reorder_level: i32,
    pub total_stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional list filters
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilters {
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub category_id: Option<i64>,
    pub unit_price: Decimal,
    pub reorder_level: Option<i32>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<i64>,
    pub unit_price: Option<Decimal>,
    pub reorder_level: Option<i32>,
}

const SUMMARY_QUERY: &str = r#"
    SELECT p.id, p.name, p.description, p.sku, p.category_id,
           c.name AS category_name,
           p.unit_price, p.reorder_level,
           COALESCE(SUM(pi.quantity), 0)::BIGINT AS total_stock,
           p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN product_inventory pi ON pi.product_id = p.id
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List products with category and stock annotations, optionally filtered
    /// by category or a name/sku search term.
    pub async fn list(&self, filters: ProductFilters) -> AppResult<Vec<ProductSummary>> {
        let query = format!(
            r#"
            {SUMMARY_QUERY}
            WHERE ($1::BIGINT IS NULL OR p.category_id = $1)
              AND ($2::TEXT IS NULL OR p.name ILIKE '%' || $2 || '%' OR p.sku ILIKE '%' || $2 || '%')
            GROUP BY p.id, c.name
            ORDER BY p.created_at DESC
            "#
        );

        let products = sqlx::query_as::<_, ProductSummary>(&query)
            .bind(filters.category_id)
            .bind(filters.search)
            .fetch_all(&self.db)
            .await?;

        Ok(products)
    }

    /// Get a single product with its annotations.
    pub async fn get(&self, product_id: i64) -> AppResult<ProductSummary> {
        let query = format!(
            r#"
            {SUMMARY_QUERY}
            WHERE p.id = $1
            GROUP BY p.id, c.name
            "#
        );

        sqlx::query_as::<_, ProductSummary>(&query)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product.
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        shared::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        shared::validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;
        shared::validate_unit_price(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(level) = input.reorder_level {
            shared::validate_reorder_level(level).map_err(|msg| AppError::Validation {
                field: "reorder_level".to_string(),
                message: msg.to_string(),
            })?;
        }

        self.ensure_category_exists(input.category_id).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, sku, category_id, unit_price, reorder_level)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0))
            RETURNING id, name, description, sku, category_id, unit_price, reorder_level,
                      created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.category_id)
        .bind(input.unit_price)
        .bind(input.reorder_level)
        .fetch_one(&self.db)
        .await
        .map_err(duplicate_sku)?;

        Ok(product)
    }

    /// Update a product. Absent fields keep their current values.
    pub async fn update(&self, product_id: i64, input: UpdateProductInput) -> AppResult<Product> {
        if let Some(name) = &input.name {
            shared::validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(sku) = &input.sku {
            shared::validate_sku(sku).map_err(|msg| AppError::Validation {
                field: "sku".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(price) = input.unit_price {
            shared::validate_unit_price(price).map_err(|msg| AppError::Validation {
                field: "unit_price".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(level) = input.reorder_level {
            shared::validate_reorder_level(level).map_err(|msg| AppError::Validation {
                field: "reorder_level".to_string(),
                message: msg.to_string(),
            })?;
        }

        self.ensure_category_exists(input.category_id).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                sku = COALESCE($4, sku),
                category_id = COALESCE($5, category_id),
                unit_price = COALESCE($6, unit_price),
                reorder_level = COALESCE($7, reorder_level),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, sku, category_id, unit_price, reorder_level,
                      created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.description)
        .bind(&input.sku)
        .bind(input.category_id)
        .bind(input.unit_price)
        .bind(input.reorder_level)
        .fetch_optional(&self.db)
        .await
        .map_err(duplicate_sku)?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Delete a product and, via CASCADE, its ledger records.
    pub async fn delete(&self, product_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: Option<i64>) -> AppResult<()> {
        if let Some(category_id) = category_id {
            let category_exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                    .bind(category_id)
                    .fetch_one(&self.db)
                    .await?;

            if !category_exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        Ok(())
    }
}

fn duplicate_sku(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::DuplicateEntry("sku".to_string());
        }
    }
    err.into()
}
