//! Category catalog service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Category service for catalog grouping
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// Product category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category annotated with its product count for list views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
}

/// Input for updating a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List categories with product counts.
    pub async fn list(&self) -> AppResult<Vec<CategorySummary>> {
        let categories = sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT c.id, c.name, c.description,
                   COUNT(p.id) AS product_count,
                   c.created_at, c.updated_at
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Get a single category.
    pub async fn get(&self, category_id: i64) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    /// Create a category.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<Category> {
        shared::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&self.db)
        .await
        .map_err(duplicate_name)?;

        Ok(category)
    }

    /// Update a category. Absent fields keep their current values.
    pub async fn update(&self, category_id: i64, input: UpdateCategoryInput) -> AppResult<Category> {
        if let Some(name) = &input.name {
            shared::validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

        Ok(category)
    }

    /// Delete a category. Products keep existing with their category cleared.
    pub async fn delete(&self, category_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category".to_string()));
        }

        Ok(())
    }
}

fn duplicate_name(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::DuplicateEntry("name".to_string());
        }
    }
    err.into()
}
