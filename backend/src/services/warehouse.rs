//! Warehouse catalog service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Warehouse service for site management
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Warehouse site
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Advisory; not enforced against the ledger sum.
    pub capacity: i32,
    pub manager_name: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Warehouse annotated with stock counts for list views
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WarehouseSummary {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub manager_name: Option<String>,
    pub contact_email: Option<String>,
    pub product_count: i64,
    pub total_items: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a warehouse
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseInput {
    pub name: String,
    pub location: String,
    pub capacity: i32,
    pub manager_name: Option<String>,
    pub contact_email: Option<String>,
}

/// Input for updating a warehouse
#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub manager_name: Option<String>,
    pub contact_email: Option<String>,
}

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List warehouses with distinct product counts and item totals.
    pub async fn list(&self) -> AppResult<Vec<WarehouseSummary>> {
        let warehouses = sqlx::query_as::<_, WarehouseSummary>(
            r#"
            SELECT w.id, w.name, w.location, w.capacity, w.manager_name, w.contact_email,
                   COUNT(DISTINCT pi.product_id) AS product_count,
                   COALESCE(SUM(pi.quantity), 0)::BIGINT AS total_items,
                   w.created_at, w.updated_at
            FROM warehouses w
            LEFT JOIN product_inventory pi ON pi.warehouse_id = w.id
            GROUP BY w.id
            ORDER BY w.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    /// Get a single warehouse.
    pub async fn get(&self, warehouse_id: i64) -> AppResult<Warehouse> {
        sqlx::query_as::<_, Warehouse>(
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
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    /// Create a warehouse.
    pub async fn create(&self, input: CreateWarehouseInput) -> AppResult<Warehouse> {
        Self::validate_fields(
            Some(&input.name),
            Some(&input.location),
            Some(input.capacity),
            input.contact_email.as_deref(),
        )?;

        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (name, location, capacity, manager_name, contact_email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, location, capacity, manager_name, contact_email,
                      created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.location.trim())
        .bind(input.capacity)
        .bind(&input.manager_name)
        .bind(&input.contact_email)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    /// Update a warehouse. Absent fields keep their current values.
    pub async fn update(
        &self,
        warehouse_id: i64,
        input: UpdateWarehouseInput,
    ) -> AppResult<Warehouse> {
        Self::validate_fields(
            input.name.as_deref(),
            input.location.as_deref(),
            input.capacity,
            input.contact_email.as_deref(),
        )?;

        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                capacity = COALESCE($4, capacity),
                manager_name = COALESCE($5, manager_name),
                contact_email = COALESCE($6, contact_email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, location, capacity, manager_name, contact_email,
                      created_at, updated_at
            "#,
        )
        .bind(warehouse_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.location.as_deref().map(str::trim))
        .bind(input.capacity)
        .bind(&input.manager_name)
        .bind(&input.contact_email)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(warehouse)
    }

    /// Delete a warehouse and, via CASCADE, its ledger records.
    pub async fn delete(&self, warehouse_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
            .bind(warehouse_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        Ok(())
    }

    fn validate_fields(
        name: Option<&str>,
        location: Option<&str>,
        capacity: Option<i32>,
        contact_email: Option<&str>,
    ) -> AppResult<()> {
        if let Some(name) = name {
            shared::validate_name(name).map_err(|msg| AppError::Validation {
                field: "name".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(location) = location {
            shared::validate_name(location).map_err(|msg| AppError::Validation {
                field: "location".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(capacity) = capacity {
            shared::validate_capacity(capacity).map_err(|msg| AppError::Validation {
                field: "capacity".to_string(),
                message: msg.to_string(),
            })?;
        }
        if let Some(email) = contact_email {
            shared::validate_email(email).map_err(|msg| AppError::Validation {
                field: "contact_email".to_string(),
                message: msg.to_string(),
            })?;
        }

        Ok(())
    }
}
