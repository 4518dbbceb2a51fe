//! Field validation helpers for the Warehouse Inventory Management platform
//!
//! The HTTP layer hands the services type-coerced values; these checks are the
//! second line of defense on numeric ranges and text fields.

use rust_decimal::Decimal;

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate a reported stock quantity (whole units, never negative)
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity cannot be negative");
    }
    if quantity > i64::from(i32::MAX) {
        return Err("Quantity exceeds the supported range");
    }
    Ok(())
}

/// Validate a low-stock threshold
pub fn validate_threshold(threshold: i64) -> Result<(), &'static str> {
    if threshold < 0 {
        return Err("Threshold cannot be negative");
    }
    Ok(())
}

/// Validate a product reorder level
pub fn validate_reorder_level(level: i32) -> Result<(), &'static str> {
    if level < 0 {
        return Err("Reorder level cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate a product unit price
pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

/// Validate a warehouse capacity (advisory, but still never negative)
pub fn validate_capacity(capacity: i32) -> Result<(), &'static str> {
    if capacity < 0 {
        return Err("Capacity cannot be negative");
    }
    Ok(())
}

/// Validate a display name (product, category, or warehouse)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.len() > 255 {
        return Err("Name must be at most 255 characters");
    }
    Ok(())
}

/// Validate a SKU (non-empty, no whitespace, bounded length)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU is required");
    }
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters");
    }
    if sku.chars().any(char::is_whitespace) {
        return Err("SKU cannot contain whitespace");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}
