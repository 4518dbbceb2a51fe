//! Catalog field validation tests
//!
//! The HTTP layer forwards type-coerced input; these cover the range and
//! format checks the services apply before touching the store.

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::validation::{
    validate_capacity, validate_email, validate_name, validate_reorder_level, validate_sku,
    validate_unit_price,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_product_name_required() {
        assert!(validate_name("Steel Shelving Unit").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("  ").is_err());
    }

    #[test]
    fn test_sku_format() {
        assert!(validate_sku("SHELF-0042").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("SHELF 0042").is_err());
    }

    #[test]
    fn test_unit_price_non_negative() {
        assert!(validate_unit_price(Decimal::ZERO).is_ok());
        assert!(validate_unit_price(Decimal::new(2499, 2)).is_ok());
        assert!(validate_unit_price(Decimal::new(-2499, 2)).is_err());
    }

    #[test]
    fn test_reorder_level_non_negative() {
        assert!(validate_reorder_level(0).is_ok());
        assert!(validate_reorder_level(-1).is_err());
    }

    #[test]
    fn test_warehouse_capacity_non_negative() {
        assert!(validate_capacity(0).is_ok());
        assert!(validate_capacity(50_000).is_ok());
        assert!(validate_capacity(-10).is_err());
    }

    #[test]
    fn test_contact_email_format() {
        assert!(validate_email("ops@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any non-negative price passes, any negative price fails
        #[test]
        fn prop_unit_price_sign_decides(cents in -1_000_000i64..=1_000_000) {
            let price = Decimal::new(cents, 2);
            prop_assert_eq!(validate_unit_price(price).is_ok(), cents >= 0);
        }

        /// Capacity and reorder level accept exactly the non-negative range
        #[test]
        fn prop_non_negative_ranges(value in -1000i32..=1000) {
            prop_assert_eq!(validate_capacity(value).is_ok(), value >= 0);
            prop_assert_eq!(validate_reorder_level(value).is_ok(), value >= 0);
        }

        /// Whitespace-only names never pass
        #[test]
        fn prop_blank_names_rejected(len in 0usize..10) {
            let name = " ".repeat(len);
            prop_assert!(validate_name(&name).is_err());
        }
    }
}
