//! Low-stock classification rules
//!
//! The replenishment decision is deliberately pure: the backend hands over
//! aggregate totals read from the store, and everything below is plain
//! arithmetic on them.

use serde::{Deserialize, Serialize};

/// Low-stock classification for a single product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LowStockSignal {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    /// Sum of quantities across all warehouses at evaluation time.
    pub total_stock: i64,
    /// The threshold the decision was made against.
    pub effective_threshold: i64,
    pub is_low: bool,
}

impl LowStockSignal {
    /// Classify a product's aggregate stock against its effective threshold.
    ///
    /// A caller-supplied override wins over the product's own reorder level.
    /// In batch evaluation the same override applies to every product; mixing
    /// per-product overrides within one batch is not supported.
    pub fn evaluate(
        product_id: i64,
        sku: String,
        name: String,
        total_stock: i64,
        reorder_level: i32,
        override_threshold: Option<i64>,
    ) -> Self {
        let effective_threshold = effective_threshold(reorder_level, override_threshold);
        Self {
            product_id,
            sku,
            name,
            total_stock,
            effective_threshold,
            is_low: is_below_threshold(total_stock, effective_threshold),
        }
    }
}

/// Resolve the threshold actually used for a low-stock decision.
pub fn effective_threshold(reorder_level: i32, override_threshold: Option<i64>) -> i64 {
    override_threshold.unwrap_or_else(|| i64::from(reorder_level))
}

/// A product exactly at its reorder level is still flagged: the reorder level
/// is the last safe point to reorder, not the last unsafe one.
pub fn is_below_threshold(total_stock: i64, threshold: i64) -> bool {
    total_stock <= threshold
}

/// Order signals most-depleted-first, ties broken by product id so the
/// ordering is deterministic.
pub fn rank_by_depletion(signals: &mut [LowStockSignal]) {
    signals.sort_by_key(|s| (s.total_stock, s.product_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(product_id: i64, total_stock: i64, reorder_level: i32) -> LowStockSignal {
        LowStockSignal::evaluate(
            product_id,
            format!("SKU-{product_id}"),
            format!("Product {product_id}"),
            total_stock,
            reorder_level,
            None,
        )
    }

    #[test]
    fn test_own_reorder_level_used_without_override() {
        assert_eq!(effective_threshold(10, None), 10);
    }

    #[test]
    fn test_override_wins_over_reorder_level() {
        assert_eq!(effective_threshold(10, Some(25)), 25);
        assert_eq!(effective_threshold(10, Some(0)), 0);
    }

    #[test]
    fn test_at_threshold_is_flagged() {
        assert!(is_below_threshold(10, 10));
    }

    #[test]
    fn test_above_threshold_is_not_flagged() {
        assert!(!is_below_threshold(11, 10));
    }

    #[test]
    fn test_evaluate_with_own_level() {
        let s = signal(1, 7, 10);
        assert_eq!(s.effective_threshold, 10);
        assert!(s.is_low);
    }

    #[test]
    fn test_evaluate_ignores_reorder_level_under_override() {
        let s = LowStockSignal::evaluate(1, "SKU-1".into(), "Widget".into(), 7, 10, Some(5));
        assert_eq!(s.effective_threshold, 5);
        assert!(!s.is_low);
    }

    #[test]
    fn test_rank_by_depletion_ascending() {
        let mut signals = vec![signal(1, 20, 5), signal(2, 3, 5), signal(3, 6, 5)];
        rank_by_depletion(&mut signals);
        let totals: Vec<i64> = signals.iter().map(|s| s.total_stock).collect();
        assert_eq!(totals, vec![3, 6, 20]);
    }

    #[test]
    fn test_rank_by_depletion_ties_break_on_product_id() {
        let mut signals = vec![signal(9, 4, 5), signal(2, 4, 5), signal(5, 4, 5)];
        rank_by_depletion(&mut signals);
        let ids: Vec<i64> = signals.iter().map(|s| s.product_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The flag always agrees with the resolved threshold comparison
        #[test]
        fn prop_flag_matches_resolved_threshold(
            total in 0i64..10_000,
            reorder_level in 0i32..1000,
            override_threshold in proptest::option::of(0i64..10_000)
        ) {
            let s = LowStockSignal::evaluate(
                1,
                "SKU-1".to_string(),
                "Product".to_string(),
                total,
                reorder_level,
                override_threshold,
            );

            prop_assert_eq!(
                s.is_low,
                total <= effective_threshold(reorder_level, override_threshold)
            );
        }
    }
}
