//! Inventory aggregation and replenishment tests
//!
//! Covers the core stock invariants:
//! - Ledger upsert semantics: one record per (product, warehouse) pair,
//!   last accepted write wins, rejected writes leave the ledger unchanged
//! - Aggregate accuracy: total stock is the sum over live records
//! - Low-stock classification: threshold precedence, `<=` semantics, and
//!   depletion-first ordering

use proptest::prelude::*;
use std::collections::BTreeMap;

use shared::models::{effective_threshold, is_below_threshold, rank_by_depletion, LowStockSignal};
use shared::validation::validate_quantity;

/// In-memory stand-in for the (product, warehouse)-keyed ledger table: one
/// slot per pair, and an accepted report overwrites the slot. Mirrors the
/// store's conflict-on-primary-key upsert.
#[derive(Debug, Default)]
struct LedgerModel {
    records: BTreeMap<(i64, i64), i64>,
}

impl LedgerModel {
    fn upsert(
        &mut self,
        product_id: i64,
        warehouse_id: i64,
        quantity: i64,
    ) -> Result<(), &'static str> {
        validate_quantity(quantity)?;
        self.records.insert((product_id, warehouse_id), quantity);
        Ok(())
    }

    fn quantity(&self, product_id: i64, warehouse_id: i64) -> Option<i64> {
        self.records.get(&(product_id, warehouse_id)).copied()
    }

    fn record_count(&self, product_id: i64, warehouse_id: i64) -> usize {
        usize::from(self.records.contains_key(&(product_id, warehouse_id)))
    }

    fn total_stock(&self, product_id: i64) -> i64 {
        self.records
            .iter()
            .filter(|((p, _), _)| *p == product_id)
            .map(|(_, q)| *q)
            .sum()
    }

    fn total_items(&self, warehouse_id: i64) -> i64 {
        self.records
            .iter()
            .filter(|((_, w), _)| *w == warehouse_id)
            .map(|(_, q)| *q)
            .sum()
    }
}

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

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A first report creates the record, a second overwrites it
    #[test]
    fn test_upsert_creates_then_overwrites() {
        let mut ledger = LedgerModel::default();

        ledger.upsert(1, 1, 5).unwrap();
        assert_eq!(ledger.quantity(1, 1), Some(5));

        ledger.upsert(1, 1, 9).unwrap();
        assert_eq!(ledger.quantity(1, 1), Some(9));
        assert_eq!(ledger.record_count(1, 1), 1);
    }

    /// Competing reports for the same pair leave one of the reported values,
    /// never a merged one
    #[test]
    fn test_competing_reports_leave_one_value() {
        for order in [[5, 9], [9, 5]] {
            let mut ledger = LedgerModel::default();
            for quantity in order {
                ledger.upsert(1, 1, quantity).unwrap();
            }
            assert_eq!(ledger.record_count(1, 1), 1);
            assert!([5, 9].contains(&ledger.quantity(1, 1).unwrap()));
        }
    }

    /// A negative report is rejected and the ledger is unchanged
    #[test]
    fn test_negative_quantity_rejected() {
        let mut ledger = LedgerModel::default();
        ledger.upsert(1, 1, 10).unwrap();

        assert!(ledger.upsert(1, 1, -1).is_err());
        assert_eq!(ledger.quantity(1, 1), Some(10));
    }

    /// Total stock sums the product's records across warehouses
    #[test]
    fn test_total_stock_sums_across_warehouses() {
        let mut ledger = LedgerModel::default();
        ledger.upsert(1, 1, 3).unwrap();
        ledger.upsert(1, 2, 4).unwrap();
        ledger.upsert(2, 1, 50).unwrap();

        assert_eq!(ledger.total_stock(1), 7);
    }

    /// A product with no records totals zero, not an error
    #[test]
    fn test_total_stock_zero_without_records() {
        let ledger = LedgerModel::default();
        assert_eq!(ledger.total_stock(42), 0);
    }

    /// Warehouse totals sum over the records it holds
    #[test]
    fn test_total_items_per_warehouse() {
        let mut ledger = LedgerModel::default();
        ledger.upsert(1, 1, 3).unwrap();
        ledger.upsert(2, 1, 4).unwrap();
        ledger.upsert(1, 2, 100).unwrap();

        assert_eq!(ledger.total_items(1), 7);
        assert_eq!(ledger.total_items(2), 100);
    }

    /// Without an override each product uses its own reorder level
    #[test]
    fn test_threshold_defaults_to_reorder_level() {
        assert_eq!(effective_threshold(10, None), 10);
    }

    /// A supplied override wins over the reorder level
    #[test]
    fn test_override_threshold_wins() {
        assert_eq!(effective_threshold(10, Some(3)), 3);
    }

    /// A product exactly at its reorder level is flagged
    #[test]
    fn test_at_reorder_level_is_low() {
        assert!(is_below_threshold(10, 10));
        assert!(!is_below_threshold(11, 10));
    }

    /// Product with reorder level 10 stocked {3, 4} totals 7 and is low
    #[test]
    fn test_depleted_product_scenario() {
        let mut ledger = LedgerModel::default();
        ledger.upsert(1, 1, 3).unwrap();
        ledger.upsert(1, 2, 4).unwrap();

        let total = ledger.total_stock(1);
        assert_eq!(total, 7);

        let s = signal(1, total, 10);
        assert!(s.is_low);
        assert_eq!(s.effective_threshold, 10);
    }

    /// Batch classification with threshold 5 over totals [3, 5, 6, 20]
    /// flags the first two and orders by depletion
    #[test]
    fn test_batch_classification_with_override() {
        let totals = [20_i64, 3, 6, 5];
        let mut signals: Vec<LowStockSignal> = totals
            .iter()
            .enumerate()
            .map(|(i, &total)| {
                LowStockSignal::evaluate(
                    i as i64 + 1,
                    format!("SKU-{i}"),
                    format!("Product {i}"),
                    total,
                    // Reorder levels deliberately vary; the override must win
                    (i as i32 + 1) * 10,
                    Some(5),
                )
            })
            .collect();
        rank_by_depletion(&mut signals);

        let ordered: Vec<(i64, bool)> = signals.iter().map(|s| (s.total_stock, s.is_low)).collect();
        assert_eq!(
            ordered,
            vec![(3, true), (5, true), (6, false), (20, false)]
        );
    }

    /// Ties on total stock are broken by product id
    #[test]
    fn test_ordering_tie_break() {
        let mut signals = vec![signal(7, 4, 5), signal(3, 4, 5)];
        rank_by_depletion(&mut signals);

        let ids: Vec<i64> = signals.iter().map(|s| s.product_id).collect();
        assert_eq!(ids, vec![3, 7]);
    }

    /// The wire shape consumed by the routing layer
    #[test]
    fn test_signal_wire_shape() {
        let s = signal(1, 7, 10);
        let value = serde_json::to_value(&s).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "product_id": 1,
                "sku": "SKU-1",
                "name": "Product 1",
                "total_stock": 7,
                "effective_threshold": 10,
                "is_low": true
            })
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for valid quantities
    fn quantity_strategy() -> impl Strategy<Value = i64> {
        0i64..=10_000
    }

    /// Strategy for quantities including invalid negatives
    fn any_quantity_strategy() -> impl Strategy<Value = i64> {
        -100i64..=10_000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any sequence of reports for one pair leaves exactly one record
        /// holding the last accepted value
        #[test]
        fn prop_last_accepted_write_wins(
            quantities in prop::collection::vec(any_quantity_strategy(), 1..20)
        ) {
            let mut ledger = LedgerModel::default();
            let mut last_accepted = None;

            for &quantity in &quantities {
                if ledger.upsert(1, 1, quantity).is_ok() {
                    last_accepted = Some(quantity);
                }
            }

            prop_assert_eq!(ledger.quantity(1, 1), last_accepted);
            prop_assert_eq!(
                ledger.record_count(1, 1),
                usize::from(last_accepted.is_some())
            );
        }

        /// Total stock always equals the sum of the final per-warehouse values
        #[test]
        fn prop_total_stock_matches_final_values(
            reports in prop::collection::vec((0i64..5, quantity_strategy()), 1..30)
        ) {
            let mut ledger = LedgerModel::default();
            let mut finals: BTreeMap<i64, i64> = BTreeMap::new();

            for &(warehouse_id, quantity) in &reports {
                ledger.upsert(1, warehouse_id, quantity).unwrap();
                finals.insert(warehouse_id, quantity);
            }

            let expected: i64 = finals.values().sum();
            prop_assert_eq!(ledger.total_stock(1), expected);
        }

        /// Rejected reports never mutate the ledger
        #[test]
        fn prop_rejected_report_is_a_no_op(
            initial in quantity_strategy(),
            negative in -10_000i64..0
        ) {
            let mut ledger = LedgerModel::default();
            ledger.upsert(1, 1, initial).unwrap();

            prop_assert!(ledger.upsert(1, 1, negative).is_err());
            prop_assert_eq!(ledger.quantity(1, 1), Some(initial));
        }

        /// With an override, the decision depends only on the total and the
        /// override, never on the product's own reorder level
        #[test]
        fn prop_override_decides_alone(
            total in quantity_strategy(),
            threshold in quantity_strategy(),
            reorder_level in 0i32..1000
        ) {
            let s = LowStockSignal::evaluate(
                1,
                "SKU-1".to_string(),
                "Product".to_string(),
                total,
                reorder_level,
                Some(threshold),
            );

            prop_assert_eq!(s.effective_threshold, threshold);
            prop_assert_eq!(s.is_low, total <= threshold);
        }

        /// Without an override, the reorder level is the threshold
        #[test]
        fn prop_reorder_level_decides_without_override(
            total in quantity_strategy(),
            reorder_level in 0i32..1000
        ) {
            let s = LowStockSignal::evaluate(
                1,
                "SKU-1".to_string(),
                "Product".to_string(),
                total,
                reorder_level,
                None,
            );

            prop_assert_eq!(s.is_low, total <= i64::from(reorder_level));
        }

        /// Ranked signals are sorted ascending by total, ties by product id
        #[test]
        fn prop_ranking_is_sorted_and_deterministic(
            totals in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let mut signals: Vec<LowStockSignal> = totals
                .iter()
                .enumerate()
                .map(|(i, &total)| signal(i as i64, total, 10))
                .collect();

            rank_by_depletion(&mut signals);

            for pair in signals.windows(2) {
                let key_a = (pair[0].total_stock, pair[0].product_id);
                let key_b = (pair[1].total_stock, pair[1].product_id);
                prop_assert!(key_a <= key_b);
            }
        }

        /// A total at or below the threshold is always flagged, above never
        #[test]
        fn prop_threshold_boundary(
            threshold in quantity_strategy(),
            margin in 0i64..1000
        ) {
            prop_assert!(is_below_threshold(threshold, threshold));
            prop_assert!(is_below_threshold(threshold - margin, threshold));
            prop_assert!(!is_below_threshold(threshold + margin + 1, threshold));
        }
    }
}
