//! Anomaly detection tests
//!
//! Tests for anomaly detection including:
//! - Median-multiple threshold flags
//! - Detection windows
//! - Isolation forest selected through configuration

use amba_erp_backend::{config::AnomalySettings, InventoryService};
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    AnomalyOutcome, AnomalyStrategy, DetectionWindow, ForecastEngine, ForecastMode, OrderId,
    OrderRequest, Product, ProductCatalog, REASON_HIGH_QUANTITY_ORDER,
    REASON_QUANTITY_UNUSUALLY_HIGH, REASON_STATISTICAL_OUTLIER,
};

fn service(settings: &AnomalySettings) -> InventoryService {
    InventoryService::new(
        ProductCatalog::new(vec![
            Product::new("A", 100_000, Decimal::from(10)),
            Product::new("B", 100_000, Decimal::from(10)),
        ]),
        ForecastEngine::default(),
        ForecastMode::RecentWindow,
        settings.build_model(),
    )
}

fn submit(service: &InventoryService, product: &str, day: u32, qty: u32, amount: i64) {
    let at = Utc.with_ymd_and_hms(2024, 8, day, 10, 0, 0).unwrap();
    let request = OrderRequest::new("Acme", product, qty).with_amount(Decimal::from(amount));
    assert!(service.submit_order_at(request, at).is_accepted());
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// [1 x9, 500]: only the 500 order is flagged
    #[test]
    fn test_spike_flagged_against_median() {
        let service = service(&AnomalySettings::default());
        for day in 1..=9 {
            submit(&service, "A", day, 1, 10);
        }
        submit(&service, "A", 10, 500, 5000);

        let outcome = service.detect_anomalies(DetectionWindow::All);
        assert_eq!(outcome.flagged_ids(), vec![OrderId(9)]);
        assert_eq!(outcome.flags()[0].reason, REASON_HIGH_QUANTITY_ORDER);
        assert_eq!(outcome.flags()[0].quantity, 500);
    }

    /// Empty ledger is a valid empty result
    #[test]
    fn test_empty_ledger() {
        for strategy in [AnomalyStrategy::Threshold, AnomalyStrategy::IsolationForest] {
            let service = service(&AnomalySettings {
                strategy,
                ..Default::default()
            });
            let outcome = service.detect_anomalies(DetectionWindow::All);
            assert_eq!(outcome, AnomalyOutcome::EmptyLedger);
            assert!(outcome.flags().is_empty());
        }
    }

    /// Quantities above the absolute threshold are always flagged
    #[test]
    fn test_absolute_threshold() {
        let service = service(&AnomalySettings::default());
        submit(&service, "B", 1, 1500, 100);
        submit(&service, "B", 2, 1400, 100);

        let outcome = service.detect_anomalies(DetectionWindow::All);
        assert_eq!(outcome.flagged_ids(), vec![OrderId(0), OrderId(1)]);
        assert!(outcome
            .flags()
            .iter()
            .all(|f| f.reason == REASON_QUANTITY_UNUSUALLY_HIGH));
    }

    /// Windows choose which orders are flagged; medians still span the full history
    #[test]
    fn test_windows() {
        let service = service(&AnomalySettings::default());
        for day in 1..=9 {
            submit(&service, "A", day, 1, 10);
        }
        submit(&service, "A", 10, 500, 5000);
        for day in 11..=14 {
            submit(&service, "A", day, 400, 4000);
        }

        // The median over all fourteen orders is 1
        assert_eq!(service.detect_anomalies(DetectionWindow::All).flags().len(), 5);

        let last = service.detect_anomalies(DetectionWindow::Last(5));
        assert_eq!(
            last.flagged_ids(),
            (9..14).map(OrderId).collect::<Vec<_>>()
        );

        let since = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        assert_eq!(
            service.detect_anomalies(DetectionWindow::Since(since)),
            AnomalyOutcome::EmptyLedger
        );
    }

    /// A one-order window still sees the spike against the product's history
    #[test]
    fn test_small_window_keeps_history_median() {
        let service = service(&AnomalySettings::default());
        for day in 1..=9 {
            submit(&service, "A", day, 1, 10);
        }
        submit(&service, "A", 10, 500, 5000);

        let last = service.detect_anomalies(DetectionWindow::Last(1));
        assert_eq!(last.flagged_ids(), vec![OrderId(9)]);
        assert_eq!(last.flags()[0].reason, REASON_HIGH_QUANTITY_ORDER);

        let since = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();
        assert_eq!(
            service.detect_anomalies(DetectionWindow::Since(since)).flagged_ids(),
            vec![OrderId(9)]
        );

        assert_eq!(service.detect_anomalies(DetectionWindow::Last(3)).flags().len(), 1);
    }

    /// Isolation forest flags the multivariate outlier
    #[test]
    fn test_isolation_forest_outlier() {
        let service = service(&AnomalySettings {
            strategy: AnomalyStrategy::IsolationForest,
            contamination: 0.05,
            ..Default::default()
        });
        for day in 1..=20 {
            submit(&service, "A", day, 2 + day % 3, 1000 + 50 * i64::from(day % 4));
        }
        submit(&service, "A", 21, 400, 200_000);

        let outcome = service.detect_anomalies(DetectionWindow::All);
        assert_eq!(outcome.flagged_ids(), vec![OrderId(20)]);
        assert_eq!(outcome.flags()[0].reason, REASON_STATISTICAL_OUTLIER);
        assert!(outcome.flags()[0].score.is_some());
    }

    /// A single order is too few for the forest
    #[test]
    fn test_isolation_forest_needs_two_orders() {
        let service = service(&AnomalySettings {
            strategy: AnomalyStrategy::IsolationForest,
            ..Default::default()
        });
        submit(&service, "A", 1, 3, 30);
        assert_eq!(
            service.detect_anomalies(DetectionWindow::All),
            AnomalyOutcome::InsufficientData {
                required: 2,
                available: 1
            }
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Flags always point at orders inside the window
        #[test]
        fn prop_flags_reference_window_orders(
            orders in prop::collection::vec((1u32..1500, 0i64..20_000), 1..40),
            last in 1usize..40,
            forest in any::<bool>()
        ) {
            let strategy = if forest { AnomalyStrategy::IsolationForest } else { AnomalyStrategy::Threshold };
            let service = service(&AnomalySettings { strategy, ..Default::default() });
            for (i, (qty, amount)) in orders.iter().enumerate() {
                submit(&service, "A", 1 + (i as u32 % 28), *qty, *amount);
            }

            let total = orders.len();
            let first_in_window = total.saturating_sub(last) as u64;
            let outcome = service.detect_anomalies(DetectionWindow::Last(last));
            for flag in outcome.flags() {
                prop_assert!(flag.order_id.0 >= first_in_window);
                prop_assert!(flag.order_id.0 < total as u64);
                let order = &service.list_orders()[flag.order_id.0 as usize];
                prop_assert_eq!(flag.quantity, order.quantity);
            }
        }

        /// Threshold flags never exceed the window and are deterministic
        #[test]
        fn prop_threshold_deterministic(
            quantities in prop::collection::vec(1u32..100, 1..30)
        ) {
            let service = service(&AnomalySettings::default());
            for (i, qty) in quantities.iter().enumerate() {
                submit(&service, "B", 1 + (i as u32 % 28), *qty, 0);
            }
            let first = service.detect_anomalies(DetectionWindow::All);
            prop_assert!(first.flags().len() < quantities.len());
            prop_assert_eq!(first, service.detect_anomalies(DetectionWindow::All));
        }
    }
}
