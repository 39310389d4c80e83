use crate::core::aggregation::AggregateViews;
use crate::core::config::SupplyChainConfig;
use crate::core::errors::SupplyChainError;
use crate::core::generator::SeriesGenerator;
use crate::core::types::{stockout_risk, Record};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn record(day: u32, product: &str, supplier: &str, demand: i64, inventory: i64, delivery: i64) -> Record {
    Record {
        date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
        product: product.to_string(),
        supplier: supplier.to_string(),
        demand,
        inventory,
        delivery_time: delivery,
        stockout_risk: stockout_risk(demand, inventory),
    }
}

fn small_table() -> Vec<Record> {
    vec![
        record(2, "Syringes", "MediCore Ltd", 100, 50, 4),
        record(1, "Syringes", "MedSupply Co", 100, 120, 2),
        record(1, "Bandages", "MediCore Ltd", 200, 100, 3),
        record(2, "Bandages", "MedSupply Co", 0, 10, -1),
    ]
}

fn generated_table() -> Vec<Record> {
    let config = SupplyChainConfig::default();
    let mut rng = StdRng::seed_from_u64(config.random_seed);
    SeriesGenerator::new(&config).generate(&mut rng).unwrap()
}

#[test]
fn test_daily_totals_sum_and_order() {
    let views = AggregateViews::compute(&small_table()).unwrap();

    assert_eq!(views.daily_totals.len(), 2);
    assert_eq!(views.daily_totals[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(views.daily_totals[0].demand, 300);
    assert_eq!(views.daily_totals[0].inventory, 220);
    assert_eq!(views.daily_totals[1].demand, 100);
    assert_eq!(views.daily_totals[1].inventory, 60);
}

#[test]
fn test_daily_delivery_is_a_separate_mean_view() {
    let views = AggregateViews::compute(&small_table()).unwrap();

    assert_eq!(views.daily_delivery.len(), 2);
    assert!((views.daily_delivery[0].mean_delivery_time - 2.5).abs() < 1e-12);
    assert!((views.daily_delivery[1].mean_delivery_time - 1.5).abs() < 1e-12);
}

#[test]
fn test_supplier_and_product_means() {
    let views = AggregateViews::compute(&small_table()).unwrap();

    let suppliers: Vec<_> = views.by_supplier.iter().map(|s| s.supplier.as_str()).collect();
    assert_eq!(suppliers, vec!["MedSupply Co", "MediCore Ltd"]);

    let medicore = &views.by_supplier[1];
    assert!((medicore.mean_delivery_time - 3.5).abs() < 1e-12);
    assert!((medicore.mean_stockout_risk - 0.5).abs() < 1e-12);

    let medsupply = &views.by_supplier[0];
    assert!((medsupply.mean_delivery_time - 0.5).abs() < 1e-12);
    assert_eq!(medsupply.mean_stockout_risk, 0.0);

    assert_eq!(views.by_product.len(), 2);
    assert_eq!(views.by_product[0].product, "Bandages");
    assert!((views.by_product[0].mean_stockout_risk - 0.25).abs() < 1e-12);
    assert!((views.by_product[1].mean_stockout_risk - 0.25).abs() < 1e-12);
}

#[test]
fn test_overall_means() {
    let views = AggregateViews::compute(&small_table()).unwrap();
    let overall = views.overall.unwrap();

    assert!((overall.mean_demand - 100.0).abs() < 1e-12);
    assert!((overall.mean_inventory - 70.0).abs() < 1e-12);
    assert!((overall.mean_delivery_time - 2.0).abs() < 1e-12);
}

#[test]
fn test_high_risk_filter_is_strict() {
    let views = AggregateViews::compute(&small_table()).unwrap();
    assert_eq!(views.high_risk_products(0.25).count(), 0);
    assert_eq!(views.high_risk_products(0.2).count(), 2);
}

#[test]
fn test_aggregation_is_pure() {
    let records = generated_table();
    let before = records.clone();

    let first = AggregateViews::compute(&records).unwrap();
    let second = AggregateViews::compute(&records).unwrap();

    assert_eq!(first, second);
    assert_eq!(records, before);
}

#[test]
fn test_aggregation_ignores_row_order() {
    let records = generated_table();
    let mut shuffled = records.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(99));

    let a = AggregateViews::compute(&records).unwrap();
    let b = AggregateViews::compute(&shuffled).unwrap();

    // Integer sums and integer-backed means are exact
    assert_eq!(a.daily_totals, b.daily_totals);
    assert_eq!(a.daily_delivery, b.daily_delivery);
    assert_eq!(a.overall, b.overall);

    // Float risk sums may differ in the last bits
    assert_eq!(a.by_supplier.len(), b.by_supplier.len());
    for (x, y) in a.by_supplier.iter().zip(&b.by_supplier) {
        assert_eq!(x.supplier, y.supplier);
        assert!((x.mean_delivery_time - y.mean_delivery_time).abs() < 1e-9);
        assert!((x.mean_stockout_risk - y.mean_stockout_risk).abs() < 1e-9);
    }
    for (x, y) in a.by_product.iter().zip(&b.by_product) {
        assert_eq!(x.product, y.product);
        assert!((x.mean_stockout_risk - y.mean_stockout_risk).abs() < 1e-9);
    }
}

#[test]
fn test_full_year_group_counts() {
    let views = AggregateViews::compute(&generated_table()).unwrap();

    assert_eq!(views.daily_totals.len(), 365);
    assert_eq!(views.daily_delivery.len(), 365);
    assert_eq!(views.by_product.len(), 5);
    assert!(!views.by_supplier.is_empty() && views.by_supplier.len() <= 3);
}

#[test]
fn test_empty_table_yields_empty_views() {
    let views = AggregateViews::compute(&[]).unwrap();

    assert!(views.daily_totals.is_empty());
    assert!(views.daily_delivery.is_empty());
    assert!(views.by_supplier.is_empty());
    assert!(views.by_product.is_empty());
    assert!(views.overall.is_none());
}

#[test]
fn test_malformed_rows_are_rejected() {
    let mut bad_risk = small_table();
    bad_risk[0].stockout_risk = 1.5;
    let mut nan_risk = small_table();
    nan_risk[1].stockout_risk = f64::NAN;
    let mut no_supplier = small_table();
    no_supplier[2].supplier.clear();

    for table in [bad_risk, nan_risk, no_supplier] {
        let err = AggregateViews::compute(&table).unwrap_err();
        assert!(matches!(err, SupplyChainError::Aggregation { .. }), "{err}");
    }
}

#[test]
fn test_extreme_values_saturate() {
    let table = vec![
        record(1, "Syringes", "MedSupply Co", i64::MAX, i64::MIN, i64::MAX),
        record(1, "Bandages", "MedSupply Co", i64::MAX, i64::MIN, i64::MAX),
    ];
    let views = AggregateViews::compute(&table).unwrap();

    assert_eq!(views.daily_totals[0].demand, i64::MAX);
    assert_eq!(views.daily_totals[0].inventory, i64::MIN);
    assert_eq!(views.by_product[0].mean_stockout_risk, 1.0);
    assert!(views.overall.unwrap().mean_demand > 0.0);
}

#[test]
fn test_dashboard_panels_shape() {
    let views = AggregateViews::compute(&small_table()).unwrap();
    let panels = views.dashboard_panels();

    assert_eq!(
        panels.demand.points,
        vec![("2023-01-01".to_string(), 300.0), ("2023-01-02".to_string(), 100.0)]
    );
    assert_eq!(panels.inventory.len(), 2);
    assert_eq!(panels.supplier_delivery.len(), 2);
    assert_eq!(panels.product_risk.len(), 2);
    assert_eq!(panels.delivery_trend.points[1], ("2023-01-02".to_string(), 1.5));
}
