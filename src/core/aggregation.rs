use super::errors::{Result, SupplyChainError};
use super::types::{Record, Series};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed inventory and demand across all products for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub inventory: i64,
    pub demand: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDelivery {
    pub date: NaiveDate,
    pub mean_delivery_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub supplier: String,
    pub mean_delivery_time: f64,
    pub mean_stockout_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRisk {
    pub product: String,
    pub mean_stockout_risk: f64,
}

/// Table-wide means used in the insights header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub mean_demand: f64,
    pub mean_inventory: f64,
    pub mean_delivery_time: f64,
}

/// Read-only grouped views over a record table.
///
/// Each view is keyed by the distinct values present in the table and
/// sorted by key, so row order in the input never affects the result.
/// An empty table produces empty views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateViews {
    pub daily_totals: Vec<DailyTotals>,
    pub daily_delivery: Vec<DailyDelivery>,
    pub by_supplier: Vec<SupplierPerformance>,
    pub by_product: Vec<ProductRisk>,
    pub overall: Option<OverallMetrics>,
}

/// Everything the dashboard draws, one series per trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPanels {
    pub inventory: Series,
    pub demand: Series,
    pub supplier_delivery: Series,
    pub product_risk: Series,
    pub delivery_trend: Series,
}

// Running sum and count for a mean
#[derive(Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

impl AggregateViews {
    pub fn compute(records: &[Record]) -> Result<Self> {
        validate(records)?;

        let views = Self {
            daily_totals: daily_totals(records),
            daily_delivery: daily_delivery(records),
            by_supplier: by_supplier(records),
            by_product: by_product(records),
            overall: overall(records),
        };
        debug!(
            "Aggregated {} records into {} days, {} suppliers, {} products",
            records.len(),
            views.daily_totals.len(),
            views.by_supplier.len(),
            views.by_product.len()
        );
        Ok(views)
    }

    /// Products whose mean stockout risk is strictly above `threshold`
    pub fn high_risk_products(&self, threshold: f64) -> impl Iterator<Item = &ProductRisk> {
        self.by_product
            .iter()
            .filter(move |p| p.mean_stockout_risk > threshold)
    }

    pub fn dashboard_panels(&self) -> DashboardPanels {
        let by_date = |f: fn(&DailyTotals) -> i64| -> Vec<(String, f64)> {
            self.daily_totals
                .iter()
                .map(|d| (d.date.to_string(), f(d) as f64))
                .collect()
        };

        DashboardPanels {
            inventory: Series::new("Total Inventory", by_date(|d| d.inventory)),
            demand: Series::new("Total Demand", by_date(|d| d.demand)),
            supplier_delivery: Series::new(
                "Avg Delivery Time",
                self.by_supplier
                    .iter()
                    .map(|s| (s.supplier.clone(), s.mean_delivery_time))
                    .collect(),
            ),
            product_risk: Series::new(
                "Stockout Risk",
                self.by_product
                    .iter()
                    .map(|p| (p.product.clone(), p.mean_stockout_risk))
                    .collect(),
            ),
            delivery_trend: Series::new(
                "Avg Delivery Time",
                self.daily_delivery
                    .iter()
                    .map(|d| (d.date.to_string(), d.mean_delivery_time))
                    .collect(),
            ),
        }
    }
}

fn validate(records: &[Record]) -> Result<()> {
    for (row, record) in records.iter().enumerate() {
        if record.product.is_empty() {
            return Err(SupplyChainError::aggregation(format!("row {row}: empty product name")));
        }
        if record.supplier.is_empty() {
            return Err(SupplyChainError::aggregation(format!("row {row}: empty supplier name")));
        }
        if !(0.0..=1.0).contains(&record.stockout_risk) {
            return Err(SupplyChainError::aggregation(format!(
                "row {row}: stockout risk {} outside [0, 1]",
                record.stockout_risk
            )));
        }
    }
    Ok(())
}

/// Sum of inventory and demand per date, ascending.
///
/// Sums saturate at the `i64` bounds.
pub fn daily_totals(records: &[Record]) -> Vec<DailyTotals> {
    let mut totals: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.date).or_default();
        entry.0 = entry.0.saturating_add(record.inventory);
        entry.1 = entry.1.saturating_add(record.demand);
    }
    totals
        .into_iter()
        .map(|(date, (inventory, demand))| DailyTotals {
            date,
            inventory,
            demand,
        })
        .collect()
}

/// Mean delivery time per date, ascending
pub fn daily_delivery(records: &[Record]) -> Vec<DailyDelivery> {
    let mut by_date: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_date.entry(record.date).or_default();
        entry.0 = entry.0.saturating_add(record.delivery_time);
        entry.1 += 1;
    }
    by_date
        .into_iter()
        .map(|(date, (sum, count))| DailyDelivery {
            date,
            mean_delivery_time: sum as f64 / count as f64,
        })
        .collect()
}

pub fn by_supplier(records: &[Record]) -> Vec<SupplierPerformance> {
    let mut groups: BTreeMap<&str, (MeanAcc, MeanAcc)> = BTreeMap::new();
    for record in records {
        let (delivery, risk) = groups.entry(record.supplier.as_str()).or_default();
        delivery.push(record.delivery_time as f64);
        risk.push(record.stockout_risk);
    }
    groups
        .into_iter()
        .map(|(supplier, (delivery, risk))| SupplierPerformance {
            supplier: supplier.to_string(),
            mean_delivery_time: delivery.mean(),
            mean_stockout_risk: risk.mean(),
        })
        .collect()
}

pub fn by_product(records: &[Record]) -> Vec<ProductRisk> {
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.product.as_str())
            .or_default()
            .push(record.stockout_risk);
    }
    groups
        .into_iter()
        .map(|(product, risk)| ProductRisk {
            product: product.to_string(),
            mean_stockout_risk: risk.mean(),
        })
        .collect()
}

pub fn overall(records: &[Record]) -> Option<OverallMetrics> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let (demand, inventory, delivery) = records.iter().fold((0i64, 0i64, 0i64), |acc, r| {
        (
            acc.0.saturating_add(r.demand),
            acc.1.saturating_add(r.inventory),
            acc.2.saturating_add(r.delivery_time),
        )
    });
    Some(OverallMetrics {
        mean_demand: demand as f64 / n,
        mean_inventory: inventory as f64 / n,
        mean_delivery_time: delivery as f64 / n,
    })
}
