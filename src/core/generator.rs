use super::config::SupplyChainConfig;
use super::errors::{Result, SupplyChainError};
use super::types::{stockout_risk, Record};
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

const DELIVERY_MEAN_DAYS: f64 = 3.0;
const DELIVERY_STD_DAYS: f64 = 1.0;

/// Seasonal mean demand for a calendar month (1..=12).
///
/// Keyed by month rather than day, so the curve steps at month boundaries.
pub fn seasonal_base_demand(month: u32) -> f64 {
    1000.0 + 500.0 * (month as f64 * PI / 6.0).sin()
}

/// Produces the raw record table from an injected random source
pub struct SeriesGenerator<'a> {
    config: &'a SupplyChainConfig,
}

impl<'a> SeriesGenerator<'a> {
    pub fn new(config: &'a SupplyChainConfig) -> Self {
        Self { config }
    }

    /// Generate one record per (date, product), dates outer and products inner.
    ///
    /// Per record the draws happen in a fixed order: demand, inventory,
    /// supplier, delivery time. The same seed and configuration therefore
    /// reproduce the table exactly with the same `rand` version.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Record>> {
        self.config.validate_series()?;

        let delivery = normal(DELIVERY_MEAN_DAYS, DELIVERY_STD_DAYS)?;
        let mut records = Vec::with_capacity(self.config.day_count() * self.config.products.len());

        for date in self.dates() {
            let base = seasonal_base_demand(date.month());
            let demand_dist = normal(base, base * 0.1)?;
            let inventory_dist = normal(base * 1.2, base * 0.15)?;

            for product in &self.config.products {
                let demand = demand_dist.sample(rng).round() as i64;
                let inventory = inventory_dist.sample(rng).round() as i64;
                let supplier = self
                    .config
                    .suppliers
                    .choose(rng)
                    .ok_or_else(|| SupplyChainError::generation("supplier list is empty"))?;
                let delivery_time = delivery.sample(rng).round() as i64;

                records.push(Record {
                    date,
                    product: product.clone(),
                    supplier: supplier.clone(),
                    demand,
                    inventory,
                    delivery_time,
                    stockout_risk: stockout_risk(demand, inventory),
                });
            }
        }

        info!(
            "Generated {} records ({} days x {} products)",
            records.len(),
            self.config.day_count(),
            self.config.products.len()
        );
        debug!("Generator seed {}", self.config.random_seed);
        Ok(records)
    }

    fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.config.end_date;
        self.config
            .start_date
            .iter_days()
            .take_while(move |d| *d <= end)
    }
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| {
        SupplyChainError::generation(format!("invalid normal({mean}, {std_dev}): {e}"))
    })
}
