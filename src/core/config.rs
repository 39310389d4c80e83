use super::errors::{Result, SupplyChainError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PRODUCTS: [&str; 5] = [
    "Surgical Masks",
    "Medical Gloves",
    "Syringes",
    "Bandages",
    "Sanitizers",
];

pub const DEFAULT_SUPPLIERS: [&str; 3] = ["MedSupply Co", "HealthEquip Inc", "MediCore Ltd"];

/// Configuration for a single supply chain run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyChainConfig {
    // Generated series, both ends inclusive
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub products: Vec<String>,
    pub suppliers: Vec<String>,
    pub random_seed: u64,

    // Forecast and report
    pub forecast_horizon_days: usize,
    pub high_risk_threshold: f64,

    // Artifacts
    pub output_dir: PathBuf,
    pub dashboard_file: String,
    pub insights_file: String,
}

impl Default for SupplyChainConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            products: DEFAULT_PRODUCTS.iter().map(|p| p.to_string()).collect(),
            suppliers: DEFAULT_SUPPLIERS.iter().map(|s| s.to_string()).collect(),
            random_seed: 42,
            forecast_horizon_days: 30,
            high_risk_threshold: 0.3,
            output_dir: PathBuf::from("."),
            dashboard_file: "medical_supply_dashboard.html".to_string(),
            insights_file: "supply_chain_insights.txt".to_string(),
        }
    }
}

impl SupplyChainConfig {
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_products<S: Into<String>>(mut self, products: impl IntoIterator<Item = S>) -> Self {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suppliers<S: Into<String>>(mut self, suppliers: impl IntoIterator<Item = S>) -> Self {
        self.suppliers = suppliers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_forecast_horizon(mut self, days: usize) -> Self {
        self.forecast_horizon_days = days;
        self
    }

    pub fn with_high_risk_threshold(mut self, threshold: f64) -> Self {
        self.high_risk_threshold = threshold;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join(&self.dashboard_file)
    }

    pub fn insights_path(&self) -> PathBuf {
        self.output_dir.join(&self.insights_file)
    }

    /// Number of days in the configured range, or 0 if the range is inverted
    pub fn day_count(&self) -> usize {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }

    /// Check the fields that shape the generated series
    pub fn validate_series(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(SupplyChainError::generation(format!(
                "end date {} precedes start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.products.is_empty() {
            return Err(SupplyChainError::generation("product list is empty"));
        }
        if self.suppliers.is_empty() {
            return Err(SupplyChainError::generation("supplier list is empty"));
        }
        Ok(())
    }

    /// Check the whole run configuration before any stage starts
    pub fn validate(&self) -> Result<()> {
        self.validate_series()?;
        if self.forecast_horizon_days == 0 {
            return Err(SupplyChainError::config("forecast horizon must be at least one day"));
        }
        Ok(())
    }
}
