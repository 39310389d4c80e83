use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One generated day of supply data for a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub product: String,
    pub supplier: String,
    /// Units requested; not clamped, may be zero or negative
    pub demand: i64,
    /// Units on hand; not clamped
    pub inventory: i64,
    /// Days to deliver; not clamped
    pub delivery_time: i64,
    /// Normalized shortfall, always within [0, 1]
    pub stockout_risk: f64,
}

/// Fraction of demand that inventory fails to cover.
///
/// Zero or negative demand carries no risk.
pub fn stockout_risk(demand: i64, inventory: i64) -> f64 {
    if demand <= 0 {
        return 0.0;
    }
    let shortfall = demand.saturating_sub(inventory) as f64 / demand as f64;
    shortfall.clamp(0.0, 1.0)
}

/// Ordered (key, value) sequence handed to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(String, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(String, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }
}
