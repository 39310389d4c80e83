use super::aggregation::DailyTotals;
use super::errors::{Result, SupplyChainError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Strategy for fitting a line to (x, y) points
pub trait TrendFitter {
    fn fit(&self, points: &[(f64, f64)]) -> Result<LinearFit>;
}

/// Closed-form least squares, no regularization or scaling
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinaryLeastSquares;

impl TrendFitter for OrdinaryLeastSquares {
    fn fit(&self, points: &[(f64, f64)]) -> Result<LinearFit> {
        let distinct_days = points
            .iter()
            .map(|(x, _)| x.to_bits())
            .collect::<BTreeSet<_>>()
            .len();
        if distinct_days < 2 {
            return Err(SupplyChainError::InsufficientData { distinct_days });
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

        let slope = sxy / sxx;
        Ok(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    /// A flat slope counts as decreasing
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "Increasing"),
            TrendDirection::Decreasing => write!(f, "Decreasing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub fit: LinearFit,
    pub direction: TrendDirection,
    pub projected: Vec<f64>,
    pub projected_mean: f64,
    /// Mean squared residual of the fit over the observed days
    pub in_sample_mse: f64,
}

/// Projects total daily demand forward from a fitted trend
pub struct TrendForecaster<F: TrendFitter = OrdinaryLeastSquares> {
    fitter: F,
    horizon_days: usize,
}

impl TrendForecaster<OrdinaryLeastSquares> {
    pub fn new(horizon_days: usize) -> Self {
        Self::with_fitter(OrdinaryLeastSquares, horizon_days)
    }
}

impl<F: TrendFitter> TrendForecaster<F> {
    pub fn with_fitter(fitter: F, horizon_days: usize) -> Self {
        Self {
            fitter,
            horizon_days,
        }
    }

    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Fit demand against day index and project the next `horizon_days`.
    ///
    /// Day index is the offset from the earliest date. Projection starts at
    /// index N, where N is the number of observed days.
    pub fn forecast(&self, daily: &[DailyTotals]) -> Result<ForecastResult> {
        let points = demand_points(daily);
        let fit = self.fitter.fit(&points)?;

        let start = points.len();
        let projected: Vec<f64> = (start..start + self.horizon_days)
            .map(|day| fit.predict(day as f64))
            .collect();
        let projected_mean = if projected.is_empty() {
            0.0
        } else {
            projected.iter().sum::<f64>() / projected.len() as f64
        };

        let in_sample_mse = points
            .iter()
            .map(|(x, y)| (y - fit.predict(*x)).powi(2))
            .sum::<f64>()
            / points.len() as f64;

        debug!(
            "Trend fit slope={:.4} intercept={:.2} mse={:.2}",
            fit.slope, fit.intercept, in_sample_mse
        );

        Ok(ForecastResult {
            fit,
            direction: TrendDirection::from_slope(fit.slope),
            projected,
            projected_mean,
            in_sample_mse,
        })
    }
}

/// (day index, total demand) pairs
pub fn demand_points(daily: &[DailyTotals]) -> Vec<(f64, f64)> {
    let Some(first) = daily.iter().map(|d| d.date).min() else {
        return Vec::new();
    };
    daily
        .iter()
        .map(|d| ((d.date - first).num_days() as f64, d.demand as f64))
        .collect()
}
