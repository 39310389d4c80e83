use super::aggregation::AggregateViews;
use super::config::SupplyChainConfig;
use super::errors::Result;
use super::forecast::{ForecastResult, TrendForecaster};
use super::generator::SeriesGenerator;
use crate::emit::{dashboard, report, write_atomic};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Dashboard,
    Forecast,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generate => write!(f, "Generating supply chain data"),
            Stage::Dashboard => write!(f, "Creating dashboard"),
            Stage::Forecast => write!(f, "Generating forecasts and insights"),
        }
    }
}

/// Observer trait for pipeline progress
pub trait PipelineObserver {
    /// Called before a stage does any work
    fn on_stage_started(&mut self, stage: Stage);

    /// Called after a stage has finished, including its artifact
    fn on_stage_completed(&mut self, _stage: Stage) {}
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub record_count: usize,
    pub dashboard_path: PathBuf,
    pub insights_path: PathBuf,
    pub forecast: ForecastResult,
}

/// Runs generate, dashboard and forecast stages in order.
///
/// Any stage error aborts the run before that stage writes its artifact.
pub struct SupplyChainPipeline {
    config: SupplyChainConfig,
    observers: Vec<Box<dyn PipelineObserver>>,
}

impl SupplyChainPipeline {
    pub fn new(config: SupplyChainConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn PipelineObserver>) {
        self.observers.push(observer);
    }

    fn notify_started(&mut self, stage: Stage) {
        info!("{stage}");
        for observer in &mut self.observers {
            observer.on_stage_started(stage);
        }
    }

    fn notify_completed(&mut self, stage: Stage) {
        for observer in &mut self.observers {
            observer.on_stage_completed(stage);
        }
    }

    pub fn run(&mut self) -> Result<PipelineOutcome> {
        self.config.validate()?;

        self.notify_started(Stage::Generate);
        let mut rng = StdRng::seed_from_u64(self.config.random_seed);
        let records = SeriesGenerator::new(&self.config).generate(&mut rng)?;
        let views = AggregateViews::compute(&records)?;
        self.notify_completed(Stage::Generate);

        self.notify_started(Stage::Dashboard);
        let dashboard_path = self.config.dashboard_path();
        let html = dashboard::render_dashboard(&views.dashboard_panels())?;
        write_atomic(&dashboard_path, &html)?;
        info!("Wrote dashboard to {}", dashboard_path.display());
        self.notify_completed(Stage::Dashboard);

        self.notify_started(Stage::Forecast);
        let forecaster = TrendForecaster::new(self.config.forecast_horizon_days);
        let forecast = forecaster.forecast(&views.daily_totals)?;
        let insights_path = self.config.insights_path();
        let text = report::render_insights(
            &views,
            &forecast,
            self.config.high_risk_threshold,
            forecaster.horizon_days(),
        );
        write_atomic(&insights_path, &text)?;
        info!("Wrote insights to {}", insights_path.display());
        self.notify_completed(Stage::Forecast);

        Ok(PipelineOutcome {
            record_count: records.len(),
            dashboard_path,
            insights_path,
            forecast,
        })
    }
}
