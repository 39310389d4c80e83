use medsupply::core::config::SupplyChainConfig;
use medsupply::core::pipeline::{PipelineObserver, Stage, SupplyChainPipeline};

/// Prints the stage banner lines to stdout
struct ConsoleProgress;

impl PipelineObserver for ConsoleProgress {
    fn on_stage_started(&mut self, stage: Stage) {
        println!("{stage}...");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let config = SupplyChainConfig::default();
    let mut pipeline = SupplyChainPipeline::new(config.clone());
    pipeline.add_observer(Box::new(ConsoleProgress));
    pipeline.run()?;

    println!("\nDashboard and insights have been generated successfully!");
    println!(
        "Open '{}' in your web browser to view the dashboard.",
        config.dashboard_file
    );
    println!(
        "Check '{}' for detailed analysis and forecasts.",
        config.insights_file
    );
    Ok(())
}
